pub mod transcript;
pub mod types;

pub use transcript::Transcript;
pub use types::{capitalize_first, Message, Speaker, TRANSCRIBING_PLACEHOLDER};
