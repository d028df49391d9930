pub mod controller;
pub mod state;

pub use controller::{ControllerCommand, ControllerEvent, ControllerHandle, SessionController};
pub use state::{RecordingPhase, Session, Stage};
