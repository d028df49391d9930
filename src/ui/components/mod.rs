pub mod message_list;
pub mod record_button;
pub mod report_view;
pub mod topic_grid;

pub use message_list::MessageList;
pub use record_button::RecordButton;
pub use report_view::ReportView;
pub use topic_grid::TopicGrid;
