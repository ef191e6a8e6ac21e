pub mod decode;
pub mod fs;
mod labels;
mod notify;
pub mod presenters;

pub use decode::{data_url_bytes, DataUrlDecoder, InlineDecodePipeline, ThreadedDecodePipeline};
pub use fs::WalkdirFileScanner;
pub use labels::StaticLabelCatalog;
pub use notify::LogNotifier;
pub use presenters::{
    present_metrics, present_plan, present_poll_report, present_presentation_type,
    present_upload_report, present_view,
};
