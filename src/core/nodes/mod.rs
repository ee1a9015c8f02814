pub mod can_frame_source;
pub mod can_raw_view;
pub mod frame_filter;

pub use can_frame_source::CanFrameSource;
pub use can_raw_view::{CanRawView, CanRawViewConfig, ViewSnapshot};
pub use frame_filter::{FilterConfig, FrameFilter};
