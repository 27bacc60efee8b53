pub mod media_file;
pub mod video_status;

pub use media_file::*;
pub use video_status::*;
