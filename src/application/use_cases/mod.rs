mod reconcile_video_status;
mod reorder_photos;
mod upload_photos;
mod upload_video;

pub use reconcile_video_status::{VideoStatusObserver, VideoStatusReconciler};
pub use reorder_photos::{OrderingEngine, ReorderPlan, move_photo};
pub use upload_photos::{UploadPhotosUseCase, select_droppable_photos};
pub use upload_video::UploadVideoUseCase;
