pub mod listing;
pub mod photo;
pub mod video;

pub use listing::*;
pub use photo::*;
pub use video::*;
