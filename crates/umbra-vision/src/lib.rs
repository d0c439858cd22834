//! Observer visibility for the tile grid: which tiles each vision source can
//! see, which tiles the player has explored, and which translucency regions
//! are currently seen through.

pub mod crawl;
pub mod manager;
pub mod shadowcast;

pub use crawl::{CRAWL_TABLE, MAX_RAY_STEPS, RADIUS_ADJUST, RAY_COUNT, ray_steps};
pub use manager::{VisionId, VisionManager, VisionSource};
pub use shadowcast::{UNVISION_MARGIN, cast_vision, unvision};
