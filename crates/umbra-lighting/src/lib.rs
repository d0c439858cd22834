//! Point-light propagation over a tile grid with distance falloff tables,
//! plus the fixed-capacity light source pool that schedules it per tick.

pub mod manager;
pub mod propagation;
pub mod tables;

pub use manager::{LightId, LightManager, LightSource};
pub use propagation::{LightGrid, apply_light, unlight};
pub use tables::{AttenuationTable, BlockTable, LightTables, MAX_LIGHT_RADIUS};
