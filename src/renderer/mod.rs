//! Render projection
//!
//! Turns the entity store into per-mesh instance lists and owns the
//! presentation-only effects (camera shake, ship banking). GPU submission
//! consumes `InstanceRaw` via its `desc()` layout.

pub mod effects;
pub mod instance;
pub mod projection;

pub use effects::{CameraShake, ShipPose};
pub use instance::InstanceRaw;
pub use projection::{InstanceBatches, Projector};
