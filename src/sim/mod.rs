//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only (through `SpawnRoll`)
//! - Bounded entity pools
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod pool;
pub mod rng;
pub mod state;
pub mod tick;

pub use pool::Pool;
pub use rng::{SpawnRoll, seeded};
pub use state::{
    Boss, BossPhase, Bullet, Enemy, EnemyBullet, EnemyKind, Player, PowerUp, World,
};
pub use tick::{GameEvent, TickInput, TickOutcome, Transition, tick, tick_into};
