//! Sector Strike - a 3D sector-based arcade shooter
//!
//! Core modules:
//! - `sim`: Per-tick simulation (entity store, spawning, collisions, boss AI)
//! - `session`: Game-state machine and session bookkeeping
//! - `renderer`: Render projection (entity store -> instance transforms)
//! - `tuning`: Static level and weapon tables
//! - `settings`: Player preferences
//! - `platform`: Browser bindings

pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{Game, GamePhase, HudSnapshot, Session};
pub use settings::Settings;
pub use tuning::{LevelConfig, Tuning, WeaponConfig, WeaponKind};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; per-tick constants are tuned for this)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player smoothing factor toward the pointer target (per tick)
    pub const PLAYER_SPEED: f32 = 0.18;
    pub const PLAYER_LIMIT_X: f32 = 12.0;
    pub const PLAYER_LIMIT_Y: f32 = 7.0;
    /// Player spawn position at fresh level start
    pub const PLAYER_START_Y: f32 = -2.0;

    /// Viewport half-extents in world units at the play plane
    pub const VIEW_HALF_WIDTH: f32 = 12.5;
    pub const VIEW_HALF_HEIGHT: f32 = 7.0;

    /// Enemy forward speed per tick (before level multiplier)
    pub const ENEMY_SPEED: f32 = 0.25;
    pub const ENEMY_BULLET_SPEED: f32 = 0.4;
    /// Fighters move this much faster than drones
    pub const FIGHTER_SPEED_FACTOR: f32 = 1.5;
    /// Weak lateral homing toward the player (per tick)
    pub const ENEMY_HOMING: f32 = 0.005;
    /// Visual spin per tick
    pub const ENEMY_SPIN: f32 = 0.02;
    pub const ENEMY_SPAWN_DEPTH: f32 = -50.0;

    pub const POWERUP_SPEED: f32 = 0.3;
    pub const POWERUP_DROP_RATE: f32 = 0.2;
    pub const MAX_WEAPON_LEVEL: u8 = 5;
    /// +50% damage per weapon level
    pub const DAMAGE_MULTIPLIER_PER_LEVEL: f32 = 0.5;

    /// Pool ceilings
    pub const MAX_BULLETS: usize = 200;
    pub const MAX_ENEMIES: usize = 50;
    pub const MAX_POWERUPS: usize = 20;

    /// Collision radii
    pub const PLAYER_HIT_RADIUS: f32 = 1.2;
    pub const ENEMY_RAM_RADIUS: f32 = 2.0;
    pub const ENEMY_HIT_RADIUS: f32 = 1.5;
    pub const POWERUP_PICKUP_RADIUS: f32 = 1.5;

    /// Player bullets are dropped beyond this depth
    pub const FAR_CLIP_Z: f32 = -100.0;
    /// Enemies, enemy bullets and power-ups are dropped past this depth
    pub const NEAR_CLIP_Z: f32 = 10.0;

    pub const STARTING_LIVES: u8 = 3;
    pub const BOSS_KILL_SCORE: u64 = 1000;
    pub const FIGHTER_SCORE: u64 = 150;
    pub const DRONE_SCORE: u64 = 50;
}

/// Exponential approach used for per-tick smoothing: `from + (to - from) * factor`
#[inline]
pub fn approach(from: f32, to: f32, factor: f32) -> f32 {
    from + (to - from) * factor
}

/// Damage multiplier for a weapon power level (1-based)
#[inline]
pub fn damage_multiplier(weapon_level: u8) -> f32 {
    let level = weapon_level.clamp(1, consts::MAX_WEAPON_LEVEL);
    1.0 + f32::from(level - 1) * consts::DAMAGE_MULTIPLIER_PER_LEVEL
}
