//! Entity store and core simulation types
//!
//! Everything the per-tick pipeline mutates lives in `World`. Session-level
//! fields (score, lives, level) are owned by the controller instead.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pool::Pool;
use crate::consts::*;
use crate::tuning::WeaponKind;

/// Monotonic entity id allocator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn next(&mut self) -> u32 {
        self.next = self.next.wrapping_add(1);
        self.next
    }
}

/// The player's ship. Velocity is implicit (recomputed from input each tick).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Last pointer target in world space (used for visual banking)
    pub target: Vec3,
}

impl Default for Player {
    fn default() -> Self {
        let start = Vec3::new(0.0, PLAYER_START_Y, 0.0);
        Self { pos: start, target: start }
    }
}

/// A player projectile
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec3,
    pub vel: Vec3,
    pub damage: f32,
}

/// A boss projectile
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub id: u32,
    pub pos: Vec3,
    pub vel: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Fighter,
    Drone,
}

impl EnemyKind {
    pub fn base_health(&self) -> f32 {
        match self {
            EnemyKind::Fighter => 2.0,
            EnemyKind::Drone => 1.0,
        }
    }

    pub fn score(&self) -> u64 {
        match self {
            EnemyKind::Fighter => FIGHTER_SCORE,
            EnemyKind::Drone => DRONE_SCORE,
        }
    }

    pub fn speed_factor(&self) -> f32 {
        match self {
            EnemyKind::Fighter => FIGHTER_SPEED_FACTOR,
            EnemyKind::Drone => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec3,
    pub vel: Vec3,
    pub health: f32,
    /// Visual spin accumulator
    pub rotation: f32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec3, forward_speed: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec3::new(0.0, 0.0, forward_speed * kind.speed_factor()),
            health: kind.base_health(),
            rotation: 0.0,
        }
    }
}

/// Boss lifecycle. Removal is represented by clearing the boss slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Flying in from the far depth
    Entering,
    /// Swaying at fighting depth and firing volleys
    Fighting,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub phase: BossPhase,
    /// Seconds until the next volley
    pub attack_cooldown: f32,
}

/// A weapon power-up dropped by a destroyed enemy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec3,
    pub vel: Vec3,
}

/// The entity store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub player: Player,
    pub blaster_bullets: Pool<Bullet>,
    pub spread_bullets: Pool<Bullet>,
    pub plasma_bullets: Pool<Bullet>,
    pub enemy_bullets: Pool<EnemyBullet>,
    pub enemies: Pool<Enemy>,
    pub boss: Option<Boss>,
    pub powerups: Pool<PowerUp>,
    /// Ticks simulated while playing (drives the spawn cadence)
    pub frame_count: u64,
    /// Elapsed time of the last shot; empty until the first shot of a level
    pub last_shot_time: Option<f32>,
    pub ids: EntityIds,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            player: Player::default(),
            blaster_bullets: Pool::with_cap(MAX_BULLETS),
            spread_bullets: Pool::with_cap(MAX_BULLETS),
            plasma_bullets: Pool::with_cap(MAX_BULLETS),
            enemy_bullets: Pool::with_cap(MAX_BULLETS),
            enemies: Pool::with_cap(MAX_ENEMIES),
            boss: None,
            powerups: Pool::with_cap(MAX_POWERUPS),
            frame_count: 0,
            last_shot_time: None,
            ids: EntityIds::default(),
        }
    }

    /// Clear every pool and re-center the player for a fresh level.
    ///
    /// Skipped while a boss is present so a pause/resume cycle never wipes a
    /// fight in progress; full resets empty the boss slot first.
    pub fn reset_for_level(&mut self) -> bool {
        if self.boss.is_some() {
            return false;
        }
        self.blaster_bullets.clear();
        self.spread_bullets.clear();
        self.plasma_bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.powerups.clear();
        self.player = Player::default();
        self.last_shot_time = None;
        true
    }

    pub fn bullets(&self, kind: WeaponKind) -> &Pool<Bullet> {
        match kind {
            WeaponKind::Blaster => &self.blaster_bullets,
            WeaponKind::Spread => &self.spread_bullets,
            WeaponKind::Plasma => &self.plasma_bullets,
        }
    }

    pub fn bullets_mut(&mut self, kind: WeaponKind) -> &mut Pool<Bullet> {
        match kind {
            WeaponKind::Blaster => &mut self.blaster_bullets,
            WeaponKind::Spread => &mut self.spread_bullets,
            WeaponKind::Plasma => &mut self.plasma_bullets,
        }
    }

    /// All three player bullet pools, in collision-check order
    pub fn player_bullet_pools_mut(&mut self) -> [&mut Pool<Bullet>; 3] {
        [
            &mut self.blaster_bullets,
            &mut self.spread_bullets,
            &mut self.plasma_bullets,
        ]
    }

    pub fn player_bullet_count(&self) -> usize {
        self.blaster_bullets.len() + self.spread_bullets.len() + self.plasma_bullets.len()
    }
}
