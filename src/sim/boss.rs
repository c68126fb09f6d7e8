//! Sector boss: spawn trigger, entering/fighting state machine, volleys and
//! hull hits.

use glam::Vec3;

use super::collision::{Aabb, BOSS_HALF_EXTENTS, direction};
use super::state::{Boss, BossPhase, EnemyBullet, World};
use crate::consts::*;
use crate::tuning::LevelConfig;

/// Where the boss appears
pub const BOSS_SPAWN_POS: Vec3 = Vec3::new(0.0, 2.0, -80.0);
/// Depth advance per tick while entering
pub const BOSS_ENTER_SPEED: f32 = 0.3;
/// Depth at which the boss starts fighting
pub const BOSS_FIGHT_DEPTH: f32 = -35.0;
/// Sway amplitudes and angular frequencies while fighting
pub const BOSS_SWAY_X: f32 = 12.0;
pub const BOSS_SWAY_Y: f32 = 3.0;
const SWAY_FREQ_X: f32 = 0.5;
const SWAY_FREQ_Y: f32 = 0.7;

const BASE_FAN: [f32; 4] = [-0.3, -0.1, 0.1, 0.3];
const WIDE_FAN: [f32; 2] = [-0.4, 0.4];

/// Lateral offsets of one volley; sectors past the first add the outer pair
pub fn volley_offsets(level_index: usize) -> impl Iterator<Item = f32> {
    let wide: &[f32] = if level_index >= 1 { &WIDE_FAN } else { &[] };
    BASE_FAN.into_iter().chain(wide.iter().copied())
}

/// Seconds between volleys; later sectors fire faster, floored at 0.5
pub fn attack_cooldown(level_index: usize) -> f32 {
    (1.2 - level_index as f32 * 0.2).max(0.5)
}

impl Boss {
    pub fn spawn(max_health: f32) -> Self {
        Self {
            pos: BOSS_SPAWN_POS,
            health: max_health,
            max_health,
            phase: BossPhase::Entering,
            attack_cooldown: 0.0,
        }
    }

    /// Health as a 0..1 ratio for the HUD bar
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    fn hull(&self) -> Aabb {
        Aabb::new(self.pos, BOSS_HALF_EXTENTS)
    }
}

/// Spawn the sector boss once the score threshold is met. Clears the enemy
/// pool; returns the new boss's max health when a spawn happened.
pub fn try_spawn(world: &mut World, score: u64, level: &LevelConfig) -> Option<f32> {
    if world.boss.is_some() || score < level.boss_score_threshold {
        return None;
    }
    world.boss = Some(Boss::spawn(level.boss_hp));
    world.enemies.clear();
    log::info!("Boss spawned for {} ({} hp)", level.name, level.boss_hp);
    Some(level.boss_hp)
}

/// Advance the boss state machine and fire volleys. Returns the number of
/// enemy bullets spawned.
pub fn update(world: &mut World, elapsed: f32, dt: f32, level_index: usize) -> usize {
    let player_pos = world.player.pos;
    let Some(boss) = world.boss.as_mut() else {
        return 0;
    };

    match boss.phase {
        BossPhase::Entering => {
            boss.pos.z += BOSS_ENTER_SPEED;
            if boss.pos.z >= BOSS_FIGHT_DEPTH {
                boss.phase = BossPhase::Fighting;
                log::debug!("Boss reached fighting depth");
            }
            0
        }
        BossPhase::Fighting => {
            boss.pos.x = (elapsed * SWAY_FREQ_X).sin() * BOSS_SWAY_X;
            boss.pos.y = (elapsed * SWAY_FREQ_Y).cos() * BOSS_SWAY_Y;

            boss.attack_cooldown -= dt;
            if boss.attack_cooldown > 0.0 {
                return 0;
            }
            boss.attack_cooldown = attack_cooldown(level_index);

            let origin = boss.pos;
            let aim = direction(origin, player_pos);
            let mut fired = 0;
            for offset in volley_offsets(level_index) {
                let dir = Vec3::new(aim.x + offset, aim.y, aim.z);
                let id = world.ids.next();
                let bullet = EnemyBullet {
                    id,
                    pos: Vec3::new(origin.x + offset * 10.0, origin.y - 1.0, origin.z + 4.0),
                    vel: Vec3::new(
                        dir.x * ENEMY_BULLET_SPEED,
                        dir.y * ENEMY_BULLET_SPEED,
                        ENEMY_BULLET_SPEED,
                    ),
                };
                if world.enemy_bullets.try_push(bullet) {
                    fired += 1;
                }
            }
            fired
        }
    }
}

/// Result of resolving player bullets against the boss hull
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BossHits {
    pub hits: u32,
    pub damage: f32,
    /// Boss health after this tick's hits (0 when defeated)
    pub health: Option<f32>,
    pub defeated: bool,
}

/// Test every player bullet against the boss hull. Hit bullets are consumed.
/// On defeat the boss slot is cleared and checking stops.
pub fn resolve_hits(world: &mut World) -> BossHits {
    let mut result = BossHits::default();
    let Some(mut boss) = world.boss else {
        return result;
    };
    let hull = boss.hull();

    'pools: for pool in world.player_bullet_pools_mut() {
        let mut j = pool.len();
        while j > 0 {
            j -= 1;
            let bullet = pool.as_slice()[j];
            if !hull.contains(bullet.pos) {
                continue;
            }
            pool.swap_remove(j);
            boss.health -= bullet.damage;
            result.hits += 1;
            result.damage += bullet.damage;
            if boss.health <= 0.0 {
                result.defeated = true;
                break 'pools;
            }
        }
    }

    if result.defeated {
        world.boss = None;
        result.health = Some(0.0);
        log::info!("Boss defeated");
    } else if result.hits > 0 {
        result.health = Some(boss.health);
        world.boss = Some(boss);
    }
    result
}
