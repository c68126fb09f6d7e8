//! Entity store -> instance transforms
//!
//! Runs once per rendered frame after the simulation has stepped. Reads the
//! world, never mutates it. Buffers are reused across frames.

use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Quat};

use super::effects::ShipPose;
use super::instance::{InstanceRaw, colors, hex_color};
use crate::consts::{MAX_BULLETS, MAX_ENEMIES, MAX_POWERUPS};
use crate::sim::state::{Bullet, EnemyKind, World};
use crate::tuning::LevelConfig;

const BOSS_SCALE: f32 = 2.0;
const POWERUP_SCALE: f32 = 0.6;

/// Boss glow by sector
const BOSS_GLOW: [[f32; 4]; 3] = [
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.67, 0.0, 1.0],
    [0.67, 0.0, 1.0, 1.0],
];

/// One instance list per mesh
#[derive(Debug, Default)]
pub struct InstanceBatches {
    pub player: Option<InstanceRaw>,
    pub blaster: Vec<InstanceRaw>,
    pub spread: Vec<InstanceRaw>,
    pub plasma: Vec<InstanceRaw>,
    pub enemy_bullets: Vec<InstanceRaw>,
    pub fighters: Vec<InstanceRaw>,
    pub drones: Vec<InstanceRaw>,
    pub powerups: Vec<InstanceRaw>,
    /// Present iff the boss slot is occupied
    pub boss: Option<InstanceRaw>,
}

impl InstanceBatches {
    pub fn with_pool_capacity() -> Self {
        Self {
            player: None,
            blaster: Vec::with_capacity(MAX_BULLETS),
            spread: Vec::with_capacity(MAX_BULLETS),
            plasma: Vec::with_capacity(MAX_BULLETS),
            enemy_bullets: Vec::with_capacity(MAX_BULLETS),
            fighters: Vec::with_capacity(MAX_ENEMIES),
            drones: Vec::with_capacity(MAX_ENEMIES),
            powerups: Vec::with_capacity(MAX_POWERUPS),
            boss: None,
        }
    }

    pub fn clear(&mut self) {
        self.player = None;
        self.blaster.clear();
        self.spread.clear();
        self.plasma.clear();
        self.enemy_bullets.clear();
        self.fighters.clear();
        self.drones.clear();
        self.powerups.clear();
        self.boss = None;
    }

    /// Total instance count across all meshes
    pub fn total(&self) -> usize {
        usize::from(self.player.is_some())
            + self.blaster.len()
            + self.spread.len()
            + self.plasma.len()
            + self.enemy_bullets.len()
            + self.fighters.len()
            + self.drones.len()
            + self.powerups.len()
            + usize::from(self.boss.is_some())
    }
}

/// Builds instance batches from the world each frame
#[derive(Debug, Default)]
pub struct Projector {
    batches: InstanceBatches,
    ship: ShipPose,
}

impl Projector {
    pub fn new() -> Self {
        Self {
            batches: InstanceBatches::with_pool_capacity(),
            ship: ShipPose::default(),
        }
    }

    pub fn ship_pose(&self) -> ShipPose {
        self.ship
    }

    /// Batches from the last `project` call
    pub fn batches(&self) -> &InstanceBatches {
        &self.batches
    }

    /// Project the world at sim time `elapsed`. With `banking` off the ship
    /// stays level (reduced motion).
    pub fn project(
        &mut self,
        world: &World,
        level: &LevelConfig,
        level_index: usize,
        elapsed: f32,
        banking: bool,
    ) -> &InstanceBatches {
        let theme = hex_color(&level.theme_color).unwrap_or_else(|| {
            log::warn!("Bad theme color {:?} for {}", level.theme_color, level.name);
            colors::WHITE
        });
        let b = &mut self.batches;
        b.clear();

        if banking {
            self.ship.update(world.player.pos, world.player.target);
        } else {
            self.ship = ShipPose::default();
        }
        b.player = Some(InstanceRaw::new(
            world.player.pos,
            self.ship.rotation(),
            1.0,
            colors::PLAYER,
        ));

        project_bullets(&world.blaster_bullets, &mut b.blaster, colors::BLASTER, None);
        project_bullets(&world.spread_bullets, &mut b.spread, colors::SPREAD, None);
        project_bullets(&world.plasma_bullets, &mut b.plasma, colors::PLASMA, Some(elapsed * 2.0));

        b.enemy_bullets.extend(
            world
                .enemy_bullets
                .iter()
                .map(|e| InstanceRaw::new(e.pos, Quat::IDENTITY, 1.0, theme)),
        );

        for enemy in &world.enemies {
            match enemy.kind {
                EnemyKind::Fighter => {
                    let bank = Quat::from_rotation_z((elapsed * 2.0).sin() * 0.5);
                    b.fighters.push(InstanceRaw::new(enemy.pos, bank, 1.0, theme));
                }
                EnemyKind::Drone => {
                    let tumble =
                        Quat::from_euler(EulerRot::XYZ, enemy.rotation, enemy.rotation, 0.0);
                    b.drones.push(InstanceRaw::new(enemy.pos, tumble, 1.0, colors::DRONE));
                }
            }
        }

        b.powerups.extend(world.powerups.iter().map(|p| {
            InstanceRaw::new(
                p.pos,
                Quat::from_rotation_y(elapsed * 3.0),
                POWERUP_SCALE,
                colors::POWERUP,
            )
        }));

        b.boss = world.boss.map(|boss| {
            let sway = Quat::from_euler(
                EulerRot::XYZ,
                0.0,
                (elapsed * 0.5).sin() * 0.1,
                elapsed.sin() * 0.1,
            );
            let glow = BOSS_GLOW[level_index.min(BOSS_GLOW.len() - 1)];
            InstanceRaw::new(boss.pos, sway, BOSS_SCALE, glow)
        });

        &self.batches
    }
}

/// Bullets travelling away from the camera are laid along the z axis;
/// `spin` rolls plasma orbs over time.
fn project_bullets<'a>(
    bullets: impl IntoIterator<Item = &'a Bullet>,
    out: &mut Vec<InstanceRaw>,
    tint: [f32; 4],
    spin: Option<f32>,
) {
    for bullet in bullets {
        let rotation = match spin {
            Some(angle) => Quat::from_euler(EulerRot::XYZ, angle, angle, 0.0),
            None if bullet.vel.z < 0.0 => Quat::from_rotation_x(FRAC_PI_2),
            None => Quat::IDENTITY,
        };
        out.push(InstanceRaw::new(bullet.pos, rotation, 1.0, tint));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Boss, Enemy, EnemyBullet};
    use crate::tuning::Tuning;
    use glam::Vec3;

    fn populated_world() -> World {
        let mut world = World::new();
        for i in 0..3 {
            let id = world.ids.next();
            world.blaster_bullets.try_push(Bullet {
                id,
                pos: Vec3::new(i as f32, 0.0, -10.0),
                vel: Vec3::new(0.0, 0.0, -1.2),
                damage: 1.0,
            });
        }
        let id = world.ids.next();
        world.enemy_bullets.try_push(EnemyBullet {
            id,
            pos: Vec3::new(0.0, 0.0, -20.0),
            vel: Vec3::new(0.0, 0.0, 0.4),
        });
        let id = world.ids.next();
        world
            .enemies
            .try_push(Enemy::new(id, EnemyKind::Fighter, Vec3::new(3.0, 1.0, -40.0), 0.375));
        let id = world.ids.next();
        world
            .enemies
            .try_push(Enemy::new(id, EnemyKind::Drone, Vec3::new(-3.0, 1.0, -40.0), 0.25));
        world
    }

    #[test]
    fn test_projection_matches_pools() {
        let tuning = Tuning::default();
        let world = populated_world();
        let mut projector = Projector::new();
        let batches = projector.project(&world, tuning.level(0), 0, 1.0, true);

        assert!(batches.player.is_some());
        assert_eq!(batches.blaster.len(), 3);
        assert_eq!(batches.enemy_bullets.len(), 1);
        assert_eq!(batches.fighters.len(), 1);
        assert_eq!(batches.drones.len(), 1);
        assert!(batches.boss.is_none());
        assert_eq!(batches.total(), 7);

        assert_eq!(batches.fighters[0].position(), Vec3::new(3.0, 1.0, -40.0));
        // Enemy bullets take the sector theme color
        let theme = hex_color(&tuning.level(0).theme_color).unwrap();
        assert_eq!(batches.enemy_bullets[0].tint, theme);
    }

    #[test]
    fn test_boss_visible_only_when_present() {
        let tuning = Tuning::default();
        let mut world = World::new();
        let mut projector = Projector::new();

        assert!(projector.project(&world, tuning.level(2), 2, 0.0, true).boss.is_none());

        world.boss = Some(Boss::spawn(500.0));
        let boss = projector
            .project(&world, tuning.level(2), 2, 0.0, true)
            .boss
            .unwrap();
        assert_eq!(boss.position(), world.boss.unwrap().pos);
        assert_eq!(boss.model[0][0], BOSS_SCALE);
        assert_eq!(boss.tint, BOSS_GLOW[2]);
    }

    #[test]
    fn test_buffers_reused_between_frames() {
        let tuning = Tuning::default();
        let mut world = populated_world();
        let mut projector = Projector::new();
        projector.project(&world, tuning.level(0), 0, 0.0, true);

        world.blaster_bullets.clear();
        let batches = projector.project(&world, tuning.level(0), 0, 0.1, true);
        assert!(batches.blaster.is_empty());
        assert!(batches.blaster.capacity() >= MAX_BULLETS);
    }

    #[test]
    fn test_reduced_motion_keeps_ship_level() {
        let tuning = Tuning::default();
        let mut world = World::new();
        world.player.target = Vec3::new(8.0, 4.0, 0.0);
        let mut projector = Projector::new();

        projector.project(&world, tuning.level(0), 0, 0.0, false);
        assert_eq!(projector.ship_pose().roll, 0.0);

        projector.project(&world, tuning.level(0), 0, 0.0, true);
        assert!(projector.ship_pose().roll != 0.0);
    }
}
