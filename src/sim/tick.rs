//! Per-tick simulation pipeline
//!
//! One call advances the world by one fixed step. Stages run in a fixed
//! order and later stages see the results of earlier ones:
//! player -> firing -> boss trigger -> enemy spawn -> projectiles -> boss ->
//! enemies -> power-ups.
//!
//! The core never touches session fields directly. It reads a `Session`
//! snapshot and reports deltas in a `TickOutcome`.

use glam::{Vec2, Vec3};

use super::boss;
use super::collision::within_radius;
use super::rng::SpawnRoll;
use super::state::{Bullet, Enemy, EnemyKind, PowerUp, World};
use crate::consts::*;
use crate::session::{GamePhase, Session};
use crate::tuning::{LevelConfig, Tuning, WeaponConfig, WeaponKind};
use crate::{approach, damage_multiplier};

/// Input for a single tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Monotonic elapsed time in seconds
    pub elapsed: f32,
    /// Pointer position, roughly [-1, 1] per axis
    pub pointer: Vec2,
    /// Fire held (mouse button / space)
    pub fire: bool,
    /// World half-extents of the viewport at the play plane
    pub viewport: Vec2,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            pointer: Vec2::ZERO,
            fire: false,
            viewport: Vec2::new(VIEW_HALF_WIDTH, VIEW_HALF_HEIGHT),
        }
    }
}

/// Phase change requested by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    GameOver,
    LevelComplete,
}

/// Gameplay events raised during a tick (for logging, audio and effects)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Fired { weapon: WeaponKind, projectiles: u32 },
    EnemySpawned { kind: EnemyKind },
    EnemyDestroyed { kind: EnemyKind, pos: Vec3 },
    PlayerHit { pos: Vec3 },
    BossSpawned { max_health: f32 },
    BossVolley { bullets: u32 },
    BossDamaged { health: f32 },
    BossDefeated,
    PowerUpDropped { pos: Vec3 },
    PowerUpCollected,
}

/// Session-level effects of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub score_delta: u64,
    pub lives_lost: u8,
    /// Latest boss health for the HUD, when it changed
    pub boss_health: Option<f32>,
    /// Max health of a boss spawned this tick
    pub boss_max_health: Option<f32>,
    pub weapon_levels_gained: u8,
    /// Strongest camera shake requested (visual only)
    pub shake: f32,
    pub transition: Option<Transition>,
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    /// Reset to an empty outcome without freeing the event buffer
    pub fn clear(&mut self) {
        let mut events = std::mem::take(&mut self.events);
        events.clear();
        *self = Self {
            events,
            ..Default::default()
        };
    }

    fn request(&mut self, transition: Transition) {
        // Game over outranks level complete within the same tick
        if self.transition != Some(Transition::GameOver) {
            self.transition = Some(transition);
        }
    }

    fn shake(&mut self, intensity: f32) {
        self.shake = self.shake.max(intensity);
    }

    /// Record a life lost; requests game over once none remain
    fn lose_life(&mut self, lives_at_start: u8, pos: Vec3, shake: f32) {
        self.lives_lost = self.lives_lost.saturating_add(1);
        self.shake(shake);
        self.events.push(GameEvent::PlayerHit { pos });
        if lives_at_start.saturating_sub(self.lives_lost) == 0 {
            self.request(Transition::GameOver);
        }
    }
}

/// Advance the world by one tick.
///
/// No-op unless the session is `Playing`, and for a non-positive or
/// non-finite `dt` (stalled frame).
pub fn tick<R: SpawnRoll + ?Sized>(
    world: &mut World,
    session: &Session,
    tuning: &Tuning,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
) -> TickOutcome {
    let mut out = TickOutcome::default();
    tick_into(world, session, tuning, input, dt, rng, &mut out);
    out
}

/// `tick` writing into a reused outcome; its event buffer keeps its capacity
pub fn tick_into<R: SpawnRoll + ?Sized>(
    world: &mut World,
    session: &Session,
    tuning: &Tuning,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
    out: &mut TickOutcome,
) {
    out.clear();

    if session.phase != GamePhase::Playing {
        return;
    }
    if !(dt > 0.0 && dt.is_finite()) {
        log::debug!("Skipping tick with dt = {}", dt);
        return;
    }

    let level = tuning.level(session.level_index);
    world.frame_count += 1;

    update_player(world, input);
    let fresh = fire(
        world,
        session.weapon,
        tuning.weapon(session.weapon),
        session.weapon_level,
        input.elapsed,
        input.fire,
        out,
    );

    if let Some(max_health) = boss::try_spawn(world, session.score, level) {
        out.boss_max_health = Some(max_health);
        out.boss_health = Some(max_health);
        out.events.push(GameEvent::BossSpawned { max_health });
    }

    spawn_enemy(world, level, input.viewport, rng, out);

    advance_player_bullets(world, session.weapon, fresh);
    advance_enemy_bullets(world, session.lives, out);

    if world.boss.is_some() {
        let fired = boss::update(world, input.elapsed, dt, session.level_index);
        if fired > 0 {
            out.events.push(GameEvent::BossVolley { bullets: fired as u32 });
        }
        let hits = boss::resolve_hits(world);
        if let Some(health) = hits.health {
            out.boss_health = Some(health);
            out.events.push(GameEvent::BossDamaged { health });
        }
        if hits.defeated {
            out.score_delta += BOSS_KILL_SCORE;
            out.events.push(GameEvent::BossDefeated);
            out.request(Transition::LevelComplete);
        }
    }

    update_enemies(world, session.lives, rng, out);
    update_powerups(world, out);
}

/// Low-pass the player toward the pointer target, then clamp to the play area
fn update_player(world: &mut World, input: &TickInput) {
    let player = &mut world.player;
    // Garbage pointer input holds position instead of poisoning it
    let target = if input.pointer.is_finite() && input.viewport.is_finite() {
        let t = input.pointer * input.viewport;
        Vec3::new(t.x, t.y, player.pos.z)
    } else {
        player.pos
    };
    player.target = target;

    player.pos.x = approach(player.pos.x, target.x, PLAYER_SPEED).clamp(-PLAYER_LIMIT_X, PLAYER_LIMIT_X);
    player.pos.y = approach(player.pos.y, target.y, PLAYER_SPEED).clamp(-PLAYER_LIMIT_Y, PLAYER_LIMIT_Y);
}

/// Lateral velocity offsets for one spread shot
const SPREAD_FAN: [f32; 3] = [-0.3, 0.0, 0.3];
const SINGLE_SHOT: [f32; 1] = [0.0];

fn fire(
    world: &mut World,
    kind: WeaponKind,
    weapon: &WeaponConfig,
    weapon_level: u8,
    elapsed: f32,
    requested: bool,
    out: &mut TickOutcome,
) -> usize {
    if !requested {
        return 0;
    }
    let ready = world
        .last_shot_time
        .is_none_or(|last| elapsed - last > weapon.cooldown);
    if !ready {
        return 0;
    }
    world.last_shot_time = Some(elapsed);

    let origin = world.player.pos;
    let damage = weapon.damage * damage_multiplier(weapon_level);
    let forward = Vec3::new(0.0, 0.0, -weapon.speed);

    let (offsets, muzzle, shake) = match kind {
        WeaponKind::Blaster => (&SINGLE_SHOT[..], 1.0, 0.1),
        WeaponKind::Spread => (&SPREAD_FAN[..], 1.0, 0.2),
        WeaponKind::Plasma => (&SINGLE_SHOT[..], 2.0, 0.4),
    };

    let mut spawned = 0;
    for &dx in offsets {
        let id = world.ids.next();
        let bullet = Bullet {
            id,
            pos: origin - Vec3::new(0.0, 0.0, muzzle),
            vel: forward + Vec3::new(dx, 0.0, 0.0),
            damage,
        };
        if world.bullets_mut(kind).try_push(bullet) {
            spawned += 1;
        }
    }
    if spawned > 0 {
        out.shake(shake);
        out.events.push(GameEvent::Fired { weapon: kind, projectiles: spawned });
    }
    spawned as usize
}

fn spawn_enemy<R: SpawnRoll + ?Sized>(
    world: &mut World,
    level: &LevelConfig,
    viewport: Vec2,
    rng: &mut R,
    out: &mut TickOutcome,
) {
    if world.boss.is_some() || world.enemies.is_full() {
        return;
    }
    let rate = u64::from(level.spawn_rate.max(1));
    if world.frame_count % rate != 0 {
        return;
    }

    let kind = if rng.roll() > 0.5 {
        EnemyKind::Fighter
    } else {
        EnemyKind::Drone
    };
    let x = rng.centered() * viewport.x * 2.0 * 1.2;
    let y = rng.centered() * viewport.y * 2.0;
    let id = world.ids.next();
    let enemy = Enemy::new(
        id,
        kind,
        Vec3::new(x, y, ENEMY_SPAWN_DEPTH),
        ENEMY_SPEED * level.enemy_speed_multiplier,
    );
    if world.enemies.try_push(enemy) {
        out.events.push(GameEvent::EnemySpawned { kind });
    }
}

/// Bullets fired this tick sit at the end of the `fired` pool and hold
/// still until the next tick.
fn advance_player_bullets(world: &mut World, fired: WeaponKind, fresh: usize) {
    for kind in WeaponKind::ALL {
        let pool = world.bullets_mut(kind);
        let fresh = if kind == fired { fresh } else { 0 };
        let moving = pool.len().saturating_sub(fresh);
        for bullet in pool.iter_mut().take(moving) {
            bullet.pos += bullet.vel;
        }
        pool.retain(|b| b.pos.z >= FAR_CLIP_Z);
    }
}

fn advance_enemy_bullets(world: &mut World, lives: u8, out: &mut TickOutcome) {
    let player_pos = world.player.pos;
    let pool = &mut world.enemy_bullets;
    let mut i = pool.len();
    while i > 0 {
        i -= 1;
        let Some(bullet) = pool.get_mut(i) else {
            continue;
        };
        bullet.pos += bullet.vel;
        let pos = bullet.pos;

        if within_radius(player_pos, pos, PLAYER_HIT_RADIUS) {
            pool.swap_remove(i);
            out.lose_life(lives, player_pos, 1.5);
        } else if pos.z > NEAR_CLIP_Z {
            pool.swap_remove(i);
        }
    }
}

fn update_enemies<R: SpawnRoll + ?Sized>(
    world: &mut World,
    lives: u8,
    rng: &mut R,
    out: &mut TickOutcome,
) {
    let player_pos = world.player.pos;
    let mut i = world.enemies.len();
    while i > 0 {
        i -= 1;
        let Some(enemy) = world.enemies.get_mut(i) else {
            continue;
        };
        enemy.pos.z += enemy.vel.z;
        enemy.pos.x = approach(enemy.pos.x, player_pos.x, ENEMY_HOMING);
        enemy.pos.y = approach(enemy.pos.y, player_pos.y, ENEMY_HOMING);
        enemy.rotation += ENEMY_SPIN;

        if within_radius(player_pos, enemy.pos, ENEMY_RAM_RADIUS) {
            world.enemies.swap_remove(i);
            out.lose_life(lives, player_pos, 1.0);
            continue;
        }

        // At most one bullet resolves per enemy per tick
        let enemy_pos = enemy.pos;
        let mut damage = None;
        for pool in [
            &mut world.blaster_bullets,
            &mut world.spread_bullets,
            &mut world.plasma_bullets,
        ] {
            let hit = pool
                .iter()
                .position(|b| within_radius(b.pos, enemy_pos, ENEMY_HIT_RADIUS));
            if let Some(j) = hit {
                damage = Some(pool.swap_remove(j).damage);
                break;
            }
        }

        let Some(enemy) = world.enemies.get_mut(i) else {
            continue;
        };
        if let Some(damage) = damage {
            enemy.health -= damage;
            if enemy.health <= 0.0 {
                let dead = world.enemies.swap_remove(i);
                out.score_delta += dead.kind.score();
                out.events.push(GameEvent::EnemyDestroyed { kind: dead.kind, pos: dead.pos });
                maybe_drop_powerup(world, dead.pos, rng, out);
                continue;
            }
        }
        if enemy.pos.z > NEAR_CLIP_Z {
            world.enemies.swap_remove(i);
        }
    }
}

fn maybe_drop_powerup<R: SpawnRoll + ?Sized>(
    world: &mut World,
    pos: Vec3,
    rng: &mut R,
    out: &mut TickOutcome,
) {
    if !rng.chance(POWERUP_DROP_RATE) {
        return;
    }
    let id = world.ids.next();
    let dropped = world.powerups.try_push(PowerUp {
        id,
        pos,
        vel: Vec3::new(0.0, 0.0, POWERUP_SPEED),
    });
    if dropped {
        out.events.push(GameEvent::PowerUpDropped { pos });
    }
}

fn update_powerups(world: &mut World, out: &mut TickOutcome) {
    let player_pos = world.player.pos;
    let mut i = world.powerups.len();
    while i > 0 {
        i -= 1;
        let Some(powerup) = world.powerups.get_mut(i) else {
            continue;
        };
        powerup.pos += powerup.vel;
        let pos = powerup.pos;

        if within_radius(player_pos, pos, POWERUP_PICKUP_RADIUS) {
            world.powerups.swap_remove(i);
            out.weapon_levels_gained = out.weapon_levels_gained.saturating_add(1);
            out.events.push(GameEvent::PowerUpCollected);
        } else if pos.z > NEAR_CLIP_Z {
            world.powerups.swap_remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Boss, BossPhase, EnemyBullet};

    /// Replays a fixed list of rolls, then repeats the last one
    struct Scripted {
        rolls: Vec<f32>,
        next: usize,
    }

    impl Scripted {
        fn new(rolls: &[f32]) -> Self {
            Self { rolls: rolls.to_vec(), next: 0 }
        }
    }

    impl SpawnRoll for Scripted {
        fn roll(&mut self) -> f32 {
            let r = self.rolls[self.next.min(self.rolls.len() - 1)];
            self.next += 1;
            r
        }
    }

    fn playing() -> Session {
        let mut session = Session::new();
        session.phase = GamePhase::Playing;
        session
    }

    fn bullet(world: &mut World, pos: Vec3, damage: f32) -> Bullet {
        Bullet {
            id: world.ids.next(),
            pos,
            vel: Vec3::new(0.0, 0.0, -1.2),
            damage,
        }
    }

    fn firing(elapsed: f32) -> TickInput {
        TickInput {
            elapsed,
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_noop_unless_playing() {
        let tuning = Tuning::default();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);
        for phase in [GamePhase::Menu, GamePhase::Paused, GamePhase::GameOver, GamePhase::LevelComplete] {
            let mut session = Session::new();
            session.phase = phase;
            let out = tick(&mut world, &session, &tuning, &firing(1.0), SIM_DT, &mut rng);
            assert_eq!(out, TickOutcome::default());
        }
        assert_eq!(world.frame_count, 0);
        assert_eq!(world.player_bullet_count(), 0);
    }

    #[test]
    fn test_stalled_frame_is_noop() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let id = world.ids.next();
        world.enemies.try_push(Enemy::new(id, EnemyKind::Drone, Vec3::new(5.0, 0.0, -20.0), ENEMY_SPEED));
        let before = world.enemies.as_slice()[0].pos;
        let mut rng = Scripted::new(&[0.9]);

        for dt in [0.0, -0.5, f32::NAN] {
            tick(&mut world, &session, &tuning, &firing(1.0), dt, &mut rng);
        }
        assert_eq!(world.enemies.as_slice()[0].pos, before);
        assert_eq!(world.player_bullet_count(), 0);
        assert_eq!(world.frame_count, 0);
    }

    #[test]
    fn test_blaster_scenario() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);

        let out = tick(&mut world, &session, &tuning, &firing(0.0), SIM_DT, &mut rng);
        assert_eq!(world.blaster_bullets.len(), 1);
        assert_eq!(world.blaster_bullets.as_slice()[0].vel, Vec3::new(0.0, 0.0, -1.2));
        assert!(out.events.contains(&GameEvent::Fired { weapon: WeaponKind::Blaster, projectiles: 1 }));

        // Spawned bullets are not advanced on the tick they are fired
        let z0 = world.blaster_bullets.as_slice()[0].pos.z;
        assert!((z0 - -1.0).abs() < 1e-4);

        let idle = TickInput::default();
        let mut removed_at = None;
        for n in 1..=100 {
            tick(&mut world, &session, &tuning, &idle, SIM_DT, &mut rng);
            if let Some(b) = world.blaster_bullets.iter().next() {
                assert!(b.pos.z >= FAR_CLIP_Z);
            } else if removed_at.is_none() {
                removed_at = Some(n);
            }
        }
        // -1 - 1.2 * 84 < -100 while -1 - 1.2 * 82 > -100
        let removed_at = removed_at.expect("bullet should leave the far clip");
        assert!((83..=85).contains(&removed_at), "removed at {removed_at}");
    }

    #[test]
    fn test_cooldown_respected() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);

        tick(&mut world, &session, &tuning, &firing(0.0), SIM_DT, &mut rng);
        tick(&mut world, &session, &tuning, &firing(0.1), SIM_DT, &mut rng);
        assert_eq!(world.blaster_bullets.len(), 1);

        tick(&mut world, &session, &tuning, &firing(0.2), SIM_DT, &mut rng);
        assert_eq!(world.blaster_bullets.len(), 2);
    }

    #[test]
    fn test_spread_and_plasma_shapes() {
        let tuning = Tuning::default();
        let mut session = playing();
        session.weapon = WeaponKind::Spread;
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);

        tick(&mut world, &session, &tuning, &firing(0.0), SIM_DT, &mut rng);
        let mut lateral: Vec<f32> = world.spread_bullets.iter().map(|b| b.vel.x).collect();
        lateral.sort_by(f32::total_cmp);
        assert_eq!(lateral, vec![-0.3, 0.0, 0.3]);

        session.weapon = WeaponKind::Plasma;
        session.weapon_level = 3;
        tick(&mut world, &session, &tuning, &firing(1.0), SIM_DT, &mut rng);
        let plasma = world.plasma_bullets.as_slice()[0];
        // Two units ahead of the player, damage 5 * (1 + 2 * 0.5)
        assert!((plasma.pos.z - (world.player.pos.z - 2.0)).abs() < 1e-4);
        assert_eq!(plasma.damage, 10.0);
        assert_eq!(plasma.vel.z, -0.8);
    }

    #[test]
    fn test_enemy_spawn_cadence_and_shape() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        // fighter, centered x, centered y
        let mut rng = Scripted::new(&[0.9, 0.5, 0.5]);
        let idle = TickInput::default();

        for _ in 0..49 {
            tick(&mut world, &session, &tuning, &idle, SIM_DT, &mut rng);
        }
        assert!(world.enemies.is_empty());
        tick(&mut world, &session, &tuning, &idle, SIM_DT, &mut rng);
        assert_eq!(world.enemies.len(), 1);

        let enemy = world.enemies.as_slice()[0];
        assert_eq!(enemy.kind, EnemyKind::Fighter);
        assert_eq!(enemy.health, 2.0);
        assert!((enemy.vel.z - ENEMY_SPEED * 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_enemy_pool_cap() {
        let mut tuning = Tuning::default();
        tuning.levels[0].spawn_rate = 1;
        tuning.levels[0].boss_score_threshold = u64::MAX;
        let session = playing();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.1, 0.5, 0.5]);
        let idle = TickInput::default();

        // Freeze enemies far away so none are culled
        for _ in 0..(MAX_ENEMIES + 20) {
            tick(&mut world, &session, &tuning, &idle, SIM_DT, &mut rng);
            for e in world.enemies.iter_mut() {
                e.pos.z = -60.0;
            }
        }
        assert_eq!(world.enemies.len(), MAX_ENEMIES);
    }

    #[test]
    fn test_drone_killed_by_single_bullet() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let id = world.ids.next();
        world.enemies.try_push(Enemy::new(id, EnemyKind::Drone, Vec3::new(6.0, 3.0, -30.0), ENEMY_SPEED));
        let b = bullet(&mut world, Vec3::new(6.0, 3.0, -30.0 + 1.2), 1.0);
        world.blaster_bullets.try_push(b);
        // No power-up drop
        let mut rng = Scripted::new(&[0.9]);

        let out = tick(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng);
        assert!(world.enemies.is_empty());
        assert!(world.blaster_bullets.is_empty());
        assert_eq!(out.score_delta, DRONE_SCORE);
        assert!(world.powerups.is_empty());
    }

    #[test]
    fn test_one_bullet_per_enemy_per_tick() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let id = world.ids.next();
        let mut fighter = Enemy::new(id, EnemyKind::Fighter, Vec3::new(-6.0, 3.0, -30.0), ENEMY_SPEED);
        fighter.health = 2.0;
        world.enemies.try_push(fighter);
        let b = bullet(&mut world, Vec3::new(-6.0, 3.0, -30.0), 1.0);
        world.blaster_bullets.try_push(b);
        let b = bullet(&mut world, Vec3::new(-6.0, 3.0, -30.0), 1.0);
        world.spread_bullets.try_push(b);
        let mut rng = Scripted::new(&[0.9]);

        // Freeze bullets in place
        for pool in world.player_bullet_pools_mut() {
            for b in pool.iter_mut() {
                b.vel = Vec3::ZERO;
            }
        }
        let out = tick(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies.as_slice()[0].health, 1.0);
        assert_eq!(world.player_bullet_count(), 1);
        assert_eq!(out.score_delta, 0);
    }

    #[test]
    fn test_enemy_ram_costs_life_and_game_over() {
        let tuning = Tuning::default();
        let mut session = playing();
        session.lives = 1;
        let mut world = World::new();
        let player = world.player.pos;
        let id = world.ids.next();
        world.enemies.try_push(Enemy::new(id, EnemyKind::Fighter, player - Vec3::new(0.0, 0.0, 0.5), ENEMY_SPEED));
        let mut rng = Scripted::new(&[0.9]);

        let out = tick(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng);
        assert!(world.enemies.is_empty());
        assert_eq!(out.lives_lost, 1);
        assert_eq!(out.transition, Some(Transition::GameOver));
        assert_eq!(out.shake, 1.0);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let player = world.player.pos;
        let id = world.ids.next();
        world.enemy_bullets.try_push(EnemyBullet {
            id,
            pos: player - Vec3::new(0.0, 0.0, 1.0),
            vel: Vec3::new(0.0, 0.0, ENEMY_BULLET_SPEED),
        });
        let id = world.ids.next();
        world.enemy_bullets.try_push(EnemyBullet {
            id,
            pos: Vec3::new(10.0, 5.0, 9.9),
            vel: Vec3::new(0.0, 0.0, ENEMY_BULLET_SPEED),
        });
        let mut rng = Scripted::new(&[0.9]);

        let out = tick(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(out.lives_lost, 1);
        assert_eq!(out.shake, 1.5);
        assert_eq!(out.transition, None);
        // One hit the player, the other passed the near clip
        assert!(world.enemy_bullets.is_empty());
    }

    #[test]
    fn test_boss_trigger_freezes_enemy_spawning() {
        let mut tuning = Tuning::default();
        tuning.levels[0].spawn_rate = 1;
        let mut session = playing();
        session.score = 500;
        let mut world = World::new();
        let id = world.ids.next();
        world.enemies.try_push(Enemy::new(id, EnemyKind::Drone, Vec3::new(0.0, 0.0, -40.0), ENEMY_SPEED));
        let mut rng = Scripted::new(&[0.9, 0.5, 0.5]);

        let out = tick(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng);
        assert_eq!(out.boss_max_health, Some(300.0));
        assert!(world.boss.is_some());
        assert!(world.enemies.is_empty());

        for _ in 0..30 {
            tick(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng);
            assert!(world.enemies.is_empty());
        }
    }

    #[test]
    fn test_boss_defeat_in_one_tick() {
        let tuning = Tuning::default();
        let mut session = playing();
        session.score = 700;
        let mut world = World::new();
        world.boss = Some(Boss {
            pos: Vec3::new(0.0, 0.0, -60.0),
            health: 3.0,
            max_health: 300.0,
            phase: BossPhase::Entering,
            attack_cooldown: 0.0,
        });
        // Lands inside the hull after the boss moves 0.3 forward and the bullet 1.2
        let b = bullet(&mut world, Vec3::new(1.0, 0.0, -58.5), 5.0);
        world.plasma_bullets.try_push(b);
        let mut rng = Scripted::new(&[0.9]);

        let out = tick(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng);
        assert!(world.boss.is_none());
        assert_eq!(out.score_delta, BOSS_KILL_SCORE);
        assert_eq!(out.boss_health, Some(0.0));
        assert_eq!(out.transition, Some(Transition::LevelComplete));
    }

    #[test]
    fn test_game_over_outranks_level_complete() {
        let mut out = TickOutcome::default();
        out.request(Transition::GameOver);
        out.request(Transition::LevelComplete);
        assert_eq!(out.transition, Some(Transition::GameOver));
    }

    #[test]
    fn test_powerup_drop_and_pickup() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let id = world.ids.next();
        world.enemies.try_push(Enemy::new(id, EnemyKind::Drone, Vec3::new(0.0, -2.0, -5.0), ENEMY_SPEED));
        let b = bullet(&mut world, Vec3::new(0.0, -2.0, -5.0 + 1.45), 1.0);
        world.blaster_bullets.try_push(b);
        // Roll under the drop rate
        let mut rng = Scripted::new(&[0.05]);
        let idle = TickInput {
            pointer: Vec2::new(0.0, -2.0 / VIEW_HALF_HEIGHT),
            ..Default::default()
        };

        let out = tick(&mut world, &session, &tuning, &idle, SIM_DT, &mut rng);
        assert_eq!(world.powerups.len(), 1);
        assert!(out.events.iter().any(|e| matches!(e, GameEvent::PowerUpDropped { .. })));

        let mut gained = 0;
        for _ in 0..30 {
            gained += tick(&mut world, &session, &tuning, &idle, SIM_DT, &mut rng).weapon_levels_gained;
        }
        assert_eq!(gained, 1);
        assert!(world.powerups.is_empty());
    }

    #[test]
    fn test_pointer_garbage_holds_position() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);
        let start = world.player.pos;
        let input = TickInput {
            pointer: Vec2::new(f32::NAN, f32::INFINITY),
            ..Default::default()
        };
        tick(&mut world, &session, &tuning, &input, SIM_DT, &mut rng);
        assert_eq!(world.player.pos, start);
    }

    #[test]
    fn test_fresh_bullets_hold_until_next_tick() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);
        let player_z = world.player.pos.z;

        tick(&mut world, &session, &tuning, &firing(0.0), SIM_DT, &mut rng);
        assert_eq!(world.blaster_bullets.as_slice()[0].pos.z, player_z - 1.0);

        // Second shot: the old bullet moves, the new one stays at the muzzle
        tick(&mut world, &session, &tuning, &firing(0.2), SIM_DT, &mut rng);
        let mut depths: Vec<f32> = world.blaster_bullets.iter().map(|b| b.pos.z).collect();
        depths.sort_by(f32::total_cmp);
        assert_eq!(depths.len(), 2);
        assert!((depths[0] - (player_z - 2.2)).abs() < 1e-5);
        assert_eq!(depths[1], player_z - 1.0);
    }

    #[test]
    fn test_enemy_past_near_clip_removed() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);
        let id = world.ids.next();
        world
            .enemies
            .try_push(Enemy::new(id, EnemyKind::Drone, Vec3::new(10.0, 5.0, 9.9), ENEMY_SPEED));

        let out = tick(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng);
        assert!(world.enemies.is_empty());
        assert_eq!(out.lives_lost, 0);
        assert_eq!(out.score_delta, 0);
    }

    #[test]
    fn test_enemy_homes_toward_player() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);
        world.player.pos = Vec3::ZERO;
        let id = world.ids.next();
        world
            .enemies
            .try_push(Enemy::new(id, EnemyKind::Drone, Vec3::new(10.0, 0.0, -40.0), ENEMY_SPEED));

        tick(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng);
        let enemy = world.enemies.as_slice()[0];
        assert!((enemy.pos.x - 9.95).abs() < 1e-5);
        assert_eq!(enemy.pos.y, 0.0);
        assert!((enemy.pos.z - (-40.0 + ENEMY_SPEED)).abs() < 1e-5);
        assert!((enemy.rotation - ENEMY_SPIN).abs() < 1e-6);
    }

    #[test]
    fn test_boss_sways_while_fighting() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);
        world.boss = Some(Boss {
            pos: Vec3::new(0.0, 0.0, -35.0),
            health: 300.0,
            max_health: 300.0,
            phase: BossPhase::Fighting,
            attack_cooldown: 10.0,
        });
        let input = TickInput {
            elapsed: 2.0,
            ..Default::default()
        };

        tick(&mut world, &session, &tuning, &input, SIM_DT, &mut rng);
        let boss = world.boss.unwrap();
        assert!((boss.pos.x - (2.0f32 * 0.5).sin() * 12.0).abs() < 1e-4);
        assert!((boss.pos.y - (2.0f32 * 0.7).cos() * 3.0).abs() < 1e-4);
        assert_eq!(boss.pos.z, -35.0);
    }

    #[test]
    fn test_tick_into_reuses_event_buffer() {
        let tuning = Tuning::default();
        let session = playing();
        let mut world = World::new();
        let mut rng = Scripted::new(&[0.9]);
        let mut out = TickOutcome::default();

        tick_into(&mut world, &session, &tuning, &firing(0.0), SIM_DT, &mut rng, &mut out);
        assert_eq!(out.events.len(), 1);
        assert!(out.shake > 0.0);
        let capacity = out.events.capacity();

        tick_into(&mut world, &session, &tuning, &TickInput::default(), SIM_DT, &mut rng, &mut out);
        assert!(out.events.is_empty());
        assert_eq!(out.shake, 0.0);
        assert_eq!(out.events.capacity(), capacity);
    }
}
