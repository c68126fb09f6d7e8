//! Session bookkeeping and the game-state controller
//!
//! `Session` holds the canonical score/lives/weapon/level fields. `Game`
//! owns the session, the entity store and the RNG, drives the fixed-timestep
//! simulation, and exposes the phase transitions the UI can request.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::renderer::CameraShake;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, TickInput, TickOutcome, Transition, World};
use crate::tuning::{LevelConfig, SceneryKind, Tuning, TuningError, WeaponKind};

/// Boss max health shown before any boss has spawned
const DEFAULT_BOSS_MAX_HEALTH: f32 = 100.0;
/// Longest frame the driver will try to catch up on
const MAX_FRAME_DT: f32 = 0.1;

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
    LevelComplete,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "MENU",
            GamePhase::Playing => "PLAYING",
            GamePhase::Paused => "PAUSED",
            GamePhase::GameOver => "GAME_OVER",
            GamePhase::LevelComplete => "LEVEL_COMPLETE",
        }
    }
}

/// Canonical session fields, read by the simulation each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// Never decreases within a run
    pub score: u64,
    pub lives: u8,
    pub weapon: WeaponKind,
    /// 1..=MAX_WEAPON_LEVEL
    pub weapon_level: u8,
    pub level_index: usize,
    /// Mirrored for the HUD health bar
    pub boss_health: f32,
    pub boss_max_health: f32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            lives: STARTING_LIVES,
            weapon: WeaponKind::default(),
            weapon_level: 1,
            level_index: 0,
            boss_health: 0.0,
            boss_max_health: DEFAULT_BOSS_MAX_HEALTH,
        }
    }

    /// Reset everything a fresh run resets. The selected weapon is kept.
    fn reset_run(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.weapon_level = 1;
        self.level_index = 0;
        self.boss_health = 0.0;
        self.boss_max_health = DEFAULT_BOSS_MAX_HEALTH;
    }

    /// Fold one tick's effects into the session. Returns the new phase when
    /// the tick caused a transition.
    pub fn apply(&mut self, out: &TickOutcome) -> Option<GamePhase> {
        self.score = self.score.saturating_add(out.score_delta);
        self.lives = self.lives.saturating_sub(out.lives_lost);
        if let Some(max) = out.boss_max_health {
            self.boss_max_health = max;
        }
        if let Some(health) = out.boss_health {
            self.boss_health = health.max(0.0);
        }
        if out.weapon_levels_gained > 0 {
            self.weapon_level = self
                .weapon_level
                .saturating_add(out.weapon_levels_gained)
                .min(MAX_WEAPON_LEVEL);
        }

        if self.phase != GamePhase::Playing {
            return None;
        }
        let next = if self.lives == 0 {
            GamePhase::GameOver
        } else {
            match out.transition? {
                Transition::GameOver => GamePhase::GameOver,
                Transition::LevelComplete => GamePhase::LevelComplete,
            }
        };
        self.phase = next;
        Some(next)
    }

    /// Boss health as a 0..1 ratio
    pub fn boss_health_ratio(&self) -> f32 {
        if self.boss_max_health <= 0.0 {
            return 0.0;
        }
        (self.boss_health / self.boss_max_health).clamp(0.0, 1.0)
    }
}

/// Everything the HUD displays, serializable for a JS host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub phase: &'static str,
    pub score: u64,
    pub lives: u8,
    pub weapon: &'static str,
    pub weapon_level: u8,
    pub boss_active: bool,
    pub boss_health: f32,
    pub boss_max_health: f32,
    pub boss_health_ratio: f32,
    pub level_index: usize,
    pub level_count: usize,
    pub level_name: String,
    pub theme_color: String,
    pub fog_color: String,
    pub grid_color: String,
    pub scenery: SceneryKind,
    /// Whether the host should draw its FPS counter
    pub show_fps: bool,
}

/// Result of driving one rendered frame. The frame's events are in
/// `Game::events`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Fixed ticks run this frame
    pub ticks: u32,
    /// Phase change caused by one of those ticks
    pub transition: Option<GamePhase>,
}

/// The game controller: session + entity store + fixed-timestep driver
#[derive(Debug)]
pub struct Game {
    pub session: Session,
    pub world: World,
    pub tuning: Tuning,
    pub settings: Settings,
    /// Visual only; decays per tick
    pub shake: CameraShake,
    rng: Pcg32,
    /// Simulation clock in seconds (advances only while playing)
    elapsed: f32,
    accumulator: f32,
    viewport: Vec2,
    /// Reused per tick
    outcome: TickOutcome,
    /// Events of the last frame, reused per frame
    events: Vec<GameEvent>,
}

impl Game {
    /// Fails when `tuning` does not validate (e.g. no sectors)
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Result<Self, TuningError> {
        tuning.validate()?;
        log::info!(
            "New game (seed {}, {} sectors)",
            seed,
            tuning.level_count()
        );
        Ok(Self {
            session: Session::new(),
            world: World::new(),
            tuning,
            settings,
            shake: CameraShake::default(),
            rng: sim::seeded(seed),
            elapsed: 0.0,
            accumulator: 0.0,
            viewport: Vec2::new(VIEW_HALF_WIDTH, VIEW_HALF_HEIGHT),
            outcome: TickOutcome::default(),
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn level(&self) -> &LevelConfig {
        self.tuning.level(self.session.level_index)
    }

    /// World half-extents of the visible play plane
    pub fn set_viewport(&mut self, half_width: f32, half_height: f32) {
        let viewport = Vec2::new(half_width, half_height);
        if viewport.is_finite() && viewport.min_element() > 0.0 {
            self.viewport = viewport;
        } else {
            log::warn!("Ignoring viewport {}x{}", half_width, half_height);
        }
    }

    /// Menu (or GameOver) -> Playing with a full reset
    pub fn start(&mut self) -> bool {
        match self.session.phase {
            GamePhase::Menu | GamePhase::GameOver => {
                self.new_run();
                true
            }
            _ => false,
        }
    }

    /// GameOver -> Playing with a full reset
    pub fn restart(&mut self) -> bool {
        if self.session.phase != GamePhase::GameOver {
            return false;
        }
        self.new_run();
        true
    }

    /// LevelComplete -> Playing at the next sector, or a full reset after
    /// the last one
    pub fn next_level(&mut self) -> bool {
        if self.session.phase != GamePhase::LevelComplete {
            return false;
        }
        if self.tuning.is_last_level(self.session.level_index) {
            log::info!("All sectors cleared, starting over");
            self.new_run();
            return true;
        }

        self.session.level_index += 1;
        self.session.boss_health = 0.0;
        self.begin_level();
        true
    }

    /// Playing <-> Paused; no effect in other phases. Never touches entities.
    pub fn toggle_pause(&mut self) -> bool {
        let next = match self.session.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            _ => return false,
        };
        self.session.phase = next;
        self.accumulator = 0.0;
        log::info!("{}", next.as_str());
        true
    }

    /// Pause if playing (tab hidden / window blur)
    pub fn auto_pause(&mut self) -> bool {
        if self.session.phase == GamePhase::Playing && self.settings.pause_on_blur {
            log::info!("Auto-paused");
            return self.toggle_pause();
        }
        false
    }

    /// Weapon switches are honored while a level is in progress
    pub fn select_weapon(&mut self, kind: WeaponKind) -> bool {
        match self.session.phase {
            GamePhase::Playing | GamePhase::Paused => {
                if self.session.weapon != kind {
                    log::debug!("Weapon -> {}", kind.as_str());
                }
                self.session.weapon = kind;
                true
            }
            _ => false,
        }
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self, pointer: Vec2, fire: bool) -> &TickOutcome {
        if self.session.phase != GamePhase::Playing {
            self.outcome.clear();
            return &self.outcome;
        }
        self.elapsed += SIM_DT;
        let input = TickInput {
            elapsed: self.elapsed,
            pointer: pointer * self.settings.pointer_gain(),
            fire,
            viewport: self.viewport,
        };
        sim::tick_into(
            &mut self.world,
            &self.session,
            &self.tuning,
            &input,
            SIM_DT,
            &mut self.rng,
            &mut self.outcome,
        );

        self.shake.request(self.outcome.shake * self.settings.shake_scale());
        self.shake.decay();

        if let Some(phase) = self.session.apply(&self.outcome) {
            log::info!(
                "{} (sector {}, score {}, lives {})",
                phase.as_str(),
                self.session.level_index + 1,
                self.session.score,
                self.session.lives
            );
        }
        &self.outcome
    }

    /// Drive one rendered frame: accumulate real time and run as many fixed
    /// ticks as fit, up to `MAX_SUBSTEPS`
    pub fn frame(&mut self, frame_dt: f32, pointer: Vec2, fire: bool) -> FrameReport {
        let mut report = FrameReport::default();
        self.events.clear();
        if self.session.phase != GamePhase::Playing {
            self.accumulator = 0.0;
            return report;
        }
        if !(frame_dt > 0.0 && frame_dt.is_finite()) {
            return report;
        }

        self.accumulator += frame_dt.min(MAX_FRAME_DT);
        while self.accumulator >= SIM_DT && report.ticks < MAX_SUBSTEPS {
            self.step(pointer, fire);
            self.events.extend_from_slice(&self.outcome.events);
            self.accumulator -= SIM_DT;
            report.ticks += 1;

            if self.session.phase != GamePhase::Playing {
                report.transition = Some(self.session.phase);
                self.accumulator = 0.0;
                break;
            }
        }
        // Hit the substep cap: drop the backlog instead of fast-forwarding later
        if report.ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        report
    }

    /// Gameplay events raised during the last `frame`
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn hud(&self) -> HudSnapshot {
        let level = self.level();
        HudSnapshot {
            phase: self.session.phase.as_str(),
            score: self.session.score,
            lives: self.session.lives,
            weapon: self.session.weapon.as_str(),
            weapon_level: self.session.weapon_level,
            boss_active: self.world.boss.is_some(),
            boss_health: self.session.boss_health,
            boss_max_health: self.session.boss_max_health,
            boss_health_ratio: self.session.boss_health_ratio(),
            level_index: self.session.level_index,
            level_count: self.tuning.level_count(),
            level_name: level.name.clone(),
            theme_color: level.theme_color.clone(),
            fog_color: level.fog_color.clone(),
            grid_color: level.grid_color.clone(),
            scenery: level.scenery,
            show_fps: self.settings.show_fps,
        }
    }

    /// Full reset: sector 1, fresh score and lives, empty world
    fn new_run(&mut self) {
        self.session.reset_run();
        // A boss left over from the previous run must not block the reset
        self.world.boss = None;
        self.begin_level();
    }

    fn begin_level(&mut self) {
        if !self.world.reset_for_level() {
            log::warn!("Level start with a boss present; entities kept");
        }
        self.session.phase = GamePhase::Playing;
        self.accumulator = 0.0;
        self.shake.reset();
        log::info!(
            "Sector {}: {}",
            self.session.level_index + 1,
            self.level().name
        );
    }
}
