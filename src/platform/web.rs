//! Browser facade
//!
//! The JS host owns the canvas, input events and GPU submission. It calls
//! `frame` from `requestAnimationFrame`, uploads the instance data it gets
//! back, and renders the HUD from `hud_json`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::FpsCounter;
use crate::renderer::{InstanceRaw, Projector};
use crate::session::Game;
use crate::settings::Settings;
use crate::tuning::{Tuning, WeaponKind};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
    }
    log::info!("Sector Strike starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    projector: Projector,
    fps: FpsCounter,
    last_time: f64,
    pointer: Vec2,
    fire: bool,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game with built-in tuning, or `tuning_json` when given
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<WebGame, JsError> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::default(),
        };
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, tuning, Settings::load())?;
        log::info!("Game initialized with seed: {}", seed);
        Ok(WebGame {
            game,
            projector: Projector::new(),
            fps: FpsCounter::default(),
            last_time: 0.0,
            pointer: Vec2::ZERO,
            fire: false,
        })
    }

    pub fn start(&mut self) -> bool {
        self.game.start()
    }

    pub fn restart(&mut self) -> bool {
        self.game.restart()
    }

    #[wasm_bindgen(js_name = nextLevel)]
    pub fn next_level(&mut self) -> bool {
        self.game.next_level()
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) -> bool {
        self.game.toggle_pause()
    }

    /// Tab hidden / window blur
    #[wasm_bindgen(js_name = autoPause)]
    pub fn auto_pause(&mut self) -> bool {
        self.game.auto_pause()
    }

    /// Weapon by key or name ("1".."3", "blaster", "spread", "plasma")
    #[wasm_bindgen(js_name = selectWeapon)]
    pub fn select_weapon(&mut self, symbol: &str) -> bool {
        match WeaponKind::from_symbol(symbol) {
            Some(kind) => self.game.select_weapon(kind),
            None => {
                log::warn!("Unknown weapon {:?}", symbol);
                false
            }
        }
    }

    /// Pointer in normalized device coordinates ([-1, 1], y up)
    #[wasm_bindgen(js_name = setPointer)]
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
    }

    #[wasm_bindgen(js_name = setFire)]
    pub fn set_fire(&mut self, fire: bool) {
        self.fire = fire;
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, half_width: f32, half_height: f32) {
        self.game.set_viewport(half_width, half_height);
    }

    /// Apply settings JSON and persist them
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&mut self, json: &str) -> Result<(), JsError> {
        let settings = Settings::from_json(json)?;
        settings.save();
        self.game.settings = settings;
        Ok(())
    }

    /// Advance by one animation frame (`time` is the rAF timestamp in ms).
    /// Returns the number of simulation ticks run.
    pub fn frame(&mut self, time: f64) -> u32 {
        let dt = if self.last_time > 0.0 {
            ((time - self.last_time) / 1000.0) as f32
        } else {
            crate::consts::SIM_DT
        };
        self.last_time = time;
        self.fps.record(time);

        let report = self.game.frame(dt, self.pointer, self.fire);
        for event in self.game.events() {
            log::debug!("{:?}", event);
        }

        let level = self.game.level();
        self.projector.project(
            &self.game.world,
            level,
            self.game.session.level_index,
            self.game.elapsed(),
            !self.game.settings.reduced_motion,
        );
        report.ticks
    }

    /// Flattened instance data (20 floats per instance) for one mesh batch
    #[wasm_bindgen(js_name = instanceData)]
    pub fn instance_data(&self, batch: &str) -> Vec<f32> {
        let b = self.projector.batches();
        let instances: &[InstanceRaw] = match batch {
            "player" => b.player.as_slice(),
            "blaster" => &b.blaster,
            "spread" => &b.spread,
            "plasma" => &b.plasma,
            "enemy_bullets" => &b.enemy_bullets,
            "fighters" => &b.fighters,
            "drones" => &b.drones,
            "powerups" => &b.powerups,
            "boss" => b.boss.as_slice(),
            _ => {
                log::warn!("Unknown instance batch {:?}", batch);
                &[]
            }
        };
        bytemuck::cast_slice(instances).to_vec()
    }

    /// Whether the host should draw the FPS counter
    #[wasm_bindgen(js_name = showFps)]
    pub fn show_fps(&self) -> bool {
        self.game.settings.show_fps
    }

    /// Camera (pitch, yaw, roll) shake offsets for this frame
    #[wasm_bindgen(js_name = cameraShake)]
    pub fn camera_shake(&self) -> Vec<f32> {
        self.game.shake.offsets(self.game.elapsed()).to_array().to_vec()
    }

    #[wasm_bindgen(js_name = hudJson)]
    pub fn hud_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.game.hud())?)
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }
}
