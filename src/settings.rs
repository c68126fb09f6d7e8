//! Player preferences
//!
//! Persisted separately from the run in LocalStorage. None of these affect
//! the simulation; they only scale presentation.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Camera shake on hits and heavy shots
    pub screen_shake: bool,
    /// Shake strength multiplier (0.0 - 1.0)
    pub shake_strength: f32,

    // === Input ===
    /// Pointer-to-target gain
    pub pointer_sensitivity: f32,
    /// Pause automatically when the tab is hidden
    pub pause_on_blur: bool,

    // === HUD ===
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no banking)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            shake_strength: 1.0,
            pointer_sensitivity: 1.0,
            pause_on_blur: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Multiplier applied to shake requests; 0 when shake is off
    pub fn shake_scale(&self) -> f32 {
        if self.effective_screen_shake() {
            sanitize(self.shake_strength, 0.0, 1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Pointer gain, clamped to a usable range
    pub fn pointer_gain(&self) -> f32 {
        sanitize(self.pointer_sensitivity, 0.25, 2.0, 1.0)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "sector_strike_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = self.to_json()
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved to {}", Self::STORAGE_KEY);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings persistence unavailable natively ({})", Self::STORAGE_KEY);
    }
}

fn sanitize(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
