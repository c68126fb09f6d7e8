//! Data-driven game balance
//!
//! Static level ("sector") and weapon tables. The built-in tables are used by
//! default; a JSON document with the same shape can replace them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Blaster,
    Spread,
    Plasma,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Blaster, WeaponKind::Spread, WeaponKind::Plasma];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Blaster => "BLASTER",
            WeaponKind::Spread => "SPREAD",
            WeaponKind::Plasma => "PLASMA",
        }
    }

    /// Parse a weapon symbol or number key ("1", "2", "3")
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blaster" | "1" => Some(WeaponKind::Blaster),
            "spread" | "shotgun" | "2" => Some(WeaponKind::Spread),
            "plasma" | "3" => Some(WeaponKind::Plasma),
            _ => None,
        }
    }
}

/// Decorative scenery set for a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneryKind {
    Cubes,
    Asteroids,
    Alien,
}

/// Per-weapon ballistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Projectile depth speed (units per tick)
    pub speed: f32,
    /// Seconds between shots
    pub cooldown: f32,
    /// Base damage per projectile
    pub damage: f32,
}

/// One sector's difficulty and theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    pub theme_color: String,
    pub fog_color: String,
    pub grid_color: String,
    pub enemy_speed_multiplier: f32,
    /// Ticks between enemy spawns (lower is faster)
    pub spawn_rate: u32,
    pub boss_hp: f32,
    /// Score at which the sector boss appears
    pub boss_score_threshold: u64,
    pub scenery: SceneryKind,
}

/// Weapon table keyed by `WeaponKind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTable {
    pub blaster: WeaponConfig,
    pub spread: WeaponConfig,
    pub plasma: WeaponConfig,
}

impl WeaponTable {
    pub fn get(&self, kind: WeaponKind) -> &WeaponConfig {
        match kind {
            WeaponKind::Blaster => &self.blaster,
            WeaponKind::Spread => &self.spread,
            WeaponKind::Plasma => &self.plasma,
        }
    }
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            blaster: WeaponConfig { speed: 1.2, cooldown: 0.15, damage: 1.0 },
            spread: WeaponConfig { speed: 1.0, cooldown: 0.4, damage: 1.0 },
            plasma: WeaponConfig { speed: 0.8, cooldown: 0.6, damage: 5.0 },
        }
    }
}

/// Errors from loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tuning must define at least one level")]
    NoLevels,

    #[error("level {id}: spawn_rate must be at least 1")]
    ZeroSpawnRate { id: u32 },

    #[error("level {id}: boss_hp must be positive")]
    NonPositiveBossHp { id: u32 },

    #[error("weapon {weapon}: {field} must be positive")]
    BadWeapon { weapon: &'static str, field: &'static str },
}

/// Complete balance data: ordered sectors plus weapon ballistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub levels: Vec<LevelConfig>,
    pub weapons: WeaponTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            weapons: WeaponTable::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.levels.is_empty() {
            return Err(TuningError::NoLevels);
        }
        for level in &self.levels {
            if level.spawn_rate == 0 {
                return Err(TuningError::ZeroSpawnRate { id: level.id });
            }
            if level.boss_hp <= 0.0 {
                return Err(TuningError::NonPositiveBossHp { id: level.id });
            }
        }
        for kind in WeaponKind::ALL {
            let w = self.weapons.get(kind);
            if w.speed <= 0.0 {
                return Err(TuningError::BadWeapon { weapon: kind.as_str(), field: "speed" });
            }
            if w.damage <= 0.0 {
                return Err(TuningError::BadWeapon { weapon: kind.as_str(), field: "damage" });
            }
        }
        Ok(())
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level lookup; indices past the end clamp to the last sector
    ///
    /// Panics on an empty level list; `validate` rejects that and `Game::new`
    /// validates before use.
    pub fn level(&self, index: usize) -> &LevelConfig {
        let last = self.levels.len().saturating_sub(1);
        if index > last {
            log::warn!("Level index {} out of range, using sector {}", index, last + 1);
        }
        &self.levels[index.min(last)]
    }

    pub fn weapon(&self, kind: WeaponKind) -> &WeaponConfig {
        self.weapons.get(kind)
    }

    pub fn is_last_level(&self, index: usize) -> bool {
        index + 1 >= self.levels.len()
    }
}

fn default_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig {
            id: 1,
            name: "SECTOR 1: CYBER VOID".into(),
            theme_color: "#3b82f6".into(),
            fog_color: "#020617".into(),
            grid_color: "#1e293b".into(),
            enemy_speed_multiplier: 1.0,
            spawn_rate: 50,
            boss_hp: 300.0,
            boss_score_threshold: 500,
            scenery: SceneryKind::Cubes,
        },
        LevelConfig {
            id: 2,
            name: "SECTOR 2: RED ALERT".into(),
            theme_color: "#ef4444".into(),
            fog_color: "#2a0505".into(),
            grid_color: "#450a0a".into(),
            enemy_speed_multiplier: 1.3,
            spawn_rate: 40,
            boss_hp: 600.0,
            boss_score_threshold: 800,
            scenery: SceneryKind::Asteroids,
        },
        LevelConfig {
            id: 3,
            name: "SECTOR 3: THE ABYSS".into(),
            theme_color: "#a855f7".into(),
            fog_color: "#180220".into(),
            grid_color: "#3b0764".into(),
            enemy_speed_multiplier: 1.6,
            spawn_rate: 30,
            boss_hp: 1000.0,
            boss_score_threshold: 1200,
            scenery: SceneryKind::Alien,
        },
    ]
}
