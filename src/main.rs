//! Sector Strike entry point
//!
//! The browser build is driven from JS through `platform::web`. Natively this
//! runs a headless autoplay session and logs how it went.
//!
//! Usage: `sector-strike [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use glam::{Vec2, Vec3};

    use sector_strike::consts::*;
    use sector_strike::renderer::Projector;
    use sector_strike::sim::GameEvent;
    use sector_strike::{Game, GamePhase, Settings, Tuning, WeaponKind};

    /// Ten simulated minutes at 60 fps
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    #[derive(Debug, Default)]
    struct Tally {
        kills: u32,
        hits_taken: u32,
        powerups: u32,
        bosses: u32,
        sectors_cleared: u32,
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s.parse::<u64>()?,
            None => 1,
        };
        let tuning = match args.next() {
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&std::fs::read_to_string(&path)?)?
            }
            None => Tuning::default(),
        };

        let mut game = Game::new(seed, tuning, Settings::load())?;
        let mut projector = Projector::new();
        let mut tally = Tally::default();
        game.start();

        for frame in 0..MAX_FRAMES {
            match game.phase() {
                GamePhase::LevelComplete => {
                    tally.sectors_cleared += 1;
                    if game.tuning.is_last_level(game.session.level_index) {
                        log::info!("Autoplay cleared every sector");
                        break;
                    }
                    game.next_level();
                }
                GamePhase::GameOver => break,
                _ => {}
            }

            // Rotate weapons every 20 seconds
            let weapon = WeaponKind::ALL[(frame / 1200) as usize % WeaponKind::ALL.len()];
            game.select_weapon(weapon);

            let pointer = aim(&game);
            game.frame(SIM_DT, pointer, true);
            for event in game.events() {
                match event {
                    GameEvent::EnemyDestroyed { .. } => tally.kills += 1,
                    GameEvent::PlayerHit { .. } => tally.hits_taken += 1,
                    GameEvent::PowerUpCollected => tally.powerups += 1,
                    GameEvent::BossDefeated => tally.bosses += 1,
                    _ => {}
                }
            }

            let batches = projector.project(
                &game.world,
                game.level(),
                game.session.level_index,
                game.elapsed(),
                true,
            );
            if frame % 600 == 0 {
                log::debug!("Frame {}: {} instances", frame, batches.total());
            }
        }

        let hud = game.hud();
        log::info!(
            "Autoplay finished: {} in {} ({}), score {}, lives {}, {} {}",
            hud.phase,
            hud.level_name,
            hud.level_index + 1,
            hud.score,
            hud.lives,
            hud.weapon,
            hud.weapon_level
        );
        log::info!("{:?}", tally);
        println!("{}", serde_json::to_string_pretty(&hud)?);
        Ok(())
    }

    /// Line up with the boss if there is one, otherwise the nearest enemy
    fn aim(game: &Game) -> Vec2 {
        let player = game.world.player.pos;
        let target = game.world.boss.map(|b| b.pos).or_else(|| {
            game.world
                .enemies
                .iter()
                .map(|e| e.pos)
                .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)))
        });
        let target = target.unwrap_or(Vec3::new(0.0, PLAYER_START_Y, 0.0));
        Vec2::new(
            (target.x / VIEW_HALF_WIDTH).clamp(-1.0, 1.0),
            (target.y / VIEW_HALF_HEIGHT).clamp(-1.0, 1.0),
        )
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sector Strike (native) starting...");
    log::info!("Native mode runs a headless autoplay session; use the web build to play");

    if let Err(e) = autoplay::run() {
        log::error!("Autoplay failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main
}
