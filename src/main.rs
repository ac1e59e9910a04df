//! Fruit Tap entry point
//!
//! Loads settings, opens the terminal surface and runs the frame loop.

use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;

use fruit_tap::renderer::{Surface, TerminalSurface};
use fruit_tap::settings::SETTINGS_ENV;
use fruit_tap::sim::{GameEvent, Session, tick};
use fruit_tap::Settings;

fn settings_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(SETTINGS_ENV))
        .map(PathBuf::from)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    let mut surface = TerminalSurface::open(settings).context("failed to open terminal")?;

    let seed = settings.seed.unwrap_or_else(clock_seed);
    let mut session = Session::new(seed, settings, surface.viewport());
    surface.render(&session.state().snapshot())?;

    let mut last = Instant::now();
    loop {
        let input = surface.poll(settings.frame_duration())?;
        if input.quit {
            break;
        }

        let now = Instant::now();
        let events = tick(&mut session, &input.tick, now - last);
        last = now;

        for event in &events {
            match event {
                GameEvent::GameOver { final_score } => {
                    log::info!("Bomb! Final score {}", final_score)
                }
                GameEvent::Restarted(spawn) => log::info!("Restarted, first target {:?}", spawn.kind),
                other => log::trace!("{:?}", other),
            }
        }

        let snapshot = session.state().snapshot();
        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&snapshot) {
                log::trace!("snapshot {}", json);
            }
        }
        surface.render(&snapshot).context("failed to draw frame")?;
    }

    log::info!(
        "Quit after {:.1}s with score {}",
        session.elapsed().as_secs_f32(),
        session.state().score()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Fruit Tap starting...");

    let settings = Settings::load(settings_path().as_deref());
    run(&settings)
}
