//! Terminal runner (default binary).
//!
//! Reads key presses with crossterm, advances the session on a ~60 Hz frame
//! clock, and draws through the framebuffer renderer.

use std::fs::OpenOptions;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, warn, LevelFilter};

use shrinktris::config::AppConfig;
use shrinktris::core::{GameSession, GameSnapshot};
use shrinktris::input::{handle_key_event, should_quit};
use shrinktris::store::{HighScoreStore, JsonFileStore};
use shrinktris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use shrinktris::types::FRAME_MS;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config)?;

    let mut store = JsonFileStore::new(&config.highscore_path);
    let seed = config.seed_or_clock();
    info!(
        "starting seed={} highscore_path={}",
        seed,
        store.path().display()
    );

    let mut term = TerminalRenderer::stdout();
    term.enter()?;

    let result = run(&mut term, &mut store, seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Logs go to `SHRINKTRIS_LOG_PATH` when set; the terminal is owned by the game.
fn init_logging(config: &AppConfig) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match &config.log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    builder.try_init()?;
    Ok(())
}

fn run(term: &mut TerminalRenderer, store: &mut JsonFileStore, seed: u32) -> Result<()> {
    let mut saved_high = store.load();
    let mut session = GameSession::new(seed).with_high_score(saved_high);

    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let frame = Duration::from_millis(FRAME_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        break;
                    }
                    if let Some(action) = handle_key_event(key) {
                        session.apply_action(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            session.tick(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }

        // The high score only moves when a piece locks.
        if session.take_last_event().is_some() && session.high_score() > saved_high {
            saved_high = session.high_score();
            if let Err(e) = store.save(saved_high) {
                warn!("failed to save high score: {}", e);
            }
        }
    }

    info!("quit with high score {}", saved_high);
    Ok(())
}
