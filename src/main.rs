mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use dodge_shooter::config::Config;
use dodge_shooter::game::Game;
use dodge_shooter::input::{Key, KeyTracker};

use display::{Hud, TerminalSurface};

/// How long a key stays "held" after its last repeat on terminals that never
/// report releases.  OS key-repeat runs at ≥ 15 Hz, so this is always
/// refreshed before it expires.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// Hold window for a key seen only once.  Covers the OS delay before
/// auto-repeat starts (usually 250 to 500 ms).
const REPEAT_DELAY: Duration = Duration::from_millis(600);

#[derive(Parser)]
#[command(about = "Dodge the falling blocks and shoot them down")]
struct Opts {
    /// RON config file overriding the built-in tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of players sharing the keyboard.
    #[arg(long, default_value_t = 1)]
    players: usize,
    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
    /// Write logs here instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Stderr shares the screen with the game, so it only gets warnings by
/// default.  `RUST_LOG` overrides either filter.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("when creating log file at {:?}", path))?;
        builder
            .target(env_logger::Target::Pipe(Box::new(file)))
            .write_style(env_logger::WriteStyle::Never);
    }
    builder.init();
    Ok(())
}

// ── Input translation ─────────────────────────────────────────────────────────

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn translate(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::char(c)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until a quit key arrives.  A finished game keeps running (or stays
/// frozen, depending on the configured policy) behind the game-over banner.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
    players: usize,
    keyboard_enhanced: bool,
) -> anyhow::Result<()> {
    let window = game.config().window.clone();
    let frame_budget = Duration::from_secs(1) / window.fps_limit;

    let mut tracker = if keyboard_enhanced {
        KeyTracker::with_releases()
    } else {
        KeyTracker::with_hold_window(
            frames_in(REPEAT_DELAY, window.fps_limit),
            frames_in(HOLD_WINDOW, window.fps_limit),
        )
    };

    let (cols, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(window.width, window.height, cols, rows);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => {
                    if kind == KeyEventKind::Press && is_quit(code, modifiers) {
                        log::info!("quit requested after {} frames", frame);
                        return Ok(());
                    }
                    let Some(key) = translate(code) else {
                        continue;
                    };
                    match kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => tracker.press(key, frame),
                        KeyEventKind::Release => tracker.release(key),
                    }
                }
                Event::Resize(cols, rows) => surface.resize(cols, rows),
                _ => {}
            }
        }

        let keys = tracker.snapshot(frame);
        let outcome = game.frame(&keys, &mut surface, rng);
        if outcome.game_over_now {
            log::info!("game over on frame {}", game.frame_count());
        }

        let hud = Hud {
            game_over: game.is_over(),
            players,
        };
        display::present(out, &surface, &hud)?;

        // The budget covers the whole iteration, present included.
        thread::sleep(frame_delay(frame_budget, frame_start.elapsed()));
    }
}

/// Whole frames spanned by `span` at `fps`, at least one.
fn frames_in(span: Duration, fps: u32) -> u64 {
    (span.as_millis() as u64 * fps as u64 / 1000).max(1)
}

/// Time left to sleep once `elapsed` of the frame budget has been used.
fn frame_delay(budget: Duration, elapsed: Duration) -> Duration {
    budget.saturating_sub(elapsed)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    init_logging(opts.log_file.as_deref())?;

    let config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut game = Game::new(config, opts.players)?;
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    log::info!("keyboard enhancement: {}", keyboard_enhanced);

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(
        &mut out,
        &mut game,
        &mut rng,
        &rx,
        opts.players,
        keyboard_enhanced,
    );

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
