//! BLOCKFALL - a falling-block puzzle panel for the terminal

mod board;
mod game;
mod input;
mod piece;
mod render;
mod score;
mod settings;
mod spawner;
mod tetromino;
mod timing;
mod ui;

use crossterm::{
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use game::{Action, Game, Phase};
use input::{Command, InputHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};
use timing::GravityTimer;

/// Input polling rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    // Log to a file; the terminal belongs to the UI
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blockfall=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    // Ask for release events where the terminal can report them
    let reports_release = supports_keyboard_enhancement().unwrap_or(false);
    if reports_release {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    tracing::debug!(reports_release, "keyboard setup");

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &settings, reports_release);

    // Restore terminal
    if reports_release {
        execute!(stdout(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    match &result {
        Ok(game) => {
            println!("\nThanks for playing BLOCKFALL!");
            if game.phase != Phase::Idle {
                println!("Final Score: {}", game.score.points);
                println!("Level: {} | Lines: {}", game.score.level, game.score.lines);
            }
        }
        Err(e) => tracing::error!("terminal error: {}", e),
    }

    result.map(|_| ())
}

/// Frame loop: draw, read keys, drive repeat and gravity while playing
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
    reports_release: bool,
) -> io::Result<Game> {
    let mut game = Game::new();
    let mut input = InputHandler::from_settings(settings, reports_release);
    // Only exists while a game is being played
    let mut gravity: Option<GravityTimer> = None;

    loop {
        terminal.draw(|frame| ui::render_game(frame, &game, settings))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                let now = Instant::now();
                match key.kind {
                    KeyEventKind::Release => input.key_up(key),
                    // Discrete keys act on the down edge only
                    KeyEventKind::Repeat => {
                        if let Some(Command::Quit) = input.key_down(key, now) {
                            return Ok(game);
                        }
                    }
                    KeyEventKind::Press => match input.key_down(key, now) {
                        Some(Command::Quit) => return Ok(game),
                        Some(Command::Game(action)) => {
                            if action == Action::Restart {
                                input.clear();
                                gravity = None;
                            }
                            game.process_action(action);
                        }
                        None => {}
                    },
                }
            }
        }

        let now = Instant::now();
        if !game.is_playing() {
            input.clear();
            gravity = None;
            continue;
        }

        for action in input.update(now) {
            game.process_action(action);
        }

        let timer = gravity.get_or_insert_with(|| GravityTimer::new(game.score.level, now));
        timer.sync(game.score.level, now);
        if timer.poll(now) {
            game.tick_gravity();
        }
    }
}
