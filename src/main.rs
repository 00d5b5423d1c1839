//! Bug Crossing entry point
//!
//! Sets up the terminal, loads configuration and runs the game loop.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::{
    cursor, execute,
    style::ResetColor,
    terminal::{self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen},
};

use bug_crossing::consts::MAX_FRAME_DT;
use bug_crossing::platform::{Command, poll_commands};
use bug_crossing::renderer::{TerminalPresenter, present};
use bug_crossing::sim::{GameState, TickInput, tick};
use bug_crossing::{Settings, Tuning};

/// Cross the road, dodge the bugs, grab the gems.
#[derive(Debug, Parser)]
#[command(name = "bug-crossing", version, about)]
struct Args {
    /// RNG seed (defaults to the system clock)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding gameplay tuning
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// JSON file with display settings
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Game instance holding all state
struct Game {
    state: GameState,
    presenter: TerminalPresenter,
    tuning: Tuning,
    // FPS tracking
    frames: u32,
    fps_window: f32,
}

impl Game {
    fn new(seed: u64, tuning: Tuning, settings: Settings, size: (u16, u16)) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning.clone()),
            presenter: TerminalPresenter::new(size.0, size.1, settings),
            tuning,
            frames: 0,
            fps_window: 0.0,
        }
    }

    fn restart(&mut self) {
        let seed = clock_seed();
        self.state = GameState::with_tuning(seed, self.tuning.clone());
        log::info!("Game restarted with seed: {}", seed);
    }

    fn track_fps(&mut self, dt: f32) {
        self.frames += 1;
        self.fps_window += dt;
        if self.fps_window >= 1.0 {
            self.presenter
                .set_fps((self.frames as f32 / self.fps_window).round() as u32);
            self.frames = 0;
            self.fps_window = 0.0;
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0xC0FFEE)
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = args.tuning.as_deref().map(Tuning::load).unwrap_or_default();
    let settings = args.settings.as_deref().map(Settings::load).unwrap_or_default();
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::info!("Bug Crossing starting with seed: {}", seed);

    let mut out = io::stdout();

    terminal::enable_raw_mode()?;
    execute!(
        out,
        EnterAlternateScreen,
        cursor::Hide,
        DisableLineWrap,
        terminal::Clear(terminal::ClearType::All)
    )?;

    let res = run(&mut out, seed, tuning, settings);

    // restore
    let _ = execute!(out, EnableLineWrap, cursor::Show, LeaveAlternateScreen, ResetColor);
    let _ = terminal::disable_raw_mode();

    res
}

fn run(out: &mut Stdout, seed: u64, tuning: Tuning, settings: Settings) -> io::Result<()> {
    let size = terminal::size()?;
    let mut game = Game::new(seed, tuning, settings, size);
    let mut last = Instant::now();

    loop {
        let mut input = TickInput::default();
        for command in poll_commands()? {
            match command {
                Command::Quit => {
                    log::info!("Quit at level {}", game.state.level);
                    return Ok(());
                }
                Command::Restart => game.restart(),
                Command::Pause => input.push_pause(&mut game.state),
                Command::Move(direction) => input.push_move(&mut game.state, direction),
                Command::Resize(w, h) => {
                    execute!(out, terminal::Clear(terminal::ClearType::All))?;
                    game.presenter.resize(w, h);
                }
            }
        }

        let now = Instant::now();
        let dt = (now - last).as_secs_f32().min(MAX_FRAME_DT);
        last = now;

        tick(&mut game.state, &input, dt);

        let events = game.state.drain_events();
        present(&game.state, &events, &mut game.presenter);
        game.track_fps(dt);
        game.presenter.finish_frame(out, dt, game.state.is_paused())?;

        // light frame cap
        std::thread::sleep(Duration::from_millis(8));
    }
}
