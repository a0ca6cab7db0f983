use clap::Parser;
use color_eyre::Result;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::OpenOptions;
use std::io::stdout;
use std::path::{Path, PathBuf};

use dodge_racer::app::App;
use dodge_racer::audio::{AudioManager, AudioPaths};
use dodge_racer::cars::{Car, CarSelection};
use dodge_racer::config::GameConfig;
use dodge_racer::game::Game;
use dodge_racer::highscore::Highscore;
use dodge_racer::storage::FileStorage;

/// Dodge the oncoming cars for as long as you can
#[derive(Parser, Debug)]
#[command(name = "dodge-racer", version)]
struct Cli {
    /// Car you drive
    #[arg(long, default_value = "RedBull")]
    player_car: Car,

    /// Car everyone else drives
    #[arg(long, default_value = "McLaren")]
    opponent_car: Car,

    /// Start with sound muted
    #[arg(long)]
    mute: bool,

    /// Disable audio entirely
    #[arg(long)]
    no_audio: bool,

    /// Directory holding cars/*.png and sounds/
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,

    /// Where the highscore is kept [default: <data dir>/dodge-racer/storage.json]
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Log file; the terminal itself is taken by the game
    #[arg(long, default_value = "debug.log")]
    log_file: PathBuf,

    /// Seed for enemy placement
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let storage = FileStorage::new(cli.data_file.unwrap_or_else(FileStorage::default_path));
    log::info!("Highscore storage at {}", storage.path().display());
    let highscore = Highscore::load(Box::new(storage));

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let cars = CarSelection {
        player: cli.player_car,
        opponent: cli.opponent_car,
    };
    let game = Game::new(GameConfig::default(), highscore, cars, rng);

    let audio_paths = AudioPaths::in_dir(&cli.assets_dir);
    let audio = if cli.no_audio {
        AudioManager::disabled(audio_paths)
    } else {
        AudioManager::new(audio_paths, cli.mute)
    };

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    log::info!("Keyboard enhancement supported: {supports_keyboard_enhancement}");

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Enable keyboard enhancement AFTER entering alternate screen so key
    // releases are reported
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(game, audio, cli.assets_dir).run(&mut terminal);

    // Cleanup runs before the loop's error is reported
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        log::error!("Game loop failed: {err}");
    }
    result
}
