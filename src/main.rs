use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};
use stroop::{
    app_dirs::AppDirs,
    clock::MonotonicClock,
    config::{Config, ConfigStore, FileConfigStore},
    highscore::{FileHighscoreStore, HighscoreRecord, HighscoreStore, MemoryHighscoreStore},
    input::handle_key,
    localization::Localization,
    round::MatchPolicy,
    runtime::{CrosstermEventSource, FixedTicker, Runner, StroopEvent},
    ui::View,
    Game,
};

/// stroop test reaction game: pick the color the word names, not the ink it is drawn in
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A Stroop test for the terminal. Each round shows a color word drawn in a clashing ink; answer with the number key of the matching option as fast as you can. Finish every round correctly to set a highscore."
)]
pub struct Cli {
    /// config file to read instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// number of answer options per round
    #[clap(short = 'o', long)]
    options: Option<usize>,

    /// language pack for on-screen text
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// which property of an option decides the round
    #[clap(long, value_enum)]
    policy: Option<MatchPolicy>,

    /// seed the round shuffle for a reproducible game
    #[clap(long)]
    seed: Option<u64>,

    /// key that pauses and resumes a game
    #[clap(long)]
    pause_key: Option<char>,

    /// keep the highscore in memory only
    #[clap(long)]
    no_save: bool,

    /// highscore file to read and write
    #[clap(long, conflicts_with = "no_save")]
    highscore_file: Option<PathBuf>,

    /// write the effective configuration to the config file and exit
    #[clap(long)]
    write_config: bool,

    /// forget the stored highscore and exit
    #[clap(long)]
    reset_highscore: bool,

    /// list the built-in language packs and exit
    #[clap(long)]
    list_languages: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Command line flags win over the config file
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(options) = self.options {
            cfg.option_slots = options;
        }
        if let Some(language) = &self.language {
            cfg.language = language.clone();
        }
        if let Some(policy) = self.policy {
            cfg.policy = policy;
        }
        if let Some(pause_key) = self.pause_key {
            cfg.pause_key = pause_key;
        }
        cfg
    }

    fn highscore_store(&self) -> Box<dyn HighscoreStore> {
        if self.no_save {
            Box::new(MemoryHighscoreStore::new())
        } else if let Some(path) = &self.highscore_file {
            Box::new(FileHighscoreStore::with_path(path))
        } else {
            Box::new(FileHighscoreStore::new())
        }
    }
}

type App = Game<MonotonicClock, Box<dyn HighscoreStore>, Localization>;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    if cli.list_languages {
        for name in Localization::available() {
            println!("{name}");
        }
        return Ok(());
    }

    let store = cli.config_store();
    let config = cli.apply(store.load().unwrap_or_else(|e| config_error(e)));
    let settings = config.validate().unwrap_or_else(|e| config_error(e));
    let localization = config.localization().unwrap_or_else(|e| config_error(e));

    if cli.write_config {
        store.save(&config)?;
        println!("{}", store.path().display());
        return Ok(());
    }

    let highscores = cli.highscore_store();
    if cli.reset_highscore {
        highscores.save(&HighscoreRecord::default())?;
        log::info!("highscore reset");
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app: App = Game::new(settings, MonotonicClock, highscores, localization);
    if let Some(seed) = cli.seed {
        app = app.with_seed(seed);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn config_error<T>(e: stroop::StroopError) -> T {
    log::error!("{e}");
    let mut cmd = Cli::command();
    cmd.error(ErrorKind::InvalidValue, e).exit()
}

/// Logs go to a file in the state dir so they never land on the TUI
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::new().filter_or("STROOP_LOG", "warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let launched = Instant::now();

    terminal.draw(|f| ui(app, launched, f))?;

    while !app.should_quit() {
        let redraw = match runner.step() {
            StroopEvent::Tick => app.is_animating(),
            StroopEvent::Resize => true,
            StroopEvent::Key(key) => handle_key(app, key),
        };

        if redraw && !app.should_quit() {
            terminal.draw(|f| ui(app, launched, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, launched: Instant, f: &mut Frame) {
    let view = View::from_game(app, launched.elapsed().as_secs_f64());
    f.render_widget(&view, f.area());
}
