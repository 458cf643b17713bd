use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use quizbattle::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, StoreKind},
    controls,
    engine::QuizEngine,
    progress::{CumulativeProgress, JsonProgressStore, MemoryProgressStore, ProgressStore},
    question::QuestionBank,
    runtime::Runner,
    sound::{Silent, SoundEmitter, TerminalBell},
    stats::StatsDb,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// chemistry quiz battle against a computer buddy
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "Answer timed chemistry questions faster and better than Buddy, build streaks, unlock rewards and climb your own leaderboard."
)]
pub struct Cli {
    /// seconds allowed per question
    #[clap(short = 't', long)]
    round_secs: Option<u32>,

    /// number of questions per session
    #[clap(short = 'n', long)]
    questions: Option<usize>,

    /// pause after each answer before moving on, in milliseconds
    #[clap(long)]
    reveal_delay_ms: Option<u64>,

    /// disable sound cues
    #[clap(short = 'm', long)]
    mute: bool,

    /// where progress is stored
    #[clap(long, value_enum)]
    store: Option<StoreKind>,

    /// question bank json file to use instead of the built-in chemistry bank
    #[clap(short = 'b', long)]
    bank: Option<PathBuf>,

    /// seed for question sampling
    #[clap(long)]
    seed: Option<u64>,

    /// wipe stored progress before starting
    #[clap(long)]
    reset_progress: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,

    /// log to stderr instead of the log file
    #[clap(long)]
    log_stderr: bool,
}

impl Cli {
    /// Command line flags win over the config file.
    fn merge(&self, mut config: Config) -> Config {
        if let Some(secs) = self.round_secs {
            config.round_secs = secs;
        }
        if let Some(n) = self.questions {
            config.questions_per_session = n;
        }
        if let Some(ms) = self.reveal_delay_ms {
            config.reveal_delay_ms = ms;
        }
        if self.mute {
            config.sound = false;
        }
        if let Some(store) = self.store {
            config.store = store;
        }
        if let Some(bank) = &self.bank {
            config.bank = Some(bank.clone());
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_stderr)?;

    let config_store = FileConfigStore::new();
    let config = cli.merge(config_store.load());
    if cli.save_config {
        config_store.save(&config)?;
        info!("saved config to {}", config_store.path().display());
    }

    let bank = match &config.bank {
        Some(path) => QuestionBank::from_path(path)?,
        None => QuestionBank::chemistry()?,
    };
    let store = open_store(config.store, cli.reset_progress);
    let sound: Box<dyn SoundEmitter> = if config.sound {
        Box::new(TerminalBell::new(io::stdout()))
    } else {
        Box::new(Silent)
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "starting with bank '{}' ({} questions), {} store",
        bank.name(),
        bank.len(),
        config.store
    );
    let mut engine = QuizEngine::with_rng(bank, config.session_config(), rng, store, sound);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut engine);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn init_logging(to_stderr: bool) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "quizbattle=info".into());

    let layer = if to_stderr {
        fmt::layer().with_writer(io::stderr).boxed()
    } else {
        let path = AppDirs::log_path().unwrap_or_else(|| PathBuf::from("quizbattle.log"));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();
    Ok(())
}

/// An unreachable store degrades to an in-memory one so play is never blocked.
fn open_store(kind: StoreKind, reset: bool) -> Box<dyn ProgressStore> {
    let store: Box<dyn ProgressStore> = match kind {
        StoreKind::Sqlite => match StatsDb::new() {
            Ok(db) => {
                if reset {
                    if let Err(e) = db.clear_all() {
                        warn!("unable to reset progress: {}", e);
                    }
                }
                return Box::new(db);
            }
            Err(e) => {
                warn!("progress database unavailable, keeping progress in memory: {}", e);
                Box::new(MemoryProgressStore::new())
            }
        },
        StoreKind::Json => Box::new(JsonProgressStore::new()),
    };

    if reset {
        if let Err(e) = store.save(&CumulativeProgress::default()) {
            warn!("unable to reset progress: {}", e);
        }
    }
    store
}

fn start_tui<B: Backend, R: Rng>(
    terminal: &mut Terminal<B>,
    engine: &mut QuizEngine<R>,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::terminal();

    loop {
        terminal.draw(|f| f.render_widget(&engine.snapshot(), f.area()))?;

        if !controls::drive(engine, runner.step()) {
            break;
        }
    }

    Ok(())
}
