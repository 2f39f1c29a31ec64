mod app;
mod config;
mod git;
mod github;
mod logging;
mod tasks;
mod ui;
mod watch;

use anyhow::{Context, Result};
use app::{App, Mode, Msg, Task};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;
use tasks::{Scheduler, Settings};
use watch::ChangeDetector;

/// Live terminal dashboard for a git repository
#[derive(Parser)]
#[command(name = "blocks", version, about)]
struct Cli {
    /// Repository path to open (defaults to current directory)
    #[arg(default_value = ".")]
    path: String,

    /// Start in this mode
    #[arg(long, value_enum)]
    mode: Option<StartMode>,

    /// Disable live reload on filesystem changes
    #[arg(long)]
    no_watch: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StartMode {
    Working,
    Branch,
    Browse,
    Docs,
}

impl From<StartMode> for Mode {
    fn from(m: StartMode) -> Self {
        match m {
            StartMode::Working => Mode::WorkingChanges,
            StartMode::Branch => Mode::BranchChanges,
            StartMode::Browse => Mode::BrowseAll,
            StartMode::Docs => Mode::BrowseDocs,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let repo_root = git::get_repo_root_in(&cli.path)
        .with_context(|| format!("{} is not inside a git repository", cli.path))?;
    let git_dir = git::git_dir_in(&repo_root)?;
    let (config, config_problems) = config::load_config(&repo_root);

    // Logging is best effort: the dashboard still runs without a log file
    let _ = logging::init(&config.log.level);
    for problem in &config_problems {
        tracing::warn!("{}", problem);
    }

    let mode = cli.mode.map(Mode::from).unwrap_or_default();
    let repo: Arc<dyn git::Repository> = Arc::new(git::GitCli::new(
        repo_root.clone(),
        config.git.default_branches.clone(),
    ));
    let prs: Arc<dyn github::PullRequests> = Arc::new(github::GhCli::new(repo_root.clone()));

    let (tx, rx) = mpsc::channel::<Msg>();
    let scheduler = Scheduler::new(
        repo,
        prs,
        tx.clone(),
        Settings {
            repo_root: repo_root.clone(),
            recent_commits: config.git.recent_commits,
            editor: config.editor.resolve(),
        },
    );
    tracing::info!(repo = %repo_root, mode = mode.label(), "starting");

    let highlighter = ui::highlight::Highlighter::new();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let watch_enabled = config.watcher.enabled && !cli.no_watch;
    let watcher_settings = (config.watcher.exclude.clone(), config.timing.debounce());
    let mut app = App::new(config, mode, size.width, size.height);
    scheduler.spawn_all(app.init());

    let _detector = if watch_enabled {
        let (exclude, debounce) = watcher_settings;
        match ChangeDetector::start(
            PathBuf::from(&repo_root),
            PathBuf::from(&git_dir),
            &exclude,
            debounce,
            tx.clone(),
        ) {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "live reload disabled");
                None
            }
        }
    } else {
        None
    };
    drop(tx);

    // Run event loop
    let result = run_app(&mut terminal, &mut app, &highlighter, &scheduler, &rx);

    scheduler.shutdown();

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %format!("{:#}", err), "exiting on error");
        eprintln!("Error: {:?}", err);
    }
    tracing::info!("shut down");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    hl: &ui::highlight::Highlighter,
    scheduler: &Scheduler,
    rx: &Receiver<Msg>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app, hl))?;

        // Poll with a timeout so worker results and ticks keep flowing
        if event::poll(Duration::from_millis(100))? {
            let msg = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => Some(Msg::Key(key)),
                Event::Resize(w, h) => Some(Msg::Resize(w, h)),
                _ => None,
            };
            if let Some(msg) = msg {
                dispatch(terminal, app, scheduler, msg)?;
            }
        }

        // Drain everything the workers delivered since the last frame
        while let Ok(msg) = rx.try_recv() {
            dispatch(terminal, app, scheduler, msg)?;
        }

        dispatch(terminal, app, scheduler, Msg::Tick)?;

        if app.state.should_quit {
            return Ok(());
        }
    }
}

/// One dispatch turn. Terminal editors run right here with the terminal
/// handed over; everything else goes to the scheduler.
fn dispatch(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    scheduler: &Scheduler,
    msg: Msg,
) -> Result<()> {
    for task in app.update(msg) {
        match task {
            Task::EditInTerminal { path, line } => {
                suspend_terminal(terminal)?;
                let outcome = scheduler.edit_in_terminal(&path, line);
                resume_terminal(terminal)?;
                scheduler.spawn_all(app.update(outcome));
            }
            other => scheduler.spawn(other),
        }
    }
    Ok(())
}

fn suspend_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn resume_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(())
}
