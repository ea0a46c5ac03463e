mod api;
mod app;
mod cli;
mod config;
mod editor;
mod notify;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{File, OpenOptions};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::http::HttpCategoryApi;
use app::App;
use config::AppConfig;
use editor::CategoryListEditor;

#[derive(Parser, Debug)]
#[command(name = "catnames")]
#[command(version)]
#[command(about = "Manage a remote category list from the terminal")]
struct Args {
    /// Print all categories as JSON and exit
    #[arg(short, long)]
    list: bool,

    /// Add a category and exit
    #[arg(short, long, value_name = "NAME")]
    add: Option<String>,

    /// Rename a category and exit
    #[arg(long, num_args = 2, value_names = ["ID", "NAME"])]
    rename: Option<Vec<String>>,

    /// Soft-delete a category and exit
    #[arg(short, long, value_name = "ID")]
    delete: Option<String>,

    /// Override the API endpoint from the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Override the username from the config file
    #[arg(long)]
    username: Option<String>,
}

impl Args {
    fn is_one_shot(&self) -> bool {
        self.list || self.add.is_some() || self.rename.is_some() || self.delete.is_some()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(!args.is_one_shot());

    let mut config = AppConfig::load()?;
    if let Some(url) = args.api_url.clone() {
        config.api_url = url;
    }
    if let Some(username) = args.username.clone() {
        config.username = username;
    }

    let api = Arc::new(HttpCategoryApi::new(&config)?);

    let mut editor = CategoryListEditor::new(api.clone());

    // Handle CLI-only commands
    let output = if args.list {
        Some(cli::list(api.as_ref()).await?)
    } else if let Some(name) = args.add {
        Some(cli::add(&mut editor, &name).await?)
    } else if let Some([id, name]) = args.rename.as_deref() {
        Some(cli::rename(&mut editor, id, name).await?)
    } else if let Some(id) = args.delete {
        Some(cli::delete(&mut editor, &id).await?)
    } else {
        None
    };

    if let Some(output) = output {
        if !output.is_empty() {
            println!("{}", output);
        }
        return Ok(());
    }

    run_tui(editor, &config).await
}

fn init_logging(tui: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if !tui {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr))
            .init();
        return;
    }

    // The terminal belongs to the TUI, so logs go to a file
    match open_log_file() {
        Ok(file) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init(),
        Err(e) => eprintln!("Logging disabled: {:#}", e),
    }
}

fn open_log_file() -> Result<File> {
    let dir = dirs::cache_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?
        .join("catnames");
    std::fs::create_dir_all(&dir).context("Could not create log directory")?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("catnames.log"))
        .context("Could not open log file")
}

async fn run_tui(editor: CategoryListEditor, config: &AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(editor, config);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    app.load();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.is_quit_key(&key) {
                        return Ok(());
                    }
                    app.handle_key(key);
                }
            }
        }

        app.tick();
    }
}
