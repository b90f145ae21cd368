//! xtlinks - copy download links for the files of a shared bundle.

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use xtlinks::app::App;
use xtlinks::clipboard::ClipboardWriter;
use xtlinks::config::{Config, API_URL_ENV};
use xtlinks::files::{self, FileEntry};
use xtlinks::links::{format_links_text, LinkGenerator, QueryLinkGenerator};
use xtlinks::ui;

#[derive(Parser, Debug)]
#[command(name = "xtlinks")]
#[command(about = "Copy download links for the files of a shared bundle", long_about = None)]
struct Args {
    /// Manifest listing the bundle's files (`key<TAB>name` per line)
    #[arg(long, short)]
    manifest: Option<PathBuf>,

    /// Add a file as KEY or KEY=NAME (repeatable)
    #[arg(long = "file", short = 'f', value_name = "KEY[=NAME]")]
    files: Vec<String>,

    /// Bundle token passed to link generation
    #[arg(long)]
    xtlink: String,

    /// Bundle password passed to link generation
    #[arg(long, default_value = "")]
    password: String,

    /// API base URL for download links
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Print all links to stdout instead of opening the file list
    #[arg(long)]
    print: bool,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(log_file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting xtlinks");
    }

    let files = collect_files(&args)?;
    let config = Config::new(args.api_url.clone(), args.xtlink.clone(), args.password.clone());

    if args.print {
        let api_base = config.api_base()?;
        let links = QueryLinkGenerator.download_links(
            api_base,
            &config.xtlink,
            &files,
            &config.password,
        );
        println!("{}", format_links_text(&links));
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let mut app = App::new(
        files,
        config,
        Box::new(QueryLinkGenerator),
        ClipboardWriter::system(),
    );
    let res = run_app(&mut terminal, &mut app);
    app.teardown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    tracing::info!("xtlinks exited");

    Ok(())
}

fn collect_files(args: &Args) -> Result<Vec<FileEntry>> {
    let mut entries = match &args.manifest {
        Some(path) => files::load_manifest(path)?,
        None => Vec::new(),
    };

    for spec in &args.files {
        match FileEntry::from_arg(spec) {
            Some(entry) => entries.push(entry),
            None => bail!("Invalid --file value '{}': expected KEY or KEY=NAME", spec),
        }
    }

    files::ensure_unique_keys(&entries)?;
    Ok(entries)
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut pending_g = false; // For 'gg' vim binding

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let now = Instant::now();
                    let was_g = std::mem::take(&mut pending_g);
                    match (key.modifiers, key.code) {
                        // Quit
                        (KeyModifiers::NONE, KeyCode::Char('q'))
                        | (KeyModifiers::NONE, KeyCode::Esc)
                        | (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(()),

                        // Navigation
                        (KeyModifiers::NONE, KeyCode::Up)
                        | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                            app.file_list.cursor_up();
                        },
                        (KeyModifiers::NONE, KeyCode::Down)
                        | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                            app.file_list.cursor_down();
                        },
                        (KeyModifiers::NONE, KeyCode::Char('g')) => {
                            if was_g {
                                app.file_list.goto_first();
                            } else {
                                pending_g = true;
                            }
                        },
                        (KeyModifiers::SHIFT, KeyCode::Char('G')) => {
                            app.file_list.goto_last();
                        },

                        // Clipboard
                        (KeyModifiers::NONE, KeyCode::Enter)
                        | (KeyModifiers::NONE, KeyCode::Char(' '))
                        | (KeyModifiers::NONE, KeyCode::Char('y')) => {
                            app.copy_selected(now);
                        },
                        (KeyModifiers::NONE, KeyCode::Char('a'))
                        | (KeyModifiers::SHIFT, KeyCode::Char('Y')) => {
                            app.copy_all(now);
                        },

                        // Features
                        (KeyModifiers::SHIFT, KeyCode::Char('T')) => {
                            app.cycle_theme();
                        },
                        (KeyModifiers::SHIFT, KeyCode::Char('?'))
                        | (KeyModifiers::NONE, KeyCode::Char('?')) => {
                            app.show_help();
                        },

                        _ => {},
                    }
                },
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        app.click(mouse.column, mouse.row, Instant::now());
                    }
                },
                _ => {},
            }
        }

        app.tick(Instant::now());
    }
}
