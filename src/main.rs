//! `mdpad` binary: argument parsing, logging, and the terminal event loop.

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use mdpad::app::App;
use mdpad::config::Config;
use mdpad::export::{self, ExportFormat};
use mdpad::logging;
use mdpad::preview::Preview;
use mdpad::route::Route;
use mdpad::session::DocumentSession;
use mdpad::storage::{FileStorage, Storage};
use mdpad::terminal::TerminalGuard;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

/// Program entry point.
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

/// Parsed command line.
#[derive(Default)]
struct Args {
    route: Option<String>,
    new: bool,
    config: Option<PathBuf>,
    storage: Option<PathBuf>,
    log_file: Option<PathBuf>,
    export: Option<ExportFormat>,
}

fn print_help() {
    println!("mdpad: a terminal Markdown editor with live preview");
    println!();
    println!("USAGE:");
    println!("    mdpad [ROUTE|ID]          Open '/' (home), '/doc/<id>' or a bare <id>");
    println!("    mdpad --new               Start a new document");
    println!("    mdpad -h, --help          Show this help message");
    println!("    mdpad -v, --version       Show version information");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>           Config file (default ./mdpad.toml, then the user config dir)");
    println!("    --storage <dir>           Document storage directory");
    println!("    --log-file <path>         Log file or directory");
    println!("    --export md|html          Write document.md / document.html and exit");
    println!();
    println!("KEYBINDINGS:");
    println!("    Ctrl+P                    Command palette");
    println!("    Ctrl+Z / Ctrl+Y           Undo / redo");
    println!("    Ctrl+B / Ctrl+I           Bold / italic");
    println!("    F6                        Switch editor / preview focus");
    println!("    Ctrl+Q                    Quit");
}

fn next_value(it: &mut dyn Iterator<Item = String>, flag: &str) -> Result<String> {
    it.next().with_context(|| format!("Missing value for '{flag}'"))
}

/// Returns `None` when the program should exit right away (help/version).
fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut args = Args::default();

    while let Some(a) = it.next() {
        match a.as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(None);
            }
            "-v" | "--version" => {
                println!("mdpad v{}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "--new" => args.new = true,
            "--config" => args.config = Some(next_value(&mut it, &a)?.into()),
            "--storage" => args.storage = Some(next_value(&mut it, &a)?.into()),
            "--log-file" => args.log_file = Some(next_value(&mut it, &a)?.into()),
            "--export" => args.export = Some(ExportFormat::parse(&next_value(&mut it, &a)?)?),
            flag if flag.starts_with('-') => {
                bail!("Unknown flag '{flag}'. Try 'mdpad --help' for more information.");
            }
            route => {
                if args.route.is_some() {
                    bail!("Only one document can be opened at a time");
                }
                args.route = Some(route.to_string());
            }
        }
    }
    Ok(Some(args))
}

fn run() -> Result<()> {
    let Some(args) = parse_args(std::env::args().skip(1))? else { return Ok(()); };

    let _log = logging::init(args.log_file.clone())?;
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.storage {
        config.storage_dir = dir;
    }
    info!(storage = %config.storage_dir.display(), "starting");

    let storage: Rc<dyn Storage> = Rc::new(FileStorage::new(config.storage_dir.clone()));
    let mut route = match &args.route {
        Some(r) => Route::parse(r)?,
        None => Route::Home,
    };
    if args.new {
        route = mdpad::session::create_document(storage.as_ref())?.route();
    }

    if let Some(format) = args.export {
        let path = export_document(storage, &config, &route, format)?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut stdout = io::stdout();
    let size = terminal::size().context("Failed to read terminal size")?;
    let term = TerminalGuard::new(&mut stdout)?;
    let mut app = App::new(storage, &config, &route, size);

    let res = event_loop(&mut app, &mut stdout);
    let warning = app.shutdown();
    // Restore the terminal before printing anything.
    drop(term);

    if let Some(w) = warning {
        eprintln!("Warning: {w}");
        res?;
        bail!("Unsaved changes to {} were not written", app.route());
    }
    res
}

/// Render → poll input (so timers keep running) → update state, until quit.
fn event_loop(app: &mut App, stdout: &mut io::Stdout) -> Result<()> {
    loop {
        app.render(stdout)?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if app.handle_key(key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(w, h) => app.on_resize(w, h),
                _ => {}
            }
        }
        app.tick();
    }
}

/// Headless `--export`: render the stored document without starting the UI.
fn export_document(storage: Rc<dyn Storage>, config: &Config, route: &Route, format: ExportFormat) -> Result<PathBuf> {
    let mut session = DocumentSession::open(route.document(), storage, &config.session_options());
    if let Some(w) = session.take_warning() {
        bail!(w);
    }
    let payload = match format {
        ExportFormat::Markdown => export::export_markdown(session.text()),
        ExportFormat::Html => {
            let preview = Preview::render(session.text());
            export::export_html(Some(&preview)).context("Nothing to export")?
        }
    };
    export::write_export(&config.export_dir, &payload)
}
