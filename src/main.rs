//! unitconv - Interactive unit converter
//!
//! A terminal UI application that converts between units of distance,
//! temperature, weight, pressure, currency, time, volume, area, speed, and
//! data, keeping a history of the session's conversions.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use unitconv::app::App;
use unitconv::cache::RateCache;
use unitconv::cli::{Cli, StartupConfig};
use unitconv::data::RatesClient;
use unitconv::logging::{default_log_path, LogTarget};
use unitconv::session::Session;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Converts once, prints the formula and result, and exits
async fn run_one_shot(config: &StartupConfig, value: f64) -> ExitCode {
    if let Err(e) = config.logging.init(&LogTarget::Stderr) {
        eprintln!("warning: {}", e);
    }

    let cache =
        RateCache::new(RatesClient::with_url(config.rates_url.clone())).with_ttl(config.rate_ttl);
    let mut session = Session::new(cache);

    let outcome = session
        .convert(config.category, config.from, config.to, value)
        .await;

    if let Some(error) = session.rate_error() {
        eprintln!("Error fetching currency rates: {}", error);
    }

    match outcome {
        Ok(conversion) => {
            println!("{}", conversion.formula);
            if let Some(note) = conversion.note {
                println!("Note: {}", note);
            }
            println!("{}", conversion.summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: Conversion failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs the interactive converter until the user quits
async fn run_interactive(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to a file so they don't draw over the UI
    if let Some(path) = default_log_path() {
        if let Err(e) = config.logging.init(&LogTarget::File(path)) {
            eprintln!("warning: {}", e);
        }
    }
    tracing::info!(category = %config.category, "starting interactive session");

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::from_config(config);

    // Main event loop
    loop {
        terminal.draw(|f| unitconv::ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.pending.is_some() {
            // Show the status line before blocking on the network
            terminal.draw(|f| unitconv::ui::render(f, &app))?;
            app.run_pending().await;
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    tracing::info!(
        conversions = app.session.history().len(),
        "session ended"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Some(value) = config.value {
        return run_one_shot(&config, value).await;
    }

    match run_interactive(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
