use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fruit_master::ai::OpenRouterClient;
use fruit_master::ai_worker::spawn_fetch_worker;
use fruit_master::error::GenerationError;
use fruit_master::models::{FetchRequest, FetchResponse};
use fruit_master::{App, AppConfig, handle_key, logger, ui};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Write};
use std::panic;
use std::thread;
use std::time::Duration;
use tracing::{error, info};

const TICK: Duration = Duration::from_millis(100);

/// Raw mode plus alternate screen on `out`, undone on drop.
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = TerminalGuard { out };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        restore_terminal(&mut self.out);
    }
}

fn restore_terminal(out: &mut impl Write) {
    let _ = execute!(out, LeaveAlternateScreen, cursor::Show);
    let _ = disable_raw_mode();
}

/// `panic = "abort"` skips `Drop`, so main-thread panics restore the screen here.
fn install_panic_hook() {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if thread::current().name() == Some("main") {
            restore_terminal(&mut io::stdout());
        }
        hook(info);
    }));
}

fn main() -> Result<()> {
    if let Err(e) = logger::init(logger::LOG_FILE) {
        eprintln!("Could not open {}: {}", logger::LOG_FILE, e);
    }

    let config = AppConfig::from_env();
    info!(?config, "starting Fruit Master");

    let (request_tx, request_rx) = crossbeam_channel::unbounded::<FetchRequest>();
    let (response_tx, response_rx) = crossbeam_channel::unbounded::<FetchResponse>();
    // Not joined on exit: an in-flight fetch would hold up quitting.
    let _worker = spawn_fetch_worker(OpenRouterClient::new(&config), response_tx, request_rx)
        .context("failed to spawn fetch worker")?;

    install_panic_hook();
    let guard = TerminalGuard::enter(io::stdout())?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(config.ai_enabled());
    let result = run(&mut terminal, &mut app, &request_tx, &response_rx);

    drop(guard);

    if let Err(e) = &result {
        error!(error = %e, "event loop failed");
    }
    info!("exiting");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    requests: &crossbeam_channel::Sender<FetchRequest>,
    responses: &crossbeam_channel::Receiver<FetchResponse>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && let Some(request) = handle_key(app, key)
        {
            let id = request.id;
            if requests.send(request).is_err() {
                // Worker is gone; fail the round so the player can go home.
                app.apply_response(FetchResponse {
                    request_id: id,
                    result: Err(GenerationError::transport("fetch worker stopped")),
                });
            }
        }

        for response in responses.try_iter() {
            app.apply_response(response);
        }
        app.on_tick();
    }
    Ok(())
}
