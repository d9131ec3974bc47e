//! Interactive planner: onboarding wizard, plan generation and dashboard.

pub mod app;
mod ui;

use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use smartfit_core::session::Session;

use crate::AppContext;
use app::App;

/// Launch the interactive planner.
pub async fn run_planner(ctx: &AppContext) -> Result<()> {
    let session = Session::restore(ctx.generator()?, ctx.store.clone(), ctx.settings())?;
    let mut app = App::new(session, ctx.config.store_config.data_dir.clone());
    tracing::info!(screen = app.session.screen().name(), "planner started");

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = app.tick_rate;

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Err(e) = app.handle_key(key) {
                        tracing::error!(error = %e, "key handler failed");
                        app.status_message = Some(format!("Erro: {e}"));
                    }
                }
            }
        }
        // Background results are collected whether or not a key arrived.
        app.on_tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
