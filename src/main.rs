use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use expense_tracker::config::SummaryConfig;
use expense_tracker::summary::{SummaryClient, SummaryDispatcher, SummaryOutcome, Summarizer};
use expense_tracker::ui::app::{App, InputMode};
use expense_tracker::ui::render;

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    mut outcomes: UnboundedReceiver<SummaryOutcome>,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            let size = f.size();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints(
                    [
                        Constraint::Min(5),
                        Constraint::Length(5),
                        Constraint::Length(3),
                    ]
                    .as_ref(),
                )
                .split(size);

            render::render_expense_list(f, &app, chunks[0]);
            render::render_summary_panel(f, &app, chunks[1]);
            render::render_help_panel(f, chunks[2]);

            // Filter prompt / add form on top of everything else
            render::render_input_overlays(f, &app, size);
        })?;

        // Apply summaries that settled while we were drawing
        while let Ok(outcome) = outcomes.try_recv() {
            app.settle_summary(outcome);
        }

        // Poll with a timeout so in-flight summaries keep the UI live
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('a') => app.open_form(),
                    KeyCode::Char('d') => app.delete_selected(),
                    KeyCode::Char('f') => app.start_filtering(),
                    KeyCode::Up => app.previous(),
                    KeyCode::Down => app.next(),
                    KeyCode::Esc => app.clear_filter(),
                    _ => {}
                },
                InputMode::Filtering => match key.code {
                    KeyCode::Enter => app.confirm_filter(),
                    KeyCode::Esc => app.clear_filter(),
                    KeyCode::Backspace => app.handle_backspace(),
                    KeyCode::Char(c) => app.handle_input(c),
                    _ => {}
                },
                InputMode::Adding => match key.code {
                    KeyCode::Enter => app.submit_form(),
                    KeyCode::Esc => app.cancel_form(),
                    KeyCode::Tab => app.form.focus = app.form.focus.next(),
                    KeyCode::BackTab => app.form.focus = app.form.focus.prev(),
                    KeyCode::Backspace => app.handle_backspace(),
                    KeyCode::Char(c) => app.handle_input(c),
                    _ => {}
                },
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr and stay off unless RUST_LOG is set, so the
    // alternate screen is not garbled.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(io::stderr)
        .init();

    let client: Option<Arc<dyn Summarizer>> = match SummaryConfig::from_env() {
        Ok(config) => Some(Arc::new(SummaryClient::new(config)?)),
        Err(err) => {
            tracing::warn!(error = %err, "summary endpoint not configured; summaries will be unavailable");
            None
        }
    };
    let (dispatcher, outcomes) = SummaryDispatcher::new(client);
    let app = App::new(dispatcher);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, outcomes).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}
