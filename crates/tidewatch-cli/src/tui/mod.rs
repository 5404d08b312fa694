mod app;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tidewatch_feed::Monitor;

use app::App;

/// Run the interactive dashboard until the user quits.
pub fn run(monitor: Arc<Monitor>, endpoint: String) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let result = run_loop(&mut terminal, monitor, endpoint);
    ratatui::restore();
    result
}

fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    monitor: Arc<Monitor>,
    endpoint: String,
) -> anyhow::Result<()> {
    let mut app = App::new(monitor, endpoint);
    let mut dirty = true;

    while !app.should_quit {
        if dirty {
            terminal.draw(|f| ui::render(f, &app))?;
            dirty = false;
        }

        // Wake at least every 250ms to pick up merges from the feed task.
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    dirty = true;
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }

        if app.needs_refresh() {
            app.refresh_data();
            dirty = true;
        }
    }

    Ok(())
}
