use std::sync::Arc;

use tidewatch_feed::{DashboardSnapshot, Monitor};

/// Rows shown in the tank table.
pub const TANK_ROWS: usize = 8;
/// Rows shown in the injection table.
pub const INJECTION_ROWS: usize = 6;
/// Lines shown in the agent log.
pub const AGENT_LOG_ROWS: usize = 15;
/// Alert chips shown above the agent log.
pub const ALERT_CHIPS: usize = 3;

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Stream,
    Tanks,
    Injections,
    Agents,
}

impl Panel {
    pub fn next(self) -> Self {
        match self {
            Panel::Stream => Panel::Tanks,
            Panel::Tanks => Panel::Injections,
            Panel::Injections => Panel::Agents,
            Panel::Agents => Panel::Stream,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Panel::Stream => Panel::Agents,
            Panel::Tanks => Panel::Stream,
            Panel::Injections => Panel::Tanks,
            Panel::Agents => Panel::Injections,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Panel::Stream => "Events",
            Panel::Tanks => "Tanks",
            Panel::Injections => "Injections",
            Panel::Agents => "Agents",
        }
    }
}

/// Application state for the dashboard.
pub struct App {
    pub monitor: Arc<Monitor>,
    pub endpoint: String,
    pub should_quit: bool,
    pub active_panel: Panel,
    pub paused: bool,

    // Data
    pub snapshot: DashboardSnapshot,

    // Scroll positions (per panel)
    pub stream_scroll: usize,
    pub tank_scroll: usize,
    pub injection_scroll: usize,
    pub agent_scroll: usize,
}

impl App {
    pub fn new(monitor: Arc<Monitor>, endpoint: String) -> Self {
        let snapshot = monitor.snapshot();
        Self {
            monitor,
            endpoint,
            should_quit: false,
            active_panel: Panel::Stream,
            paused: false,
            snapshot,
            stream_scroll: 0,
            tank_scroll: 0,
            injection_scroll: 0,
            agent_scroll: 0,
        }
    }

    /// True when the monitor has merged or flipped connectivity since the
    /// last refresh. While paused only connectivity counts.
    pub fn needs_refresh(&self) -> bool {
        if self.monitor.connectivity() != self.snapshot.connectivity {
            return true;
        }
        !self.paused && self.monitor.revision() != self.snapshot.revision
    }

    /// Pull the latest views (unless paused). Connectivity is always live.
    pub fn refresh_data(&mut self) {
        if self.paused {
            self.snapshot.connectivity = self.monitor.connectivity();
            return;
        }
        self.snapshot = self.monitor.snapshot();
        self.clamp_scrolls();
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.active_panel = self.active_panel.next(),
            KeyCode::BackTab => self.active_panel = self.active_panel.prev(),
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            _ => {}
        }
    }

    fn panel_len(&self, panel: Panel) -> usize {
        match panel {
            Panel::Stream => self.snapshot.recent.len(),
            Panel::Tanks => self.snapshot.tanks.len().min(TANK_ROWS),
            Panel::Injections => self.snapshot.injections.len().min(INJECTION_ROWS),
            Panel::Agents => self.snapshot.recent.len().min(AGENT_LOG_ROWS),
        }
    }

    fn scroll_down(&mut self) {
        let max = self.panel_len(self.active_panel);
        let scroll = self.active_scroll_mut();
        if *scroll < max.saturating_sub(1) {
            *scroll += 1;
        }
    }

    fn scroll_up(&mut self) {
        let scroll = self.active_scroll_mut();
        *scroll = scroll.saturating_sub(1);
    }

    fn clamp_scrolls(&mut self) {
        for panel in [Panel::Stream, Panel::Tanks, Panel::Injections, Panel::Agents] {
            let max = self.panel_len(panel).saturating_sub(1);
            let scroll = self.scroll_mut(panel);
            *scroll = (*scroll).min(max);
        }
    }

    fn active_scroll_mut(&mut self) -> &mut usize {
        self.scroll_mut(self.active_panel)
    }

    fn scroll_mut(&mut self, panel: Panel) -> &mut usize {
        match panel {
            Panel::Stream => &mut self.stream_scroll,
            Panel::Tanks => &mut self.tank_scroll,
            Panel::Injections => &mut self.injection_scroll,
            Panel::Agents => &mut self.agent_scroll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;
    use tidewatch_core::{Connectivity, DrainResponse, Event, EventKind};
    use tidewatch_feed::FeedError;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn app() -> App {
        App::new(Arc::new(Monitor::new()), "http://localhost:8000".into())
    }

    fn feed(monitor: &Monitor, n: usize) {
        let token = monitor.active_session().unwrap_or_else(|| monitor.begin_session());
        let events = (0..n)
            .map(|i| Event::new(EventKind::TankSealed, json!({ "tank_id": format!("T-{i}") })))
            .collect();
        monitor.apply(token, Ok(DrainResponse::new(events)));
    }

    #[test]
    fn new_app_has_empty_data() {
        let app = app();
        assert!(app.snapshot.recent.is_empty());
        assert!(app.snapshot.tanks.is_empty());
        assert_eq!(app.snapshot.connectivity, Connectivity::Offline);
        assert!(!app.should_quit);
        assert!(!app.paused);
        assert_eq!(app.active_panel, Panel::Stream);
    }

    #[test]
    fn panel_cycling() {
        assert_eq!(Panel::Stream.next(), Panel::Tanks);
        assert_eq!(Panel::Tanks.next(), Panel::Injections);
        assert_eq!(Panel::Injections.next(), Panel::Agents);
        assert_eq!(Panel::Agents.next(), Panel::Stream);
        assert_eq!(Panel::Stream.prev(), Panel::Agents);
    }

    #[test]
    fn quit_on_q() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn space_toggles_pause() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.paused);
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(!app.paused);
    }

    #[test]
    fn refresh_picks_up_merges_unless_paused() {
        let mut app = app();
        feed(&app.monitor, 2);
        app.refresh_data();
        assert_eq!(app.snapshot.tanks.len(), 2);
        assert_eq!(app.snapshot.connectivity, Connectivity::Online);

        app.handle_key(key(KeyCode::Char(' ')));
        feed(&app.monitor, 1);
        app.refresh_data();
        assert_eq!(app.snapshot.tanks.len(), 2);
    }

    #[test]
    fn needs_refresh_tracks_merges_and_connectivity() {
        let mut app = app();
        assert!(!app.needs_refresh());

        feed(&app.monitor, 1);
        assert!(app.needs_refresh());
        app.refresh_data();
        assert!(!app.needs_refresh());

        // An empty drain keeps the revision; nothing to redraw.
        let token = app.monitor.active_session().unwrap();
        app.monitor.apply(token, Ok(DrainResponse::default()));
        assert!(!app.needs_refresh());

        app.handle_key(key(KeyCode::Char(' ')));
        feed(&app.monitor, 1);
        assert!(!app.needs_refresh());
        app.monitor.apply(token, Err(FeedError::Status(500)));
        assert!(app.needs_refresh());
        app.refresh_data();
        assert_eq!(app.snapshot.connectivity, Connectivity::Offline);
        assert!(!app.needs_refresh());

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.needs_refresh());
    }

    #[test]
    fn scroll_is_bounded_by_visible_rows() {
        let mut app = app();
        feed(&app.monitor, 12);
        app.refresh_data();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Tanks);
        for _ in 0..20 {
            app.handle_key(key(KeyCode::Char('j')));
        }
        assert_eq!(app.tank_scroll, TANK_ROWS - 1);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.tank_scroll, TANK_ROWS - 2);
    }
}
