mod logging;
mod page;

use std::time::Duration;

use backdrop_config::Config;
use backdrop_engine::{
    Delivery, FrameClock, Host, PageLayout, PointerKind, Sampler, Session, SessionId,
    SurfaceView,
};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::Line,
    widgets::Paragraph,
};

use crate::page::PlacedSection;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    logging::init(&config.log_level);
    if let Some(err) = load_error {
        tracing::error!(error = %err, "could not load configuration, using defaults");
    }

    let terminal = ratatui::init();
    bracket(
        || execute!(std::io::stdout(), EnableMouseCapture, EnableFocusChange),
        || App::new(config).run(terminal),
        || {
            if let Err(err) = execute!(std::io::stdout(), DisableMouseCapture, DisableFocusChange) {
                tracing::warn!(error = %err, "could not release mouse capture");
            }
            ratatui::restore();
        },
    )
}

/// Run `body` once `enter` succeeds. `leave` always runs, so a failed setup still
/// hands the terminal back.
fn bracket<T>(
    enter: impl FnOnce() -> std::io::Result<()>,
    body: impl FnOnce() -> color_eyre::Result<T>,
    leave: impl FnOnce(),
) -> color_eyre::Result<T> {
    let result = enter().map_err(Into::into).and_then(|()| body());
    leave();
    result
}

/// The main application: the page host and one session per configured effect.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Paused apps hold no sessions.
    paused: bool,
    config: Config,
    host: Host,
    sessions: Vec<Session>,
    sections: Vec<PlacedSection>,
    clock: FrameClock,
    sampler: Sampler,
    next_session: u32,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let host = Host::new(PageLayout::default(), config.device_pixel_ratio);
        let sampler = Sampler::new(config.seed);
        Self {
            running: false,
            paused: false,
            config,
            host,
            sessions: Vec::new(),
            sections: Vec::new(),
            clock: FrameClock::new(),
            sampler,
            next_session: 0,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.relayout(size.width, size.height);
        self.spawn_sessions();

        self.running = true;
        let interval = self.config.frame_interval();
        while self.running {
            let now = self.clock.elapsed();
            self.run_frames(now);
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(now + interval)?;
        }

        self.stop_sessions();
        Ok(())
    }

    /// Run every frame callback due at `now`.
    fn run_frames(&mut self, now: Duration) {
        for (handle, owner) in self.host.begin_frame(now) {
            if let Some(session) = self.sessions.iter_mut().find(|s| s.id() == owner) {
                session.on_frame(handle, &mut self.host);
            }
        }
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let [page, help] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let backdrop = self.config.backdrop_color();

        for section in &self.sections {
            let region = section.config.region_id();
            let view = self
                .sessions
                .iter()
                .filter(|s| s.region_id() == region)
                .filter_map(|s| s.surface())
                .fold(SurfaceView::new(backdrop), |view, surface| view.layer(surface));
            frame.render_widget(view, section.area);

            if !section.config.title.is_empty() {
                let title = Line::from(format!(" {} ", section.config.title))
                    .bold()
                    .fg(Color::White);
                let area = Rect {
                    height: section.area.height.min(1),
                    ..section.area
                };
                frame.render_widget(Paragraph::new(title), area.intersection(page));
            }
        }

        let mut spans = vec![
            "q".bold().fg(Color::Cyan),
            " quit  ".dark_gray(),
            "r".bold().fg(Color::Cyan),
            " restart  ".dark_gray(),
            "space".bold().fg(Color::Cyan),
            " pause".dark_gray(),
        ];
        if self.paused {
            spans.push("  paused".yellow());
        }
        frame.render_widget(Line::from(spans).centered(), help);
    }

    /// Reads crossterm events until `deadline` and updates the state of [`App`].
    fn handle_crossterm_events(&mut self, deadline: Duration) -> color_eyre::Result<()> {
        loop {
            let remaining = deadline.saturating_sub(self.clock.elapsed());
            if !event::poll(remaining)? {
                return Ok(());
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::FocusLost => {
                    let deliveries = self.host.leave_all();
                    self.dispatch(deliveries);
                }
                Event::Resize(width, height) => {
                    let deliveries = self.relayout(width, height);
                    self.dispatch(deliveries);
                }
                _ => {}
            }
            if !self.running {
                return Ok(());
            }
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('r')) => self.restart(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            _ => {}
        }
    }

    /// Forward pointer motion to the host. Dragging stands in for touch.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        let kind = match mouse.kind {
            MouseEventKind::Moved => PointerKind::Mouse,
            MouseEventKind::Drag(_) => PointerKind::Touch,
            _ => return,
        };
        let client = page::cell_center(mouse.column, mouse.row);
        let deliveries = self.host.pointer(client, kind);
        self.dispatch(deliveries);
    }

    fn dispatch(&mut self, deliveries: Vec<Delivery>) {
        for delivery in deliveries {
            if let Some(session) = self.sessions.iter_mut().find(|s| s.id() == delivery.session) {
                session.on_signal(delivery.signal, &self.host);
            }
        }
    }

    /// Lay the sections out for a terminal of `width` x `height` cells.
    fn relayout(&mut self, width: u16, height: u16) -> Vec<Delivery> {
        // The bottom row holds the help line.
        let area = Rect::new(0, 0, width, height.saturating_sub(1));
        self.sections = page::place(&self.config.sections, area);
        self.host.relayout(page::layout(&self.sections))
    }

    /// Create and start one session per effect bound to a placed section, top section
    /// first and bottom layer first within a section.
    fn spawn_sessions(&mut self) {
        for binding in &self.config.effects {
            if !self.sections.iter().any(|s| s.config.region_id() == binding.region) {
                tracing::warn!(region = %binding.region, "no section owns this region, effect skipped");
            }
        }

        for section in &self.sections {
            let region = section.config.region_id();
            for effect in self.config.effects_for(&region) {
                let id = SessionId(self.next_session);
                self.next_session += 1;

                let mut session =
                    Session::new(id, &self.host, &region, effect, self.sampler.fork());
                session.start(&mut self.host);
                self.sessions.push(session);
            }
        }
        tracing::info!(sessions = self.sessions.len(), "sessions started");
    }

    fn stop_sessions(&mut self) {
        for session in &mut self.sessions {
            session.stop(&mut self.host);
        }
        self.sessions.clear();
    }

    /// Stopped sessions never restart, so restarting builds fresh ones.
    fn restart(&mut self) {
        self.stop_sessions();
        self.paused = false;
        self.spawn_sessions();
    }

    fn toggle_pause(&mut self) {
        if self.paused {
            self.paused = false;
            self.spawn_sessions();
        } else {
            self.stop_sessions();
            self.paused = true;
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;

    use backdrop_engine::SessionState;

    use super::*;

    #[test]
    fn test_bracket_leaves_after_failed_enter() {
        let ran = Cell::new(false);
        let left = Cell::new(false);
        let result = bracket(
            || Err(io::Error::other("no mouse")),
            || {
                ran.set(true);
                Ok(())
            },
            || left.set(true),
        );
        assert!(result.is_err());
        assert!(!ran.get());
        assert!(left.get());
    }

    #[test]
    fn test_bracket_leaves_after_body() {
        let left = Cell::new(false);
        let result: color_eyre::Result<()> = bracket(
            || Ok(()),
            || Err(color_eyre::eyre::eyre!("draw failed")),
            || left.set(true),
        );
        assert!(result.is_err());
        assert!(left.get());

        let left = Cell::new(false);
        let value = bracket(|| Ok(()), || Ok(7), || left.set(true));
        assert_eq!(value.ok(), Some(7));
        assert!(left.get());
    }

    #[test]
    fn test_sessions_follow_sections() {
        let mut app = App::new(Config::default());
        app.relayout(100, 40);
        app.spawn_sessions();

        let regions: Vec<&str> = app.sessions.iter().map(|s| s.region_id()).collect();
        assert_eq!(
            regions,
            vec![
                "hero-bg",
                "about-bg",
                "projects-bg",
                "projects-bg",
                "skills-bg",
                "contact-bg"
            ]
        );
        assert!(app.sessions.iter().all(|s| s.state() == SessionState::Running));

        app.stop_sessions();
        assert_eq!(app.host.listeners().count(), 0);
    }
}
