// App state and main event loop.
// Owns the dashboard view state, runs loads as background tasks and handles keys.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cancel::CancelHandle;
use crate::error::Result;
use crate::fetch::FetchOrchestrator;
use crate::github::DashboardSource;
use crate::model::Dashboard;
use crate::state::{DashboardState, SelectableList};
use crate::ui;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Projects,
    Issues,
    Timeline,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Projects, Tab::Issues, Tab::Timeline];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Projects => "Projects",
            Tab::Issues => "Issues",
            Tab::Timeline => "Timeline",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Projects => Tab::Issues,
            Tab::Issues => Tab::Timeline,
            Tab::Timeline => Tab::Projects,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Projects => Tab::Timeline,
            Tab::Issues => Tab::Projects,
            Tab::Timeline => Tab::Issues,
        }
    }
}

/// Result of one background load, tagged so stale results can be dropped.
struct LoadMessage {
    generation: u64,
    result: Result<Dashboard>,
}

/// Main application state.
pub struct App<S> {
    pub active_tab: Tab,
    pub state: DashboardState,
    pub show_help: bool,
    pub should_quit: bool,
    orchestrator: Arc<FetchOrchestrator<S>>,
    tx: mpsc::UnboundedSender<LoadMessage>,
    rx: mpsc::UnboundedReceiver<LoadMessage>,
    generation: u64,
    inflight: Option<CancelHandle>,
}

impl<S: DashboardSource> App<S> {
    pub fn new(orchestrator: Arc<FetchOrchestrator<S>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            active_tab: Tab::default(),
            state: DashboardState::new(),
            show_help: false,
            should_quit: false,
            orchestrator,
            tx,
            rx,
            generation: 0,
            inflight: None,
        }
    }

    pub fn orchestrator(&self) -> &FetchOrchestrator<S> {
        &self.orchestrator
    }

    /// Main event loop. Must run inside a tokio runtime context.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.reload();
        while !self.should_quit {
            self.drain_loads();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        self.cancel_inflight();
        Ok(())
    }

    /// Start a load, superseding any load still in flight.
    pub fn reload(&mut self) {
        self.cancel_inflight();
        self.generation += 1;

        let (handle, token) = CancelHandle::new();
        self.inflight = Some(handle);
        self.state.begin_load();

        let generation = self.generation;
        let orchestrator = self.orchestrator.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = orchestrator.load_dashboard(&token).await;
            // Receiver is gone only after the UI has exited.
            let _ = tx.send(LoadMessage { generation, result });
        });
        debug!(generation, "dashboard load started");
    }

    /// Drop cached project boards, then reload.
    pub fn hard_reload(&mut self) {
        self.orchestrator.force_refresh();
        self.reload();
    }

    fn cancel_inflight(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.cancel();
        }
    }

    /// Apply any finished loads without blocking.
    fn drain_loads(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.accept(message);
        }
    }

    fn accept(&mut self, message: LoadMessage) {
        if message.generation != self.generation {
            debug!(generation = message.generation, "stale load result dropped");
            return;
        }
        self.inflight = None;
        self.state.apply(message.result);
    }

    fn current_list(&mut self) -> &mut SelectableList {
        match self.active_tab {
            Tab::Projects => &mut self.state.projects,
            Tab::Issues => &mut self.state.issues,
            Tab::Timeline => &mut self.state.timeline,
        }
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            } else if code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.active_tab = self.active_tab.next(),
            KeyCode::BackTab => self.active_tab = self.active_tab.prev(),
            KeyCode::Down | KeyCode::Char('j') => self.current_list().select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.current_list().select_prev(),
            KeyCode::Home | KeyCode::Char('g') => self.current_list().select_first(),
            KeyCode::End | KeyCode::Char('G') => self.current_list().select_last(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('R') => self.hard_reload(),
            _ => {}
        }
    }
}
