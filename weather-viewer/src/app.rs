//! Interactive application state and input handling.
//!
//! `App` owns the [`Session`] and every piece of purely visual state (input text, focus,
//! scroll offsets, open overlays). Fetches run on the tokio runtime and report back through a
//! channel that the event loop drains on every tick.

use std::sync::{
    Arc,
    mpsc::{self, Receiver, Sender},
};

use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind},
    layout::Rect,
    widgets::TableState,
};
use tokio::{runtime::Handle, task::JoinHandle};
use weather_core::{
    ChartKind, ChartModel, HistoryFetcher, Session, SessionError, View, WeatherError,
    WeatherTable,
    session::{SearchOutcome, SearchTicket},
};

use crate::ui;

/// Buttons of the action bar, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    RainfallLine,
    RainfallPie,
    Temperature,
    Humidity,
    ShowData,
}

impl NavAction {
    pub const ALL: [NavAction; 5] = [
        NavAction::RainfallLine,
        NavAction::RainfallPie,
        NavAction::Temperature,
        NavAction::Humidity,
        NavAction::ShowData,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NavAction::RainfallLine => "Rainfall Line Graph",
            NavAction::RainfallPie => "Rainfall Pie Chart",
            NavAction::Temperature => "Temperature Graph",
            NavAction::Humidity => "Humidity Graph",
            NavAction::ShowData => "Show Data",
        }
    }

    fn chart_kind(&self) -> Option<ChartKind> {
        match self {
            NavAction::RainfallLine => Some(ChartKind::RainfallLine),
            NavAction::RainfallPie => Some(ChartKind::RainfallPie),
            NavAction::Temperature => Some(ChartKind::Temperature),
            NavAction::Humidity => Some(ChartKind::Humidity),
            NavAction::ShowData => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Actions,
}

/// Modal message; blocks all other input until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// An open chart window.
#[derive(Debug)]
pub struct ChartOverlay {
    pub model: ChartModel,
    /// Point or slice under the hover cursor.
    pub cursor: Option<usize>,
    /// Plotting area from the last draw, used to map the mouse onto data.
    pub plot_area: Rect,
}

impl ChartOverlay {
    pub(crate) fn new(model: ChartModel) -> Self {
        Self {
            model,
            cursor: None,
            plot_area: Rect::default(),
        }
    }

    fn step(&mut self, delta: isize) {
        let len = self.model.len();
        if len == 0 {
            return;
        }
        let next = match self.cursor {
            None if delta >= 0 => 0,
            None => len - 1,
            Some(i) => i.saturating_add_signed(delta).min(len - 1),
        };
        self.cursor = Some(next);
    }
}

#[derive(Debug)]
struct FetchMessage {
    ticket: SearchTicket,
    result: Result<WeatherTable, WeatherError>,
}

pub struct App {
    pub(crate) session: Session,
    fetcher: Arc<HistoryFetcher>,
    runtime: Handle,
    tx: Sender<FetchMessage>,
    rx: Receiver<FetchMessage>,
    inflight: Option<JoinHandle<()>>,

    pub(crate) input: String,
    pub(crate) focus: Focus,
    pub(crate) selected: usize,
    pub(crate) summary_scroll: u16,
    pub(crate) table_state: TableState,
    pub(crate) chart: Option<ChartOverlay>,
    pub(crate) alert: Option<Alert>,
    pub(crate) status: String,
    pub(crate) tick: usize,
    should_quit: bool,
}

impl App {
    pub fn new(fetcher: Arc<HistoryFetcher>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            session: Session::new(),
            fetcher,
            runtime,
            tx,
            rx,
            inflight: None,
            input: String::new(),
            focus: Focus::Input,
            selected: 0,
            summary_scroll: 0,
            table_state: TableState::default(),
            chart: None,
            alert: None,
            status: String::new(),
            tick: 0,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Put `location` in the input box and search for it.
    pub fn search_for(&mut self, location: &str) {
        self.input = location.to_string();
        self.start_search();
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.poll_fetch();
    }

    /// Apply every fetch result that has arrived since the last call.
    pub fn poll_fetch(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.finish_search(msg);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        if self.chart.is_some() {
            self.handle_chart_key(key);
            return;
        }

        match self.session.view() {
            View::Search => self.handle_search_key(key),
            View::Table => self.handle_table_key(key),
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.alert.is_some() {
            return;
        }
        let Some(chart) = self.chart.as_mut() else {
            return;
        };
        if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            if let Some(index) = ui::chart::hover_index(chart, mouse.column, mouse.row) {
                chart.cursor = Some(index);
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match (self.focus, key.code) {
            (_, KeyCode::Tab | KeyCode::BackTab) => {
                self.focus = match self.focus {
                    Focus::Input => Focus::Actions,
                    Focus::Actions => Focus::Input,
                };
            }
            (_, KeyCode::Esc) => {
                if self.session.is_searching() {
                    self.cancel_search();
                } else {
                    self.quit();
                }
            }
            (_, KeyCode::Up) => self.summary_scroll = self.summary_scroll.saturating_sub(1),
            (_, KeyCode::Down) => self.summary_scroll = self.summary_scroll.saturating_add(1),
            (Focus::Input, KeyCode::Enter) => self.start_search(),
            (Focus::Input, KeyCode::Backspace) => {
                self.input.pop();
            }
            (Focus::Input, KeyCode::Char(c)) => self.input.push(c),
            (Focus::Actions, KeyCode::Left) => {
                self.selected = (self.selected + NavAction::ALL.len() - 1) % NavAction::ALL.len();
            }
            (Focus::Actions, KeyCode::Right) => {
                self.selected = (self.selected + 1) % NavAction::ALL.len();
            }
            (Focus::Actions, KeyCode::Enter) => self.activate(NavAction::ALL[self.selected]),
            (Focus::Actions, KeyCode::Char(c @ '1'..='5')) => {
                let idx = c as usize - '1' as usize;
                self.selected = idx;
                self.activate(NavAction::ALL[idx]);
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let rows = self.session.data().map_or(0, |d| d.table.len());
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.session.back();
                self.status.clear();
            }
            KeyCode::Up | KeyCode::Char('k') => self.table_state.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => {
                let next = self.table_state.selected().map_or(0, |i| i + 1);
                self.table_state.select(Some(next.min(rows.saturating_sub(1))));
            }
            KeyCode::PageUp | KeyCode::Home => self.table_state.select_first(),
            KeyCode::PageDown | KeyCode::End => {
                self.table_state.select(Some(rows.saturating_sub(1)));
            }
            _ => {}
        }
    }

    fn handle_chart_key(&mut self, key: KeyEvent) {
        let Some(chart) = self.chart.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.chart = None,
            KeyCode::Left | KeyCode::Char('h') => chart.step(-1),
            KeyCode::Right | KeyCode::Char('l') => chart.step(1),
            KeyCode::Home => chart.cursor = Some(0),
            KeyCode::End => chart.cursor = chart.model.len().checked_sub(1),
            _ => {}
        }
    }

    fn activate(&mut self, action: NavAction) {
        if !self.session.navigation_enabled() {
            self.status = "Search for a location first".to_string();
            return;
        }

        let result = match action.chart_kind() {
            Some(kind) => self.session.chart(kind).map(|model| {
                tracing::debug!(chart = kind.title(), "opening chart");
                self.chart = Some(ChartOverlay::new(model));
            }),
            None => self.session.show_table().map(|table| {
                tracing::debug!(rows = table.len(), "showing data table");
                self.table_state = TableState::default().with_selected(Some(0));
            }),
        };

        if let Err(e) = result {
            self.status = e.to_string();
        }
    }

    fn start_search(&mut self) {
        match self.session.begin_search(&self.input) {
            Ok(pending) => {
                self.summary_scroll = 0;
                self.status = format!("Fetching weather for {}...", pending.location);

                let fetcher = Arc::clone(&self.fetcher);
                let tx = self.tx.clone();
                let handle = self.runtime.spawn(async move {
                    let result = fetcher.fetch(&pending.location).await;
                    let _ = tx.send(FetchMessage {
                        ticket: pending.ticket,
                        result,
                    });
                });
                self.inflight = Some(handle);
            }
            Err(SessionError::BlankInput) => {
                let err = WeatherError::BlankInput;
                self.alert = Some(Alert::new(err.title(), err.to_string()));
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn cancel_search(&mut self) {
        if self.session.cancel_search().is_some() {
            if let Some(handle) = self.inflight.take() {
                handle.abort();
            }
            tracing::info!("search cancelled");
            self.status = "Search cancelled".to_string();
        }
    }

    fn finish_search(&mut self, msg: FetchMessage) {
        match self.session.complete_search(msg.ticket, msg.result) {
            SearchOutcome::Loaded => {
                self.inflight = None;
                if let Some(data) = self.session.data() {
                    self.status = format!(
                        "Loaded {} days for {}",
                        data.table.len(),
                        data.table.location()
                    );
                }
            }
            SearchOutcome::Failed(err) => {
                self.inflight = None;
                tracing::warn!(error = %err, "search failed");
                self.status.clear();
                self.alert = Some(Alert::new(err.title(), err.to_string()));
            }
            SearchOutcome::Stale => tracing::debug!("dropping result of a cancelled search"),
        }
    }

    fn quit(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
        self.should_quit = true;
    }
}
