//! View-controller state: which screen is showing, what data is loaded, and whether a search
//! is in flight.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::{
    WeatherError, WeatherSummary, WeatherTable,
    chart::{ChartKind, ChartModel},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Search,
    Table,
}

/// Actions the session refuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please enter a location")]
    BlankInput,

    #[error("A search is already in progress")]
    SearchInProgress,

    #[error("No weather data loaded yet")]
    NoData,
}

/// Identifies one search so late results of a cancelled or replaced search can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub ticket: SearchTicket,
    pub location: String,
}

/// Table and summary computed from it. They are only ever replaced together.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub table: Arc<WeatherTable>,
    pub summary: WeatherSummary,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub enum SearchOutcome {
    Loaded,
    Failed(WeatherError),
    /// The ticket no longer matches the pending search; nothing changed.
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    view: View,
    data: Option<LoadedData>,
    pending: Option<PendingSearch>,
    next_ticket: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn data(&self) -> Option<&LoadedData> {
        self.data.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingSearch> {
        self.pending.as_ref()
    }

    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    /// Chart and table actions are available only once a search has loaded data.
    pub fn navigation_enabled(&self) -> bool {
        self.data.is_some() && self.pending.is_none()
    }

    /// Start a new session. The previous table is dropped immediately.
    pub fn begin_search(&mut self, input: &str) -> Result<PendingSearch, SessionError> {
        let location = input.trim();
        if location.is_empty() {
            return Err(SessionError::BlankInput);
        }
        if self.pending.is_some() {
            return Err(SessionError::SearchInProgress);
        }

        self.next_ticket += 1;
        let pending = PendingSearch {
            ticket: SearchTicket(self.next_ticket),
            location: location.to_string(),
        };

        self.data = None;
        self.pending = Some(pending.clone());
        tracing::debug!(location, ticket = self.next_ticket, "search started");
        Ok(pending)
    }

    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<WeatherTable, WeatherError>,
    ) -> SearchOutcome {
        if self.pending.as_ref().map(|p| p.ticket) != Some(ticket) {
            return SearchOutcome::Stale;
        }
        self.pending = None;

        let loaded = result.and_then(|table| {
            let summary = WeatherSummary::from_table(&table)?;
            Ok(LoadedData {
                table: Arc::new(table),
                summary,
                fetched_at: Utc::now(),
            })
        });

        match loaded {
            Ok(data) => {
                self.data = Some(data);
                SearchOutcome::Loaded
            }
            Err(err) => SearchOutcome::Failed(err),
        }
    }

    /// Abandon the in-flight search, returning its ticket if there was one.
    pub fn cancel_search(&mut self) -> Option<SearchTicket> {
        self.pending.take().map(|p| p.ticket)
    }

    pub fn show_table(&mut self) -> Result<Arc<WeatherTable>, SessionError> {
        let table = self.loaded_table()?;
        self.view = View::Table;
        Ok(table)
    }

    pub fn back(&mut self) {
        self.view = View::Search;
    }

    /// Chart over the current table. The view does not change.
    pub fn chart(&self, kind: ChartKind) -> Result<ChartModel, SessionError> {
        Ok(ChartModel::build(kind, self.loaded_table()?))
    }

    fn loaded_table(&self) -> Result<Arc<WeatherTable>, SessionError> {
        if !self.navigation_enabled() {
            return Err(SessionError::NoData);
        }
        self.data
            .as_ref()
            .map(|d| Arc::clone(&d.table))
            .ok_or(SessionError::NoData)
    }
}
