use std::time::{Duration, Instant};

use crate::dataset::LoadError;
use crate::debounce::Debouncer;
use crate::history::HistoryStore;
use crate::kv_store::KeyValueStore;
use crate::model::Dataset;
use crate::render::{RenderSink, LOAD_ERROR_MESSAGE};
use crate::search::{search, SearchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready(Dataset),
    Failed(String),
}

/// Application state for one page session. Every trigger (typing, the search
/// action, the confirm key, a history click, the debounce timer) goes through
/// here, one at a time.
pub struct SearchApp<S, K> {
    load_state: LoadState,
    input: String,
    debouncer: Debouncer,
    history: HistoryStore<K>,
    sink: S,
}

impl<S: RenderSink, K: KeyValueStore> SearchApp<S, K> {
    pub fn new(debounce: Duration, history: HistoryStore<K>, mut sink: S) -> Self {
        sink.show_loading();
        Self {
            load_state: LoadState::Loading,
            input: String::new(),
            debouncer: Debouncer::new(debounce),
            history,
            sink,
        }
    }

    pub fn finish_load(&mut self, result: Result<Dataset, LoadError>) {
        if !matches!(self.load_state, LoadState::Loading) {
            tracing::warn!("dataset load finished twice; ignoring");
            return;
        }

        match result {
            Ok(dataset) => {
                self.load_state = LoadState::Ready(dataset);
                self.render_history();
                self.sink.show_initial_content();
            }
            Err(error) => {
                tracing::error!(%error, "failed to load dataset");
                self.load_state = LoadState::Failed(error.to_string());
                self.sink.show_load_error(LOAD_ERROR_MESSAGE);
            }
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.load_state, LoadState::Ready(_))
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn history(&self) -> &HistoryStore<K> {
        &self.history
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn input_changed(&mut self, text: &str, now: Instant) {
        self.input = text.to_string();
        self.debouncer.schedule(self.input.clone(), now);
    }

    /// Runs the debounced search if its quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<SearchOutcome> {
        let value = self.debouncer.take_due(now)?;
        self.perform_search(&value)
    }

    pub fn submit(&mut self) -> Option<SearchOutcome> {
        self.debouncer.cancel();
        let value = self.input.clone();
        self.perform_search(&value)
    }

    pub fn key_pressed(&mut self, key: Key) -> Option<SearchOutcome> {
        match key {
            Key::Enter => self.submit(),
            Key::Other => None,
        }
    }

    /// Fills the input with a history entry (1-based as shown) and searches.
    pub fn select_history(&mut self, position: usize) -> Option<SearchOutcome> {
        if !self.is_ready() {
            tracing::debug!("history selection ignored; dataset not available");
            return None;
        }
        let term = self
            .history
            .list()
            .into_iter()
            .nth(position.checked_sub(1)?)?;
        self.input = term;
        self.submit()
    }

    pub fn clear_history(&mut self) {
        if !self.is_ready() {
            tracing::debug!("history clear ignored; dataset not available");
            return;
        }
        if let Err(error) = self.history.clear() {
            tracing::warn!(%error, "failed to clear search history");
        }
        if self.input.trim().is_empty() {
            self.render_history();
        }
    }

    fn perform_search(&mut self, value: &str) -> Option<SearchOutcome> {
        let LoadState::Ready(dataset) = &self.load_state else {
            tracing::debug!("search ignored; dataset not available");
            return None;
        };

        let outcome = search(dataset, value);
        match &outcome {
            SearchOutcome::NoActiveQuery => {
                self.sink.clear_results();
                self.sink.show_initial_content();
                self.render_history();
            }
            SearchOutcome::Matches(items) => {
                let term = value.trim();
                tracing::debug!(query = term, matches = items.len(), "search executed");
                if !items.is_empty() {
                    if let Err(error) = self.history.record(term) {
                        tracing::warn!(%error, "failed to record search term");
                    }
                }
                self.sink.render_results(items);
            }
        }
        Some(outcome)
    }

    fn render_history(&mut self) {
        let terms = self.history.list();
        self.sink.render_history(&terms);
    }
}
