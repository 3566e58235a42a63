use std::io::Write;

use crate::model::Item;

pub const NO_RESULTS_NOTICE: &str = "No results found.";
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load data. Please try again later.";

/// Presentation side of the search core. Implementations decide how views
/// are shown; the coordinator only decides which.
pub trait RenderSink {
    fn show_loading(&mut self);
    fn show_load_error(&mut self, message: &str);
    fn show_initial_content(&mut self);
    /// An empty slice hides the history view.
    fn render_history(&mut self, terms: &[String]);
    /// Hides initial content and history. An empty slice renders the
    /// "no results" notice.
    fn render_results(&mut self, items: &[Item]);
    fn clear_results(&mut self);
}

pub struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn show_loading(&mut self) {
        self.line("Loading...");
    }

    fn show_load_error(&mut self, message: &str) {
        self.line(message);
    }

    fn show_initial_content(&mut self) {
        self.line("Type to search. /enter or /search runs now, /history N reruns an entry, /quit exits.");
    }

    fn render_history(&mut self, terms: &[String]) {
        if terms.is_empty() {
            return;
        }
        self.line("Recent searches:");
        for (index, term) in terms.iter().enumerate() {
            self.line(&format!("  {}. {term}", index + 1));
        }
    }

    fn render_results(&mut self, items: &[Item]) {
        if items.is_empty() {
            self.line(NO_RESULTS_NOTICE);
            return;
        }
        for item in items {
            self.line(&card_text(item));
        }
    }

    fn clear_results(&mut self) {
        self.line("");
    }
}

fn card_text(item: &Item) -> String {
    format!(
        "[{}]\n  {}\n  Learn more (new window): {}",
        item.nome, item.descricao, item.link
    )
}
