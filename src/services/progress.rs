use tokio::sync::mpsc;

use crate::models::SearchEvent;

/// Where a search sends its [`SearchEvent`]s
///
/// A closed or missing receiver never affects the search itself.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    tx: Option<mpsc::UnboundedSender<SearchEvent>>,
}

impl Progress {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Progress that goes nowhere
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: SearchEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
