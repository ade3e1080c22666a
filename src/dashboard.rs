//! The display surface: active selection, status line and rendered cards.
//!
//! Selections may overlap. Each [`Dashboard::select`] call takes a ticket from
//! a monotonically increasing counter when it is dispatched; when its load
//! resolves, the result is applied only if no newer selection has been
//! dispatched since. Older results are dropped, so the surface always ends up
//! showing the most recently requested section regardless of which load
//! finished last.

use crate::loader::{DigestSource, LoadStatus, SectionLoader};
use crate::models::Article;
use crate::render::render_cards;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument};

/// Snapshot of what the dashboard currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Ticket of the selection that produced this view; 0 before any selection.
    pub ticket: u64,
    /// Section whose control is marked active.
    pub active: Option<String>,
    pub status: LoadStatus,
    pub articles: Vec<Article>,
    /// `articles` rendered as cards.
    pub cards: String,
}

impl Default for View {
    fn default() -> Self {
        Self {
            ticket: 0,
            active: None,
            status: LoadStatus::Loading,
            articles: Vec::new(),
            cards: String::new(),
        }
    }
}

#[derive(Debug)]
pub struct Dashboard<S> {
    loader: SectionLoader<S>,
    latest: AtomicU64,
    view: Mutex<View>,
}

impl<S> Dashboard<S>
where
    S: DigestSource + Sync,
{
    pub fn new(loader: SectionLoader<S>) -> Self {
        Self {
            loader,
            latest: AtomicU64::new(0),
            view: Mutex::new(View::default()),
        }
    }

    /// Select a section: mark it active, load it, and show the result unless a
    /// newer selection was made in the meantime.
    ///
    /// Returns the applied view, or `None` when the result was stale.
    #[instrument(level = "info", skip(self))]
    pub async fn select(&self, section_id: &str) -> Option<View> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(ticket, |view| {
            view.active = Some(section_id.to_string());
            view.status = LoadStatus::Loading;
        });

        let outcome = self.loader.load(section_id).await;
        let cards = render_cards(&outcome.articles);

        let applied = self.update(ticket, move |view| {
            view.status = outcome.status;
            view.articles = outcome.articles;
            view.cards = cards;
        });
        match &applied {
            Some(view) => info!(
                ticket,
                status = %view.status,
                cards = view.articles.len(),
                "Display updated"
            ),
            None => debug!(ticket, "Discarding result of superseded selection"),
        }
        applied
    }

    /// Current contents of the display surface.
    pub fn view(&self) -> View {
        self.lock().clone()
    }

    /// Whether `ticket` still belongs to the most recent selection.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    fn update(&self, ticket: u64, apply: impl FnOnce(&mut View)) -> Option<View> {
        let mut view = self.lock();
        // Checked under the lock so a newer selection cannot be overwritten.
        if !self.is_current(ticket) {
            return None;
        }
        apply(&mut view);
        view.ticket = ticket;
        Some(view.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, View> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
