use async_trait::async_trait;
use tracing::{info, warn};

use crate::erx::ResultE;
use crate::fetcher::Fetcher;
use crate::pipeline::{ListView, Listable, SortSpec};
use crate::web::notice::Notice;

/// A list screen: how it fetches its items and how many it shows per page.
#[async_trait]
pub trait Screen: Send + Sync {
    type Item: Listable + Send;

    fn name(&self) -> &str;

    fn page_size(&self) -> usize;

    /// Sort the view opens with.
    fn default_sort(&self) -> SortSpec {
        SortSpec::Unsorted
    }

    async fn fetch(&self, fetcher: &Fetcher) -> ResultE<Vec<Self::Item>>;
}

pub enum ScreenState<T> {
    Loading,
    Ready(ListView<T>),
    LoginRequired(Notice),
    Failed(Notice),
}

impl<T> ScreenState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, ScreenState::Ready(_))
    }

    pub fn view(&self) -> Option<&ListView<T>> {
        match self {
            ScreenState::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn view_mut(&mut self) -> Option<&mut ListView<T>> {
        match self {
            ScreenState::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            ScreenState::LoginRequired(notice) | ScreenState::Failed(notice) => Some(notice),
            _ => None,
        }
    }
}

/// Fetch a screen's items into a fresh view, or the notice to show instead.
pub async fn load<S: Screen>(screen: &S, fetcher: &Fetcher) -> ScreenState<S::Item> {
    match screen.fetch(fetcher).await {
        Ok(items) => {
            info!("screen {} loaded {} items", screen.name(), items.len());
            let mut view = ListView::new(items, screen.page_size());
            view.set_sort(screen.default_sort());
            ScreenState::Ready(view)
        },
        Err(e) if e.is_auth() => {
            warn!("screen {} needs login: {}", screen.name(), e);
            ScreenState::LoginRequired(Notice::from(&e))
        },
        Err(e) => {
            warn!("screen {} failed: {}", screen.name(), e);
            ScreenState::Failed(Notice::from(&e))
        },
    }
}
