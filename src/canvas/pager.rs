//! Link-header pagination.

use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::client::CanvasClient;
use super::error::{CanvasError, Result};
use super::query::Query;

enum PageCursor {
    First { path: String, query: Query },
    Next(Url),
    Done,
}

impl CanvasClient {
    /// Lazily walk a paginated collection, one item per page.
    ///
    /// The first page is fetched from `path` with `query`; every later page
    /// from the previous response's `rel="next"` link. No request is issued
    /// until the stream is polled, and the stream stops early when the
    /// consumer stops polling. An error ends the stream after being yielded.
    pub fn paginate<T>(
        &self,
        path: &str,
        query: Query,
    ) -> impl Stream<Item = Result<Vec<T>>> + Send + '_
    where
        T: DeserializeOwned + Send + 'static,
    {
        let start = PageCursor::First {
            path: path.to_string(),
            query,
        };

        stream::try_unfold(start, move |cursor| async move {
            let response = match cursor {
                PageCursor::Done => return Ok(None),
                PageCursor::First { path, query } => self.get::<Vec<T>>(&path, &query).await?,
                PageCursor::Next(url) => self.get::<Vec<T>>(url.as_str(), &Query::new()).await?,
            };

            let next = match response.links.next() {
                Some(link) => {
                    let url = self.rebase_link(link)?;
                    debug!(next = %url, "Following pagination link");
                    PageCursor::Next(url)
                }
                None => PageCursor::Done,
            };

            Ok::<_, CanvasError>(Some((response.data, next)))
        })
    }

    /// Fetch every page of a collection and concatenate the items in order.
    pub async fn get_all_pages<T>(&self, path: &str, query: Query) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (items, pages) = self
            .paginate::<T>(path, query)
            .try_fold((Vec::new(), 0usize), |(mut items, pages), page| async move {
                items.extend(page);
                Ok((items, pages + 1))
            })
            .await?;

        info!(path, pages, items = items.len(), "Fetched all pages");
        Ok(items)
    }
}
