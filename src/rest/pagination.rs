//! Cursor pagination.
//!
//! Kalshi list endpoints return a page of items plus an opaque `cursor`. The
//! cursor is forwarded unmodified to fetch the next page; an empty, `null`
//! or absent cursor marks the last page.
//!
//! [`CursorPager`] walks pages lazily, one request per
//! [`next_page`](CursorPager::next_page) call. [`KalshiRestClient::fetch_all`]
//! drains a pager and concatenates the items in server order.

use std::fmt;
use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::KalshiError;
use crate::rest::client::{KalshiRestClient, encode_query};

/// A page returned by a cursor paginated endpoint.
pub trait Paginated: DeserializeOwned {
    /// Element type of the page.
    type Item;

    /// Split the page into its items and the cursor for the next page.
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

/// Error returned when a page fails after earlier pages succeeded.
///
/// Carries the items accumulated so far so callers can decide whether a
/// partial listing is still useful.
pub struct PaginationError<T> {
    /// Items from the pages fetched before the failure, in server order.
    pub items: Vec<T>,
    /// Number of pages fetched successfully.
    pub pages_fetched: usize,
    /// The error that stopped the walk.
    pub source: KalshiError,
}

impl<T> PaginationError<T> {
    /// Discard the partial items and keep the underlying error.
    pub fn into_source(self) -> KalshiError {
        self.source
    }
}

impl<T> fmt::Debug for PaginationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationError")
            .field("items", &self.items.len())
            .field("pages_fetched", &self.pages_fetched)
            .field("source", &self.source)
            .finish()
    }
}

impl<T> fmt::Display for PaginationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pagination stopped after {} page(s) and {} item(s): {}",
            self.pages_fetched,
            self.items.len(),
            self.source
        )
    }
}

impl<T> std::error::Error for PaginationError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl<T> From<PaginationError<T>> for KalshiError {
    fn from(err: PaginationError<T>) -> Self {
        err.source
    }
}

/// Lazily walks the pages of a list endpoint.
///
/// ```rust,no_run
/// use kalshi_api_client::rest::{CursorPager, KalshiRestClient, MarketsPage, MarketsRequest};
///
/// # async fn run(client: &KalshiRestClient) -> Result<(), kalshi_api_client::KalshiError> {
/// let filter = MarketsRequest::new();
/// let mut pager = CursorPager::<MarketsPage>::new(client, "/markets", &filter, 200)?;
/// while let Some(markets) = pager.next_page().await? {
///     println!("{} markets", markets.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct CursorPager<'a, P> {
    client: &'a KalshiRestClient,
    path: String,
    base_query: String,
    page_size: u32,
    cursor: Option<String>,
    pages_fetched: usize,
    max_pages: Option<usize>,
    finished: bool,
    _page: PhantomData<fn() -> P>,
}

impl<'a, P: Paginated> CursorPager<'a, P> {
    /// Create a pager over `path` with the given filter parameters.
    ///
    /// `params` must not carry `limit` or `cursor`; the pager sets both.
    pub fn new<Q>(
        client: &'a KalshiRestClient,
        path: impl Into<String>,
        params: &Q,
        page_size: u32,
    ) -> Result<Self, KalshiError>
    where
        Q: Serialize + ?Sized,
    {
        if page_size == 0 {
            return Err(KalshiError::InvalidRequest(
                "page size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            client,
            path: path.into(),
            base_query: encode_query(params)?,
            page_size,
            cursor: None,
            pages_fetched: 0,
            max_pages: None,
            finished: false,
            _page: PhantomData,
        })
    }

    /// Stop after `max_pages` pages even if the server keeps returning cursors.
    pub fn max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Whether the last page has been reached.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fetch the next page, or `None` once the walk is over.
    pub async fn next_page(&mut self) -> Result<Option<Vec<P::Item>>, KalshiError> {
        if self.finished {
            return Ok(None);
        }

        if let Some(max_pages) = self.max_pages {
            if self.pages_fetched >= max_pages {
                warn!(
                    path = %self.path,
                    max_pages,
                    "page limit reached while the server still reports more pages, results are truncated"
                );
                self.finished = true;
                return Ok(None);
            }
        }

        let query = self.query()?;
        let page: P = self
            .client
            .execute(Method::GET, &self.path, Some(&query), None)
            .await?;
        let (items, next_cursor) = page.into_parts();
        self.pages_fetched += 1;

        debug!(
            path = %self.path,
            page = self.pages_fetched,
            items = items.len(),
            has_more = next_cursor.is_some(),
            "fetched page"
        );

        match next_cursor.filter(|cursor| !cursor.is_empty()) {
            Some(cursor) => self.cursor = Some(cursor),
            None => {
                self.cursor = None;
                self.finished = true;
            }
        }

        Ok(Some(items))
    }

    /// Drain the remaining pages into one vector, in server order.
    pub async fn collect_all(mut self) -> Result<Vec<P::Item>, PaginationError<P::Item>> {
        let mut items = Vec::new();
        loop {
            match self.next_page().await {
                Ok(Some(page)) => items.extend(page),
                Ok(None) => return Ok(items),
                Err(source) => {
                    return Err(PaginationError {
                        items,
                        pages_fetched: self.pages_fetched,
                        source,
                    });
                }
            }
        }
    }

    fn query(&self) -> Result<String, KalshiError> {
        let mut query = self.base_query.clone();
        let mut push = |pair: String| {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&pair);
        };

        push(encode_query(&[("limit", self.page_size.to_string())])?);
        if let Some(cursor) = &self.cursor {
            push(encode_query(&[("cursor", cursor.as_str())])?);
        }
        Ok(query)
    }
}

impl KalshiRestClient {
    /// Fetch every page of a list endpoint and concatenate the items.
    ///
    /// On failure the items gathered so far travel inside the
    /// [`PaginationError`].
    pub async fn fetch_all<P, Q>(
        &self,
        path: &str,
        params: &Q,
        page_size: u32,
        max_pages: Option<usize>,
    ) -> Result<Vec<P::Item>, PaginationError<P::Item>>
    where
        P: Paginated,
        Q: Serialize + ?Sized,
    {
        let pager = CursorPager::<P>::new(self, path, params, page_size).map_err(|source| {
            PaginationError {
                items: Vec::new(),
                pages_fetched: 0,
                source,
            }
        })?;
        pager.max_pages(max_pages).collect_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_error_keeps_partial_items() {
        let err = PaginationError {
            items: vec![1, 2, 3],
            pages_fetched: 2,
            source: KalshiError::ExhaustedRetries {
                last_status: Some(503),
                attempts: 5,
            },
        };

        let message = err.to_string();
        assert!(message.contains("2 page(s)"));
        assert!(message.contains("3 item(s)"));
        assert_eq!(err.items, vec![1, 2, 3]);

        let source: KalshiError = err.into();
        assert_eq!(source.status(), Some(503));
    }
}
