//! Lazy traversal of linked listing pages.
//!
//! A listing body nests its records under a collection key (`volumes`) and
//! advertises the next page as a `rel = "next"` link under
//! `<collection>_links`. Pages are fetched one round trip at a time, only
//! when the caller asks for them.

use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{ServiceClient, Transport};
use crate::error::VolumeError;

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(default)]
    href: String,
    #[serde(default)]
    rel: String,
}

/// One fetched batch of listing results.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    url: Url,
    body: Value,
    collection: &'static str,
}

impl Page {
    /// Wraps a decoded listing body fetched from `url`.
    #[must_use]
    pub const fn new(url: Url, body: Value, collection: &'static str) -> Self {
        Self {
            url,
            body,
            collection,
        }
    }

    /// URL the page was fetched from.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Decoded response body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Key under which records are nested.
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        self.collection
    }

    fn records(&self) -> Result<&[Value], VolumeError> {
        match self.body.get(self.collection) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(VolumeError::Decode {
                context: self.collection.to_owned(),
                message: String::from("expected an array of records"),
            }),
        }
    }

    /// Returns `true` when the page holds no records.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::Decode`] when the collection is not an array.
    pub fn is_empty(&self) -> Result<bool, VolumeError> {
        self.records().map(<[Value]>::is_empty)
    }

    /// Returns the URL of the next page, if the page advertises one.
    /// Relative links resolve against the page URL.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::Decode`] when the links are malformed and
    /// [`VolumeError::InvalidUrl`] when the next link does not parse.
    pub fn next_url(&self) -> Result<Option<Url>, VolumeError> {
        let key = format!("{}_links", self.collection);
        let links = match self.body.get(&key) {
            None | Some(Value::Null) => return Ok(None),
            Some(raw) => Vec::<Link>::deserialize(raw).map_err(|err| VolumeError::decode(&key, err))?,
        };
        let Some(next) = links
            .into_iter()
            .find(|link| link.rel == "next" && !link.href.is_empty())
        else {
            return Ok(None);
        };
        self.url
            .join(&next.href)
            .map(Some)
            .map_err(|err| VolumeError::InvalidUrl {
                url: next.href,
                message: err.to_string(),
            })
    }
}

/// Forward-only sequence of listing pages.
///
/// Each call to a listing operation returns a fresh pager starting at the
/// first page.
#[derive(Debug)]
pub struct Pager<'a, T> {
    client: &'a ServiceClient<T>,
    next: Option<Url>,
    collection: &'static str,
    fetched: usize,
}

impl<'a, T: Transport> Pager<'a, T> {
    /// Starts a traversal at `first`.
    #[must_use]
    pub const fn new(client: &'a ServiceClient<T>, first: Url, collection: &'static str) -> Self {
        Self {
            client,
            next: Some(first),
            collection,
            fetched: 0,
        }
    }

    /// Fetches the next page, or returns `None` once the previous page had
    /// no cursor.
    ///
    /// # Errors
    ///
    /// Propagates transport, status, decode and cancellation errors. After an
    /// error the pager is exhausted.
    pub async fn next_page(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Option<Page>, VolumeError> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };
        let body = self.client.get_json(cancel, url.clone()).await?;
        let page = Page::new(url, body, self.collection);
        self.fetched += 1;
        self.next = page.next_url()?;
        debug!(
            url = %page.url(),
            page = self.fetched,
            has_next = self.next.is_some(),
            "fetched listing page"
        );
        Ok(Some(page))
    }

    /// Calls `handler` for every non-empty page in order.
    ///
    /// Traversal stops at the first empty page (without calling `handler`),
    /// when a page has no cursor, when `handler` returns `Ok(false)`, or on
    /// the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a fetch or by `handler`.
    pub async fn each_page<F>(
        mut self,
        cancel: &CancellationToken,
        mut handler: F,
    ) -> Result<(), VolumeError>
    where
        F: FnMut(&Page) -> Result<bool, VolumeError>,
    {
        while let Some(page) = self.next_page(cancel).await? {
            if page.is_empty()? {
                return Ok(());
            }
            if !handler(&page)? {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Drains every page into one buffered page whose collection holds the
    /// records of all pages in order.
    ///
    /// # Errors
    ///
    /// Returns the first fetch or decode error; no partial page is returned.
    pub async fn all_pages(mut self, cancel: &CancellationToken) -> Result<Page, VolumeError> {
        let mut first_url = None;
        let mut records = Vec::new();
        while let Some(page) = self.next_page(cancel).await? {
            if first_url.is_none() {
                first_url = Some(page.url.clone());
            }
            let batch = page.records()?;
            if batch.is_empty() {
                break;
            }
            records.extend_from_slice(batch);
        }

        let url = match first_url {
            Some(url) => url,
            None => self.client.endpoint().clone(),
        };
        let mut body = Map::new();
        body.insert(self.collection.to_owned(), Value::Array(records));
        Ok(Page::new(url, Value::Object(body), self.collection))
    }
}
