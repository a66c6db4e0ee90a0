//! Query options for the search endpoint.

use crate::Error;

const RESERVED_KEYS: [&str; 3] = ["page", "asc", "or"];

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Query-string options sent with `POST /manage/{entity}/search`.
///
/// `asc` and `or` default to `false`. When `page` is set the search returns
/// that single page as-is; when unset every page is fetched and aggregated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Page number (1-indexed). `None` requests aggregation of all pages.
    pub page: Option<u32>,
    /// Sort ascending instead of descending.
    pub asc: bool,
    /// Combine conditions with OR instead of AND.
    pub or: bool,
    /// Additional query parameters. Entries named `page`, `asc` or `or` are
    /// never sent; the typed fields own those keys.
    pub params: Vec<(String, String)>,
}

impl SearchQuery {
    /// Requests a single page (1-indexed).
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_asc(mut self, asc: bool) -> Self {
        self.asc = asc;
        self
    }

    pub fn with_or(mut self, or: bool) -> Self {
        self.or = or;
        self
    }

    /// Adds an arbitrary query parameter.
    ///
    /// The reserved keys `page`, `asc` and `or` set the typed fields
    /// instead; a value that does not parse for them is rejected.
    pub fn with_param(mut self, key: &str, value: &str) -> Result<Self, Error> {
        let invalid = || {
            Error::InvalidInput(format!("invalid value '{}' for query parameter '{}'", value, key))
        };
        match key {
            "page" => {
                let page: u32 = value.trim().parse().map_err(|_| invalid())?;
                if page == 0 {
                    return Err(invalid());
                }
                self.page = Some(page);
            }
            "asc" => self.asc = value.trim().parse().map_err(|_| invalid())?,
            "or" => self.or = value.trim().parse().map_err(|_| invalid())?,
            _ => self.params.push((key.to_string(), value.to_string())),
        }
        Ok(self)
    }

    /// Returns a copy of this query pinned to `page`.
    pub(crate) fn for_page(&self, page: u32) -> Self {
        self.clone().with_page(page)
    }

    /// Serializes the options as query-string pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("asc".to_string(), self.asc.to_string()),
            ("or".to_string(), self.or.to_string()),
        ];
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs.extend(
            self.params
                .iter()
                .filter(|(key, _)| !is_reserved(key))
                .cloned(),
        );
        pairs
    }
}
