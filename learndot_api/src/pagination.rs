//! Page-by-page retrieval of search results.
//!
//! The backend reports the total number of matching records (`size`) on the
//! first page and serves at most [`PAGE_SIZE`] records per page. Pages are
//! fetched strictly in order, one at a time, and folded into a single
//! id-keyed [`AggregatedResult`].

use std::future::Future;

use crate::types::{AggregatedResult, PageResponse, Record};
use crate::Error;

/// Records per backend page.
pub const PAGE_SIZE: i64 = 25;

/// Largest page count a search will walk. A `size` implying more pages than
/// this is treated as a malformed response.
pub const MAX_PAGES: u32 = 1_000_000;

/// Number of pages to request for a reported `size`.
///
/// Computed as `size / PAGE_SIZE + 1` once `size` exceeds one page, which
/// requests one trailing page too many when `size` is an exact multiple of
/// `PAGE_SIZE`. The backend tolerates the extra request and it is kept
/// until its paging semantics are confirmed against the live API.
pub fn total_pages(size: Option<i64>) -> u32 {
    match size {
        Some(size) if size > PAGE_SIZE => {
            u32::try_from(size / PAGE_SIZE + 1).unwrap_or(u32::MAX)
        }
        _ => 1,
    }
}

/// Fetches every page and returns their records concatenated in page order.
///
/// `fetch` is called with page 1 first; its `size` decides how many more
/// pages follow. The first error aborts the whole sequence.
pub async fn fetch_all_pages<F, Fut>(mut fetch: F) -> Result<Vec<Record>, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PageResponse, Error>>,
{
    let first = fetch(1).await?;
    let pages = total_pages(first.size);
    if pages > MAX_PAGES {
        return Err(Error::Decode(format!(
            "reported size {} implies {} pages, more than the {} allowed",
            first.size.unwrap_or_default(),
            pages,
            MAX_PAGES
        )));
    }
    let mut records = first.results;

    for page in 2..=pages {
        tracing::debug!("Retrieving page {} of {}", page, pages);
        let next = fetch(page).await?;
        records.extend(next.results);
    }

    Ok(records)
}

/// Fetches every page and folds the records into an id-keyed map.
pub async fn paginate<F, Fut>(fetch: F) -> Result<AggregatedResult, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PageResponse, Error>>,
{
    let records = fetch_all_pages(fetch).await?;
    Ok(records.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;
    use serde_json::{json, Value};

    fn page(size: Value, ids: impl IntoIterator<Item = i64>) -> PageResponse {
        serde_json::from_value(json!({
            "size": size,
            "results": ids.into_iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
        }))
        .unwrap()
    }

    #[test]
    fn page_counts() {
        let cases = [(0, 1), (1, 1), (25, 1), (26, 2), (49, 2), (50, 3), (51, 3)];
        for (size, expected) in cases {
            assert_eq!(total_pages(Some(size)), expected, "size = {}", size);
        }
        assert_eq!(total_pages(None), 1);
        assert_eq!(total_pages(Some(-5)), 1);
    }

    #[tokio::test]
    async fn single_page_fetches_once() {
        let mut calls = Vec::new();
        let result = paginate(|n| {
            calls.push(n);
            async move { Ok::<_, Error>(page(json!(3), 1..=3)) }
        })
        .await
        .unwrap();

        assert_eq!(calls, vec![1]);
        assert_eq!(result.len(), 3);
        for id in 1..=3 {
            assert_eq!(result.get(&RecordId::Int(id)).unwrap()["id"], json!(id));
        }
    }

    #[tokio::test]
    async fn fetches_pages_in_order_for_reported_size() {
        for (size, expected_pages) in [(26, 2u32), (50, 3), (51, 3)] {
            let mut calls = Vec::new();
            paginate(|n| {
                calls.push(n);
                async move { Ok::<_, Error>(page(json!(size), Vec::<i64>::new())) }
            })
            .await
            .unwrap();
            assert_eq!(calls, (1..=expected_pages).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn concatenates_in_page_order() {
        let records = fetch_all_pages(|n| async move {
            Ok::<_, Error>(match n {
                1 => page(json!(30), 1..=25),
                _ => page(json!(30), 26..=30),
            })
        })
        .await
        .unwrap();

        let ids: Vec<i64> = records
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, (1..=30).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn later_page_overwrites_duplicate_id() {
        let result = paginate(|n| async move {
            let name = if n == 1 { "page one" } else { "page two" };
            let mut first = page(json!(26), [7]);
            first.results[0].insert("name".into(), json!(name));
            Ok::<_, Error>(first)
        })
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get(&RecordId::Int(7)).unwrap()["name"],
            json!("page two")
        );
    }

    #[tokio::test]
    async fn failure_on_second_page_aborts() {
        let mut calls = Vec::new();
        let result = paginate(|n| {
            calls.push(n);
            async move {
                match n {
                    2 => Err(Error::Backend {
                        status: 500,
                        message: "Internal Server Error".into(),
                    }),
                    _ => Ok(page(json!(60), [n as i64])),
                }
            }
        })
        .await;

        assert!(matches!(result, Err(Error::Backend { status: 500, .. })));
        assert_eq!(calls, vec![1, 2]);
    }

    #[tokio::test]
    async fn non_integer_size_is_single_page() {
        let mut calls = Vec::new();
        let result = paginate(|n| {
            calls.push(n);
            async move { Ok::<_, Error>(page(json!("lots"), 1..=2)) }
        })
        .await
        .unwrap();

        assert_eq!(calls, vec![1]);
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn oversized_total_is_decode_error() {
        let mut calls = Vec::new();
        let result = paginate(|n| {
            calls.push(n);
            async move { Ok::<_, Error>(page(json!(i64::MAX), [1])) }
        })
        .await;

        assert!(matches!(result, Err(Error::Decode(_))));
        assert_eq!(calls, vec![1]);
    }

    #[test]
    fn page_ceiling_boundary() {
        let size = (i64::from(MAX_PAGES) - 1) * PAGE_SIZE;
        assert_eq!(total_pages(Some(size)), MAX_PAGES);
        let size = i64::from(MAX_PAGES) * PAGE_SIZE;
        assert_eq!(total_pages(Some(size)), MAX_PAGES + 1);
    }

    #[tokio::test]
    async fn empty_trailing_page_contributes_nothing() {
        let result = paginate(|n| async move {
            Ok::<_, Error>(match n {
                1 => page(json!(50), 1..=25),
                2 => page(json!(50), 26..=50),
                _ => serde_json::from_value(json!({"size": 50, "results": null})).unwrap(),
            })
        })
        .await
        .unwrap();

        assert_eq!(result.len(), 50);
    }
}
