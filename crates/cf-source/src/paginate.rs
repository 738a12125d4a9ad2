//! Cursor pagination over list endpoints.

use crate::api::PageRequest;
use crate::error::{SourceError, SourceResult};
use crate::model::ListResponse;
use futures::Stream;
use std::future::Future;

/// Largest page the list endpoints accept
pub const MAX_PAGE_SIZE: u32 = 50;

/// Most ids accepted by a single `videos` lookup
pub const MAX_IDS_PER_REQUEST: usize = 50;

/// Number of recent uploads kept in `latest_videos_current`
pub const LATEST_VIDEOS_COUNT: u32 = 5;

/// Stream every page of a listing, one item batch per page.
///
/// `fetch` is called with the cursor of the previous page until a page comes
/// back without a continuation token. An empty token ends the walk too.
/// The first error is yielded and ends the stream.
///
/// ```ignore
/// let items: Vec<PlaylistItem> = paginate(MAX_PAGE_SIZE, |page| async move {
///     platform.list_playlist_items_page(playlist_id, &page).await
/// })
/// .try_concat()
/// .await?;
/// ```
pub fn paginate<'a, T, F, Fut>(
    page_size: u32,
    fetch: F,
) -> impl Stream<Item = SourceResult<Vec<T>>> + 'a
where
    T: 'a,
    F: FnMut(PageRequest) -> Fut + 'a,
    Fut: Future<Output = SourceResult<ListResponse<T>>> + 'a,
{
    let max_results = page_size.clamp(1, MAX_PAGE_SIZE);

    // None: exhausted; Some(token): next page to fetch
    let start: Option<Option<String>> = Some(None);

    futures::stream::try_unfold((start, fetch), move |(cursor, mut fetch)| async move {
        let page_token = match cursor {
            Some(token) => token,
            None => return Ok(None),
        };

        let page = fetch(PageRequest {
            max_results,
            page_token,
        })
        .await?;

        let next = page.next_token().map(|t| Some(t.to_string()));
        Ok::<_, SourceError>(Some((page.items, (next, fetch))))
    })
}

#[cfg(test)]
#[path = "paginate_test.rs"]
mod tests;
