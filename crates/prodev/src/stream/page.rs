use futures::stream::{self, BoxStream, StreamExt};
use prodev_core::{Page, PageRequest};

use super::invalid_size;
use crate::user::{UserRepository, UserResult};

/// Fetch one page of `page_size` users starting at `offset`.
pub async fn paginate_users(
    repo: &dyn UserRepository,
    page_size: u64,
    offset: u64,
) -> UserResult<Page> {
    let request = PageRequest::at(page_size, offset).map_err(invalid_size)?;
    fetch(repo, request).await
}

async fn fetch(repo: &dyn UserRepository, request: PageRequest) -> UserResult<Page> {
    let users = repo.fetch_page(request.limit(), request.offset()).await?;
    tracing::debug!(
        page = request.page_number(),
        offset = request.offset(),
        rows = users.len(),
        "Fetched page"
    );
    Ok(Page::new(request, users))
}

async fn next_page(
    repo: &dyn UserRepository,
    state: Option<PageRequest>,
) -> UserResult<Option<(Page, Option<PageRequest>)>> {
    let Some(request) = state else {
        return Ok(None);
    };

    let page = fetch(repo, request).await?;
    if page.is_empty() {
        return Ok(None);
    }

    let next = if page.is_last() {
        None
    } else {
        Some(request.next())
    };
    Ok(Some((page, next)))
}

/// Pages of `page_size` users from offset 0, fetched one at a time as the
/// stream is polled.
///
/// Ends at the first empty page, or right after a short one.
pub fn lazy_pagination(repo: &dyn UserRepository, page_size: u64) -> BoxStream<'_, UserResult<Page>> {
    match PageRequest::new(page_size) {
        Ok(request) => {
            stream::try_unfold(Some(request), move |state| next_page(repo, state)).boxed()
        }
        Err(e) => stream::once(async move { Err::<Page, _>(invalid_size(e)) }).boxed(),
    }
}
