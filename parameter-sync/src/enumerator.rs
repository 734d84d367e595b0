//! Full enumeration of a region by walking the listing cursor.

use std::sync::Arc;

use futures::{
    Stream, TryStreamExt,
    stream::{self, BoxStream},
};
use tracing::{debug, warn};

use crate::{
    domain::{PageCursor, ParameterDescriptor, ParameterMetadata},
    retry::{RetryConfig, retry},
    storage::repository::{ParameterStore, StoreError},
};

/// Largest page the remote listing endpoint accepts.
pub const DEFAULT_PAGE_SIZE: i32 = 50;

enum CursorState {
    Start,
    Next(PageCursor),
    Done,
}

pub struct ParameterEnumerator {
    store: Arc<dyn ParameterStore>,
    include_value: bool,
    page_size: i32,
    retry: RetryConfig,
}

impl ParameterEnumerator {
    pub fn new(store: Arc<dyn ParameterStore>, include_value: bool) -> Self {
        Self {
            store,
            include_value,
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryConfig::default(),
        }
    }

    /// Clamped to `1..=DEFAULT_PAGE_SIZE`.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Single-pass stream over every parameter visible in the store's region.
    ///
    /// A listing failure ends the stream with an error item. A failure to
    /// resolve one value only leaves that descriptor's `value` empty.
    pub fn into_stream(self) -> BoxStream<'static, Result<ParameterDescriptor, StoreError>> {
        let Self {
            store,
            include_value,
            page_size,
            retry: retry_config,
        } = self;

        let pages = page_stream(Arc::clone(&store), page_size, retry_config.clone());

        Box::pin(
            pages
                .map_ok(|page| stream::iter(page.into_iter().map(Ok::<_, StoreError>)))
                .try_flatten()
                .and_then(move |metadata| {
                    let store = Arc::clone(&store);
                    let retry_config = retry_config.clone();
                    async move {
                        let value = if include_value {
                            resolve_value(store.as_ref(), &metadata, &retry_config).await
                        } else {
                            None
                        };
                        Ok::<_, StoreError>(ParameterDescriptor::from_metadata(metadata, value))
                    }
                }),
        )
    }

    pub async fn collect_all(self) -> Result<Vec<ParameterDescriptor>, StoreError> {
        self.into_stream().try_collect().await
    }
}

fn page_stream(
    store: Arc<dyn ParameterStore>,
    page_size: i32,
    retry_config: RetryConfig,
) -> impl Stream<Item = Result<Vec<ParameterMetadata>, StoreError>> + Send + 'static {
    stream::try_unfold(CursorState::Start, move |state| {
        let store = Arc::clone(&store);
        let retry_config = retry_config.clone();
        async move {
            let cursor = match state {
                CursorState::Done => return Ok::<_, StoreError>(None),
                CursorState::Start => None,
                CursorState::Next(cursor) => Some(cursor),
            };

            let page = retry(&retry_config, || {
                store.list_parameters(page_size, cursor.clone())
            })
            .await?;

            debug!(
                region = store.region(),
                count = page.parameters.len(),
                has_more = page.next_cursor.is_some(),
                "Fetched parameter page"
            );

            let next = match page.next_cursor {
                Some(cursor) => CursorState::Next(cursor),
                None => CursorState::Done,
            };
            Ok(Some((page.parameters, next)))
        }
    })
}

async fn resolve_value(
    store: &dyn ParameterStore,
    metadata: &ParameterMetadata,
    retry_config: &RetryConfig,
) -> Option<String> {
    match retry(retry_config, || store.get_parameter(&metadata.name, true)).await {
        Ok(value) => Some(value),
        Err(StoreError::NotFound(_)) => {
            warn!(
                name = metadata.name.as_str(),
                region = store.region(),
                "Listed parameter not found when resolving its value"
            );
            None
        }
        Err(err) => {
            warn!(
                name = metadata.name.as_str(),
                region = store.region(),
                error = %err,
                "Failed to resolve parameter value"
            );
            None
        }
    }
}
