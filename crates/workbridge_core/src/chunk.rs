//! Fixed-size batching for APIs with a per-call item limit.

use thiserror::Error;

/// Maximum number of blocks the document service accepts per append call.
pub const DOCUMENT_BLOCK_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chunk limit must be at least 1")]
pub struct ZeroChunkLimit;

/// Splits `items` into consecutive groups of at most `limit` items.
///
/// Order is preserved; only the last group may be shorter. An empty input
/// yields no groups.
pub fn chunked<T>(items: &[T], limit: usize) -> Result<Vec<&[T]>, ZeroChunkLimit> {
    if limit == 0 {
        return Err(ZeroChunkLimit);
    }
    Ok(items.chunks(limit).collect())
}
