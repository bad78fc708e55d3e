//! Chunked request bodies that report transfer progress.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use reqwest::Body;

use voxagent_core::ProgressFn;

/// Split `data` into zero-copy chunks of at most `chunk_bytes`.
pub(crate) fn split_chunks(data: Bytes, chunk_bytes: usize) -> Vec<Bytes> {
    let chunk_bytes = chunk_bytes.max(1);
    let mut chunks = Vec::with_capacity(data.len() / chunk_bytes + 1);
    let mut offset = 0;
    while offset < data.len() {
        let end = (offset + chunk_bytes).min(data.len());
        chunks.push(data.slice(offset..end));
        offset = end;
    }
    chunks
}

/// Stream of body chunks; `progress` sees the running byte count as each
/// chunk is handed to the transport.
pub(crate) fn progress_stream(
    data: Bytes,
    chunk_bytes: usize,
    progress: Option<ProgressFn>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let total = data.len() as u64;
    let mut sent = 0u64;

    stream::iter(split_chunks(data, chunk_bytes)).map(move |chunk| {
        sent += chunk.len() as u64;
        if let Some(progress) = &progress {
            progress(sent, total);
        }
        Ok::<Bytes, std::io::Error>(chunk)
    })
}

pub(crate) fn progress_body(data: Bytes, chunk_bytes: usize, progress: Option<ProgressFn>) -> Body {
    Body::wrap_stream(progress_stream(data, chunk_bytes, progress))
}
