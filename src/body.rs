use std::borrow::Cow;

use bytes::Bytes;
use futures_util::Stream;
use futures_util::StreamExt;

use crate::FetchError;

const DEFAULT_BUFFER_CAPACITY: usize = 100 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLimit {
    Unlimited,
    Bytes(usize),
}

/// Everything a bounded read can produce: the full body, the first `limit`
/// bytes of an oversized body, or whatever had been read when the source
/// failed.
#[derive(Debug)]
pub enum BodyOutcome {
    Complete(Bytes),
    Truncated { bytes: Bytes, limit: usize },
    Failed { error: FetchError, partial: Bytes },
}

impl BodyOutcome {
    pub fn bytes(&self) -> &Bytes {
        match self {
            BodyOutcome::Complete(bytes) => bytes,
            BodyOutcome::Truncated { bytes, .. } => bytes,
            BodyOutcome::Failed { partial, .. } => partial,
        }
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            BodyOutcome::Complete(bytes) => bytes,
            BodyOutcome::Truncated { bytes, .. } => bytes,
            BodyOutcome::Failed { partial, .. } => partial,
        }
    }

    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.bytes())
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, BodyOutcome::Truncated { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BodyOutcome::Failed { .. })
    }
}

#[derive(Debug)]
pub struct BodyCollector {
    buf: Vec<u8>,
    limit: BodyLimit,
    truncated: bool,
}

impl BodyCollector {
    pub fn new(limit: BodyLimit, content_length: Option<u64>) -> Self {
        Self {
            buf: Vec::with_capacity(initial_capacity(limit, content_length)),
            limit,
            truncated: false,
        }
    }

    /// Appends at most the remaining budget. Returns `false` once the budget
    /// is exhausted; the caller must stop reading the source.
    pub fn push(&mut self, chunk: &[u8]) -> bool {
        if chunk.is_empty() {
            return !self.truncated;
        }
        let max = match self.limit {
            BodyLimit::Unlimited => {
                self.buf.extend_from_slice(chunk);
                return true;
            }
            BodyLimit::Bytes(max) => max,
        };

        let remaining = max.saturating_sub(self.buf.len());
        if chunk.len() <= remaining {
            self.buf.extend_from_slice(chunk);
            return true;
        }

        self.buf.extend_from_slice(&chunk[..remaining]);
        if !self.truncated {
            self.truncated = true;
            tracing::warn!("trimmed content to {max} bytes");
        }
        false
    }

    pub fn finish(self) -> BodyOutcome {
        let bytes = Bytes::from(self.buf);
        match (self.truncated, self.limit) {
            (true, BodyLimit::Bytes(limit)) => BodyOutcome::Truncated { bytes, limit },
            _ => BodyOutcome::Complete(bytes),
        }
    }

    pub fn finish_failed(self, error: FetchError) -> BodyOutcome {
        BodyOutcome::Failed {
            error,
            partial: Bytes::from(self.buf),
        }
    }
}

fn initial_capacity(limit: BodyLimit, content_length: Option<u64>) -> usize {
    let mut capacity = match content_length {
        Some(len) if len > 0 => usize::try_from(len).unwrap_or(usize::MAX),
        _ => DEFAULT_BUFFER_CAPACITY,
    };
    if let BodyLimit::Bytes(max) = limit {
        capacity = capacity.min(max);
    }
    capacity
}

/// Drains `stream` into a buffer, stopping as soon as the budget is reached.
/// Read errors are not propagated; they degrade to `BodyOutcome::Failed` with
/// the bytes accumulated so far.
pub async fn collect_body<S, E>(
    mut stream: S,
    content_length: Option<u64>,
    limit: BodyLimit,
) -> BodyOutcome
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: Into<FetchError>,
{
    let mut collector = BodyCollector::new(limit, content_length);
    while let Some(next) = stream.next().await {
        match next {
            Ok(chunk) => {
                if !collector.push(&chunk) {
                    break;
                }
            }
            Err(err) => {
                let error = err.into();
                tracing::warn!("body read failed: {error}");
                return collector.finish_failed(error);
            }
        }
    }
    collector.finish()
}
