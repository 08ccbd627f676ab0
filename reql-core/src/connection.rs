use crate::{Datum, ReqlResult, Result};
use std::future::Future;

/// One response of a streaming query.
#[derive(Default, Debug, Clone)]
pub struct Batch {
    /// No more batches follow this one.
    pub done: bool,
    /// Rows in arrival order, a failed row is delivered as an error in place.
    pub results: Vec<ReqlResult<Datum>>,
}

impl Batch {
    /// Intermediate batch of successful rows.
    pub fn partial<I: IntoIterator<Item = Datum>>(rows: I) -> Self {
        Self {
            done: false,
            results: rows.into_iter().map(Ok).collect(),
        }
    }

    /// Last batch of successful rows.
    pub fn last<I: IntoIterator<Item = Datum>>(rows: I) -> Self {
        Self {
            done: true,
            ..Self::partial(rows)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

/// The transport a cursor reads its batches from.
///
/// Implementations route requests by query token. A failure returned from
/// `continue_query` ends the cursor, when it is a [`ReqlError`](crate::ReqlError) wrapped in the
/// `anyhow` error it reaches the user unchanged.
pub trait Connection: Send + Sync + 'static {
    /// Ask for the next batch of the query identified by `token`.
    fn continue_query(&self, token: u64) -> impl Future<Output = Result<Batch>> + Send;

    /// Tell the server to stop producing batches for `token`.
    fn stop_query(&self, token: u64) -> impl Future<Output = Result<()>> + Send;
}
