use reql::{Batch, Connection, Error, Result};
use std::{
    collections::VecDeque,
    future::Future,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::sync::Semaphore;

/// In memory [`Connection`] answering continuation requests from a script.
///
/// A gated connection holds every continuation request until [`ScriptedConnection::release`]
/// lets it through, so tests decide when batches arrive.
#[derive(Debug, Default)]
pub struct ScriptedConnection {
    replies: Mutex<VecDeque<Result<Batch>>>,
    gate: Option<Semaphore>,
    continues: AtomicUsize,
    stops: AtomicUsize,
    outstanding: AtomicUsize,
    max_outstanding: AtomicUsize,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Default::default()
        }
    }

    pub fn reply(&self, reply: Result<Batch>) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    pub fn batch(&self, batch: Batch) -> &Self {
        self.reply(Ok(batch))
    }

    /// Next continuation request fails at the transport level.
    pub fn failure(&self, message: &str) -> &Self {
        self.reply(Err(Error::msg(message.to_owned())))
    }

    /// Let `requests` held continuation requests through.
    pub fn release(&self, requests: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(requests);
        }
    }

    /// Continuation requests received so far.
    pub fn continues(&self) -> usize {
        self.continues.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Continuation requests not answered yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Highest number of continuation requests that were in flight together.
    pub fn max_outstanding(&self) -> usize {
        self.max_outstanding.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Connection for ScriptedConnection {
    fn continue_query(&self, token: u64) -> impl Future<Output = Result<Batch>> + Send {
        async move {
            self.continues.fetch_add(1, Ordering::SeqCst);
            let outstanding = self.outstanding.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_outstanding.fetch_max(outstanding, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await?.forget();
            }
            let reply = self
                .replies
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front()
                .unwrap_or_else(|| Err(Error::msg(format!("No scripted reply for token {}", token))));
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            reply
        }
    }

    fn stop_query(&self, token: u64) -> impl Future<Output = Result<()>> + Send {
        async move {
            log::debug!("Stop requested for token {}", token);
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
