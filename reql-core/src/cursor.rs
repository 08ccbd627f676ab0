use crate::{Batch, Connection, Datum, ReqlError, ReqlResult, ResponseNote, util::lock};
use async_stream::stream;
use futures::Stream;
use std::{
    collections::VecDeque,
    fmt::{self, Debug, Display},
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard},
    task::{Context, Poll},
};
use tokio::sync::{mpsc, oneshot};

/// Shape of the stream a cursor reads.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    /// Finite sequence.
    #[default]
    Cursor,
    Feed,
    AtomFeed,
    OrderByLimitFeed,
    UnionedFeed,
}

impl CursorKind {
    /// Changefeeds never end on their own.
    pub fn is_feed(self) -> bool {
        self != Self::Cursor
    }

    /// Kind announced by the notes of the first response.
    pub fn from_notes(notes: &[ResponseNote]) -> Self {
        notes
            .iter()
            .find_map(|note| match note {
                ResponseNote::SequenceFeed => Some(Self::Feed),
                ResponseNote::AtomFeed => Some(Self::AtomFeed),
                ResponseNote::OrderByLimitFeed => Some(Self::OrderByLimitFeed),
                ResponseNote::UnionedFeed => Some(Self::UnionedFeed),
                ResponseNote::IncludesStates => None,
            })
            .unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Cursor => "Cursor",
            Self::Feed => "Feed",
            Self::AtomFeed => "AtomFeed",
            Self::OrderByLimitFeed => "OrderByLimitFeed",
            Self::UnionedFeed => "UnionedFeed",
        }
    }
}

impl Display for CursorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something a subscription observed.
#[derive(Debug, Clone)]
pub enum Event {
    Item(Datum),
    Error(ReqlError),
    /// The cursor was drained. Never sent by feeds.
    End,
}

/// Events of a subscribed cursor, the stream ends once the cursor stops producing them.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
}

impl Stream for Subscription {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.receiver.poll_recv(cx)
    }
}

/// Outcome of one pull.
#[derive(Debug)]
enum Next {
    Item(ReqlResult<Datum>),
    Exhausted,
    Closed,
}

/// A pending pull.
///
/// Dropped after a row was already handed to it, the row goes back to the
/// front of the buffer.
struct Waiting<'a, C: Connection> {
    cursor: &'a Cursor<C>,
    receiver: oneshot::Receiver<Next>,
}

impl<C: Connection> Future for Waiting<'_, C> {
    type Output = Next;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Next> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|v| v.unwrap_or(Next::Closed))
    }
}

impl<C: Connection> Drop for Waiting<'_, C> {
    fn drop(&mut self) {
        self.receiver.close();
        if let Ok(Next::Item(result)) = self.receiver.try_recv() {
            let mut state = self.cursor.lock();
            if state.closed {
                return;
            }
            state.buffer.push_front(VecDeque::from([result]));
            self.cursor.flush(&mut state);
        }
    }
}

/// How a consumer loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Finished,
    Interrupted,
    Closed,
}

#[derive(Debug)]
struct State {
    /// Non empty batches, rows are popped from the front one.
    buffer: VecDeque<VecDeque<ReqlResult<Datum>>>,
    fetching: bool,
    can_fetch: bool,
    closed: bool,
    subscribed: bool,
    includes_states: bool,
    waiters: VecDeque<oneshot::Sender<Next>>,
}

struct Shared<C> {
    connection: Arc<C>,
    token: u64,
    kind: CursorKind,
    state: Mutex<State>,
}

/// Demand driven reader of the batches of one query.
///
/// At most one continuation request is in flight, the next one is sent when
/// no more than one batch is left in the buffer. Rows are consumed in one of
/// these ways, all sharing the same buffer:
/// - one at a time with [`Cursor::next`] (or [`Cursor::stream`])
/// - all at once with [`Cursor::to_vec`]
/// - through a callback with [`Cursor::each`]
/// - as events with [`Cursor::subscribe`], which rules out the others afterwards
///
/// Clones read the same rows.
pub struct Cursor<C: Connection> {
    shared: Arc<Shared<C>>,
}

impl<C: Connection> Clone for Cursor<C> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<C: Connection> Cursor<C> {
    /// Cursor for `token`, its first response is expected through [`Cursor::deliver`].
    pub fn new(connection: Arc<C>, token: u64, kind: CursorKind) -> Self {
        Self {
            shared: Arc::new(Shared {
                connection,
                token,
                kind,
                state: Mutex::new(State {
                    buffer: VecDeque::new(),
                    fetching: false,
                    can_fetch: true,
                    closed: false,
                    subscribed: false,
                    includes_states: false,
                    waiters: VecDeque::new(),
                }),
            }),
        }
    }

    pub fn token(&self) -> u64 {
        self.shared.token
    }

    pub fn kind(&self) -> CursorKind {
        self.shared.kind
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn set_includes_states(&self) {
        self.lock().includes_states = true;
    }

    /// Feed rows carry state documents.
    pub fn includes_states(&self) -> bool {
        self.lock().includes_states
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        lock(&self.shared.state)
    }

    /// Receive a response for this cursor.
    ///
    /// Rows arriving after the cursor was closed, or after the last batch, are dropped.
    pub fn deliver(&self, batch: Batch) {
        let mut state = self.lock();
        let could_fetch = state.can_fetch;
        if batch.done {
            state.can_fetch = false;
        }
        state.fetching = false;
        if state.closed || !could_fetch {
            if !batch.is_empty() {
                log::debug!(
                    "Discarding {} late rows of {} {}",
                    batch.len(),
                    self.kind(),
                    self.token()
                );
            }
        } else if !batch.is_empty() {
            state.buffer.push_back(batch.results.into());
        }
        if !state.closed && state.can_fetch && state.buffer.len() <= 1 {
            self.fetch(&mut state);
        }
        self.flush(&mut state);
    }

    /// Record the complete result, no request will be sent.
    pub fn set(&self, results: Vec<ReqlResult<Datum>>) {
        let mut state = self.lock();
        state.fetching = false;
        state.can_fetch = false;
        if !results.is_empty() {
            state.buffer.push_back(results.into());
        }
        self.flush(&mut state);
    }

    /// The continuation request failed, nothing else will arrive.
    fn fail(&self, error: ReqlError) {
        let mut state = self.lock();
        state.fetching = false;
        state.can_fetch = false;
        if state.closed {
            log::debug!(
                "Ignoring the failure of the closed {} {}: {}",
                self.kind(),
                self.token(),
                error
            );
        } else {
            state.buffer.push_back(VecDeque::from([Err(error)]));
        }
        self.flush(&mut state);
    }

    fn fetch(&self, state: &mut State) {
        if state.fetching {
            return;
        }
        state.fetching = true;
        log::debug!(
            "Requesting the next batch of {} {}",
            self.kind(),
            self.token()
        );
        let cursor = self.clone();
        tokio::spawn(async move {
            let shared = &cursor.shared;
            match shared.connection.continue_query(shared.token).await {
                Ok(batch) => cursor.deliver(batch),
                Err(error) => cursor.fail(ReqlError::from_transport(error)),
            }
        });
    }

    fn pop(&self, state: &mut State) -> Option<ReqlResult<Datum>> {
        let batch = state.buffer.front_mut()?;
        let result = batch.pop_front();
        if batch.is_empty() {
            state.buffer.pop_front();
            if state.buffer.len() <= 1 && state.can_fetch && !state.closed {
                self.fetch(state);
            }
        }
        result
    }

    /// Hand the buffered rows to the waiters, in the order they started waiting.
    fn flush(&self, state: &mut State) {
        while let Some(waiter) = state.waiters.pop_front() {
            if waiter.is_closed() {
                continue;
            }
            if state.buffer.is_empty() {
                if state.fetching || state.can_fetch {
                    state.waiters.push_front(waiter);
                    return;
                }
                let _ = waiter.send(Next::Exhausted);
                continue;
            }
            let Some(result) = self.pop(state) else {
                continue;
            };
            if let Err(Next::Item(result)) = waiter.send(Next::Item(result)) {
                state.buffer.push_front(VecDeque::from([result]));
            }
        }
    }

    fn closed_error(&self, method: &str) -> ReqlError {
        if method == "next" {
            ReqlError::driver(
                format!("You cannot call `next` on a closed {}", self.kind()),
                None,
            )
        } else {
            ReqlError::driver("You cannot retrieve data from a cursor that is closed", None)
        }
    }

    fn exhausted_error(&self) -> ReqlError {
        ReqlError::driver(
            format!("No more rows in the {}", self.kind().name().to_lowercase()),
            None,
        )
    }

    /// Entry check of the access modes.
    fn check(&self, method: &str) -> ReqlResult<()> {
        self.check_state(&self.lock(), method)
    }

    fn check_state(&self, state: &State, method: &str) -> ReqlResult<()> {
        if state.subscribed {
            return Err(ReqlError::driver(
                format!(
                    "You cannot call `{}` once you have bound listeners on the {}",
                    method,
                    self.kind()
                ),
                None,
            ));
        }
        if state.closed {
            return Err(self.closed_error(method));
        }
        Ok(())
    }

    /// Next row, waiting for it when nothing is buffered.
    async fn take(&self) -> Next {
        let receiver = {
            let mut state = self.lock();
            if state.closed {
                return Next::Closed;
            }
            if let Some(result) = self.pop(&mut state) {
                return Next::Item(result);
            }
            if !state.can_fetch && !state.fetching {
                return Next::Exhausted;
            }
            let (sender, receiver) = oneshot::channel();
            state.waiters.push_back(sender);
            receiver
        };
        Waiting {
            cursor: self,
            receiver,
        }
        .await
    }

    /// The next row.
    ///
    /// A row the server failed to produce is returned as its error, later rows
    /// are still readable. Fails with a driver error once the cursor is drained
    /// or closed.
    pub async fn next(&self) -> ReqlResult<Datum> {
        self.check("next")?;
        match self.take().await {
            Next::Item(result) => result,
            Next::Exhausted => Err(self.exhausted_error()),
            Next::Closed => Err(self.closed_error("next")),
        }
    }

    /// The remaining rows as a stream, it ends when the cursor is drained or closed.
    pub fn stream(&self) -> impl Stream<Item = ReqlResult<Datum>> + Send + 'static {
        let cursor = self.clone();
        stream! {
            if let Err(error) = cursor.check("next") {
                yield Err(error);
                return;
            }
            while let Next::Item(result) = cursor.take().await {
                yield result;
            }
        }
    }

    async fn drive(&self, on_item: &mut impl FnMut(ReqlResult<Datum>) -> bool) -> Flow {
        loop {
            match self.take().await {
                Next::Item(result) => {
                    if !on_item(result) {
                        return Flow::Interrupted;
                    }
                    if self.is_closed() {
                        return Flow::Closed;
                    }
                }
                Next::Exhausted => return Flow::Finished,
                Next::Closed => return Flow::Closed,
            }
        }
    }

    /// Call `on_item` for each row until it returns `false` or the cursor is drained,
    /// then call `on_end`.
    ///
    /// Row errors are passed to `on_item` and do not stop the loop. Closing the
    /// cursor meanwhile stops it without calling `on_end`.
    pub async fn each<F, E>(&self, mut on_item: F, on_end: E) -> ReqlResult<()>
    where
        F: FnMut(ReqlResult<Datum>) -> bool,
        E: FnOnce(),
    {
        self.check("each")?;
        match self.drive(&mut on_item).await {
            Flow::Finished | Flow::Interrupted => on_end(),
            Flow::Closed => {}
        }
        Ok(())
    }

    /// Every remaining row, failing at the first row error.
    ///
    /// Feeds never end so they are rejected.
    pub async fn to_vec(&self) -> ReqlResult<Vec<Datum>> {
        if self.kind().is_feed() {
            return Err(ReqlError::driver(
                "The `to_vec` method is not available on feeds",
                None,
            ));
        }
        self.check("to_vec")?;
        let mut rows = Vec::new();
        let mut failure = None;
        let flow = self
            .drive(&mut |result| match result {
                Ok(row) => {
                    rows.push(row);
                    true
                }
                Err(error) => {
                    failure = Some(error);
                    false
                }
            })
            .await;
        if let Some(error) = failure {
            return Err(error);
        }
        if flow == Flow::Closed {
            return Err(self.closed_error("to_vec"));
        }
        Ok(rows)
    }

    /// Receive the rows as events.
    ///
    /// Afterwards [`Cursor::next`], [`Cursor::each`], [`Cursor::to_vec`] fail.
    /// Nothing is sent once the cursor is closed.
    pub fn subscribe(&self) -> ReqlResult<Subscription> {
        {
            let mut state = self.lock();
            self.check_state(&state, "subscribe")?;
            state.subscribed = true;
        }
        let (sender, receiver) = mpsc::unbounded_channel();
        let cursor = self.clone();
        tokio::spawn(async move {
            let flow = cursor
                .drive(&mut |result| {
                    if cursor.is_closed() {
                        return false;
                    }
                    let event = match result {
                        Ok(row) => Event::Item(row),
                        Err(error) => Event::Error(error),
                    };
                    if sender.send(event).is_err() {
                        log::debug!(
                            "The subscriber of {} {} went away",
                            cursor.kind(),
                            cursor.token()
                        );
                        return false;
                    }
                    true
                })
                .await;
            if flow == Flow::Finished && !cursor.kind().is_feed() && !cursor.is_closed() {
                if let Err(e) = sender.send(Event::End) {
                    log::debug!("{:#}", e);
                }
            }
        });
        Ok(Subscription { receiver })
    }

    /// Stop reading.
    ///
    /// Pending reads fail, a stop request is sent when the server may still
    /// produce rows. Closing twice does nothing.
    pub async fn close(&self) -> ReqlResult<()> {
        {
            let mut state = self.lock();
            if state.closed {
                return Ok(());
            }
            state.closed = true;
            state.buffer.clear();
            for waiter in state.waiters.drain(..) {
                let _ = waiter.send(Next::Closed);
            }
            if !state.can_fetch && !state.fetching {
                return Ok(());
            }
            state.can_fetch = false;
        }
        log::debug!("Stopping {} {}", self.kind(), self.token());
        self.shared
            .connection
            .stop_query(self.token())
            .await
            .map_err(ReqlError::from_transport)
    }
}

impl<C: Connection> Display for Cursor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[object {}]", self.kind())
    }
}

impl<C: Connection> Debug for Cursor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("token", &self.token())
            .field("kind", &self.kind())
            .field("state", &*self.lock())
            .finish()
    }
}
