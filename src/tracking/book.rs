use crate::core::errors::ExchangeError;
use crate::core::traits::BookSource;
use crate::core::types::{BookLevel, OrderBook, PriceLevel, Side};
use crate::tracking::{publish, spawn_poller, Poller, TrackerHandle, DEFAULT_EVENT_CAPACITY};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, warn};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(1000);
const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub enum BookEvent {
    /// Best level on a side moved, or appeared for the first time
    Changed(BookLevel),
    /// A side that had a level is now empty
    Cleared(Side),
    /// Fetch or decode failed; the last known levels are kept
    Error(ExchangeError),
}

/// Last emitted best level per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L1State {
    pub bid: Option<PriceLevel>,
    pub ask: Option<PriceLevel>,
}

impl L1State {
    pub fn get(&self, side: Side) -> Option<PriceLevel> {
        match side {
            Side::Buy => self.bid,
            Side::Sell => self.ask,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<PriceLevel> {
        match side {
            Side::Buy => &mut self.bid,
            Side::Sell => &mut self.ask,
        }
    }

    /// Fold a fresh snapshot into the state, returning what changed, bid first
    pub fn apply(&mut self, book: &OrderBook) -> Vec<BookEvent> {
        let mut events = Vec::new();

        for side in [Side::Buy, Side::Sell] {
            let slot = self.slot_mut(side);
            match (*slot, book.best(side)) {
                (Some(previous), Some(level)) if previous == level => {}
                (_, Some(level)) => {
                    *slot = Some(level);
                    events.push(BookEvent::Changed(BookLevel {
                        side,
                        price: level.price,
                        size: level.size,
                    }));
                }
                (Some(_), None) => {
                    *slot = None;
                    events.push(BookEvent::Cleared(side));
                }
                (None, None) => {}
            }
        }

        events
    }
}

/// Polls one venue book and reports top-of-book changes
pub struct L1BookTracker {
    source: Arc<dyn BookSource>,
    refresh_interval: Duration,
    state: L1State,
    events: broadcast::Sender<BookEvent>,
}

impl L1BookTracker {
    pub fn new(source: Arc<dyn BookSource>) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            source,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            state: L1State::default(),
            events,
        }
    }

    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval.max(MIN_REFRESH_INTERVAL);
        self
    }

    /// Resize the per-subscriber buffer. Receivers taken before this call
    /// stop receiving.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        self.events = events;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> L1State {
        self.state
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn exchange_name(&self) -> &'static str {
        self.source.exchange_name()
    }

    /// Run a single fetch and diff, publish the result, and return it
    pub async fn poll_once(&mut self) -> Vec<BookEvent> {
        let emitted = match self.source.fetch_book().await {
            Ok(book) => self.state.apply(&book),
            Err(err) => {
                warn!(exchange = self.exchange_name(), error = %err, "book fetch failed");
                vec![BookEvent::Error(err)]
            }
        };

        for event in &emitted {
            match event {
                BookEvent::Changed(level) => {
                    debug!(exchange = self.exchange_name(), %level, "top of book changed");
                }
                BookEvent::Cleared(side) => {
                    debug!(exchange = self.exchange_name(), side = side.book_side(), "side emptied");
                }
                BookEvent::Error(_) => {}
            }
        }

        publish(&self.events, &emitted);
        emitted
    }

    /// Move the tracker onto its own task
    pub fn spawn(self) -> TrackerHandle<BookEvent> {
        let events = self.events.clone();
        spawn_poller(self, events)
    }
}

#[async_trait]
impl Poller for L1BookTracker {
    type Event = BookEvent;

    async fn poll(&mut self) -> Vec<BookEvent> {
        self.poll_once().await
    }

    fn interval(&self) -> Duration {
        self.refresh_interval
    }

    fn label(&self) -> &'static str {
        "l1_book"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedSource {
        books: Mutex<VecDeque<Result<OrderBook, ExchangeError>>>,
    }

    impl ScriptedSource {
        fn new(books: Vec<Result<OrderBook, ExchangeError>>) -> Arc<Self> {
            Arc::new(Self {
                books: Mutex::new(books.into()),
            })
        }
    }

    #[async_trait]
    impl BookSource for ScriptedSource {
        async fn fetch_book(&self) -> Result<OrderBook, ExchangeError> {
            self.books
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(OrderBook::default()))
        }

        fn exchange_name(&self) -> &'static str {
            "scripted"
        }
    }

    struct StalledSource;

    #[async_trait]
    impl BookSource for StalledSource {
        async fn fetch_book(&self) -> Result<OrderBook, ExchangeError> {
            std::future::pending().await
        }

        fn exchange_name(&self) -> &'static str {
            "stalled"
        }
    }

    fn level(price: rust_decimal::Decimal, size: rust_decimal::Decimal) -> PriceLevel {
        PriceLevel { price, size }
    }

    fn book() -> OrderBook {
        OrderBook {
            bids: vec![level(dec!(4.9), dec!(2)), level(dec!(5.0), dec!(1))],
            asks: vec![level(dec!(5.1), dec!(3)), level(dec!(5.2), dec!(7))],
        }
    }

    fn changed(events: &[BookEvent]) -> Vec<BookLevel> {
        events
            .iter()
            .filter_map(|e| match e {
                BookEvent::Changed(level) => Some(*level),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_first_tick_emits_one_change_per_side() {
        let mut tracker = L1BookTracker::new(ScriptedSource::new(vec![Ok(book())]));

        let events = tracker.poll_once().await;
        assert_eq!(
            changed(&events),
            vec![
                BookLevel { side: Side::Buy, price: dec!(5.0), size: dec!(1) },
                BookLevel { side: Side::Sell, price: dec!(5.1), size: dec!(3) },
            ]
        );
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_identical_snapshots_emit_nothing() {
        let mut tracker =
            L1BookTracker::new(ScriptedSource::new(vec![Ok(book()), Ok(book())]));
        tracker.poll_once().await;
        assert!(tracker.poll_once().await.is_empty());
    }

    #[tokio::test]
    async fn test_ask_size_change_emits_exactly_one_ask_event() {
        let mut next = book();
        next.asks[0].size = dec!(4);
        let mut tracker = L1BookTracker::new(ScriptedSource::new(vec![Ok(book()), Ok(next)]));

        tracker.poll_once().await;
        let events = tracker.poll_once().await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            changed(&events),
            vec![BookLevel { side: Side::Sell, price: dec!(5.1), size: dec!(4) }]
        );
    }

    #[tokio::test]
    async fn test_error_keeps_state() {
        let mut tracker = L1BookTracker::new(ScriptedSource::new(vec![
            Ok(book()),
            Err(ExchangeError::Transport("connection reset".to_string())),
            Ok(book()),
        ]));

        tracker.poll_once().await;
        let before = tracker.state();

        let events = tracker.poll_once().await;
        assert!(matches!(events.as_slice(), [BookEvent::Error(ExchangeError::Transport(_))]));
        assert_eq!(tracker.state(), before);

        assert!(tracker.poll_once().await.is_empty());
    }

    #[tokio::test]
    async fn test_emptied_side_is_cleared_then_reappears() {
        let mut no_asks = book();
        no_asks.asks.clear();
        let mut tracker = L1BookTracker::new(ScriptedSource::new(vec![
            Ok(book()),
            Ok(no_asks),
            Ok(book()),
        ]));

        tracker.poll_once().await;

        let events = tracker.poll_once().await;
        assert!(matches!(events.as_slice(), [BookEvent::Cleared(Side::Sell)]));
        assert_eq!(tracker.state().ask, None);

        let events = tracker.poll_once().await;
        assert_eq!(
            changed(&events),
            vec![BookLevel { side: Side::Sell, price: dec!(5.1), size: dec!(3) }]
        );
    }

    #[tokio::test]
    async fn test_empty_book_on_first_tick_emits_nothing() {
        let mut tracker = L1BookTracker::new(ScriptedSource::new(vec![Ok(OrderBook::default())]));
        assert!(tracker.poll_once().await.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_events_in_order() {
        let mut next = book();
        next.bids[1].price = dec!(5.05);
        let mut tracker = L1BookTracker::new(ScriptedSource::new(vec![Ok(book()), Ok(next)]));
        let mut rx = tracker.subscribe();

        tracker.poll_once().await;
        tracker.poll_once().await;

        let mut seen = Vec::new();
        while let Ok(BookEvent::Changed(level)) = rx.try_recv() {
            seen.push((level.side, level.price));
        }
        assert_eq!(
            seen,
            vec![
                (Side::Buy, dec!(5.0)),
                (Side::Sell, dec!(5.1)),
                (Side::Buy, dec!(5.05)),
            ]
        );
    }

    #[tokio::test]
    async fn test_lagging_subscriber_loses_oldest() {
        let books = (1..=4)
            .map(|i| {
                Ok(OrderBook {
                    bids: vec![level(rust_decimal::Decimal::from(i), dec!(1))],
                    asks: vec![],
                })
            })
            .collect();
        let mut tracker = L1BookTracker::new(ScriptedSource::new(books)).with_event_capacity(2);
        let mut rx = tracker.subscribe();

        for _ in 0..4 {
            tracker.poll_once().await;
        }

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(2))
        ));
        match rx.try_recv() {
            Ok(BookEvent::Changed(level)) => assert_eq!(level.price, dec!(3)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawned_tracker_publishes_and_shuts_down() {
        let tracker = L1BookTracker::new(ScriptedSource::new(vec![Ok(book())]))
            .with_refresh_interval(Duration::from_millis(10));
        let mut rx = tracker.subscribe();
        let handle = tracker.spawn();

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("no event before timeout")
            .unwrap();
        assert!(matches!(first, BookEvent::Changed(BookLevel { side: Side::Buy, .. })));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_discards_in_flight_fetch() {
        let tracker = L1BookTracker::new(Arc::new(StalledSource))
            .with_refresh_interval(Duration::from_millis(10));
        let mut rx = tracker.subscribe();
        let handle = tracker.spawn();

        tokio::time::sleep(Duration::from_millis(30)).await;
        tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
            .await
            .expect("shutdown waited on a stalled fetch");
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Closed)
        ));
    }
}
