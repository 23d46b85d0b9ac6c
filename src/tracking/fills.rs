use crate::core::errors::ExchangeError;
use crate::core::traits::Trader;
use crate::core::types::Order;
use crate::tracking::{publish, spawn_poller, Poller, TrackerHandle, DEFAULT_EVENT_CAPACITY};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub enum OrderEvent {
    Opened(Order),
    /// Open size shrank by `filled`; `order` carries the remaining size
    Filled { order: Order, filled: Decimal },
    /// No longer open. Fill and cancel look the same from here.
    Closed(Order),
    Error(ExchangeError),
}

/// Reconciles a venue's open orders between polls
pub struct FillTracker {
    trader: Arc<dyn Trader>,
    poll_interval: Duration,
    open: Option<HashMap<String, Order>>,
    events: broadcast::Sender<OrderEvent>,
}

impl FillTracker {
    pub fn new(trader: Arc<dyn Trader>) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            trader,
            poll_interval: DEFAULT_POLL_INTERVAL,
            open: None,
            events,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.events.subscribe()
    }

    /// Orders seen open at the last successful poll
    pub fn open_orders(&self) -> Vec<Order> {
        let mut orders: Vec<_> = self.open.iter().flat_map(|m| m.values().cloned()).collect();
        orders.sort_by(|a, b| a.id.cmp(&b.id));
        orders
    }

    pub async fn poll_once(&mut self) -> Vec<OrderEvent> {
        let emitted = match self.trader.list_orders().await {
            Ok(orders) => self.reconcile(orders),
            Err(err) => {
                warn!(exchange = self.trader.exchange_name(), error = %err, "order poll failed");
                vec![OrderEvent::Error(err)]
            }
        };

        publish(&self.events, &emitted);
        emitted
    }

    fn reconcile(&mut self, orders: Vec<Order>) -> Vec<OrderEvent> {
        let Some(previous) = self.open.as_mut() else {
            info!(
                exchange = self.trader.exchange_name(),
                open = orders.len(),
                "order baseline established"
            );
            let events = orders.iter().cloned().map(OrderEvent::Opened).collect();
            self.open = Some(orders.into_iter().map(|o| (o.id.clone(), o)).collect());
            return events;
        };

        let mut events = Vec::new();
        let mut current = HashMap::with_capacity(orders.len());

        for order in orders {
            match previous.remove(&order.id) {
                None => events.push(OrderEvent::Opened(order.clone())),
                Some(before) if order.size < before.size => {
                    let filled = before.size - order.size;
                    debug!(order_id = %order.id, %filled, "partial fill");
                    events.push(OrderEvent::Filled {
                        order: order.clone(),
                        filled,
                    });
                }
                Some(_) => {}
            }
            current.insert(order.id.clone(), order);
        }

        let mut closed: Vec<_> = previous.drain().map(|(_, order)| order).collect();
        closed.sort_by(|a, b| a.id.cmp(&b.id));
        events.extend(closed.into_iter().map(OrderEvent::Closed));

        self.open = Some(current);
        events
    }

    pub fn spawn(self) -> TrackerHandle<OrderEvent> {
        let events = self.events.clone();
        spawn_poller(self, events)
    }
}

#[async_trait]
impl Poller for FillTracker {
    type Event = OrderEvent;

    async fn poll(&mut self) -> Vec<OrderEvent> {
        self.poll_once().await
    }

    fn interval(&self) -> Duration {
        self.poll_interval
    }

    fn label(&self) -> &'static str {
        "fills"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{AccountInfo, OrderPlacer};
    use crate::core::types::{
        Account, CancelConfirmation, DepositRequest, OrderRequest, Side, WithdrawRequest,
    };
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedTrader {
        snapshots: Mutex<VecDeque<Result<Vec<Order>, ExchangeError>>>,
    }

    #[async_trait]
    impl OrderPlacer for ScriptedTrader {
        async fn place_order(&self, _order: &OrderRequest) -> Result<String, ExchangeError> {
            unimplemented!()
        }

        async fn cancel_order(
            &self,
            _product: &str,
            _order_id: &str,
        ) -> Result<CancelConfirmation, ExchangeError> {
            unimplemented!()
        }

        async fn order_details(&self, _order_id: &str) -> Result<Order, ExchangeError> {
            unimplemented!()
        }

        async fn list_orders(&self) -> Result<Vec<Order>, ExchangeError> {
            self.snapshots
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    #[async_trait]
    impl AccountInfo for ScriptedTrader {
        async fn list_accounts(&self) -> Result<Vec<Account>, ExchangeError> {
            unimplemented!()
        }

        async fn withdraw(&self, _request: &WithdrawRequest) -> Result<Value, ExchangeError> {
            unimplemented!()
        }

        async fn deposit(&self, _request: &DepositRequest) -> Result<Value, ExchangeError> {
            unimplemented!()
        }
    }

    impl Trader for ScriptedTrader {
        fn exchange_name(&self) -> &'static str {
            "scripted"
        }
    }

    fn order(id: &str, size: Decimal) -> Order {
        Order {
            id: id.to_string(),
            product: "BTCUSD".to_string(),
            side: Side::Buy,
            size,
            price: dec!(500),
        }
    }

    fn tracker(snapshots: Vec<Result<Vec<Order>, ExchangeError>>) -> FillTracker {
        FillTracker::new(Arc::new(ScriptedTrader {
            snapshots: Mutex::new(snapshots.into()),
        }))
    }

    #[tokio::test]
    async fn test_baseline_opens_every_order() {
        let mut fills = tracker(vec![Ok(vec![order("a", dec!(1)), order("b", dec!(2))])]);
        let events = fills.poll_once().await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, OrderEvent::Opened(_))));
        assert_eq!(fills.open_orders().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_fill_reports_delta() {
        let mut fills = tracker(vec![
            Ok(vec![order("a", dec!(1))]),
            Ok(vec![order("a", dec!(0.4))]),
        ]);
        fills.poll_once().await;

        let events = fills.poll_once().await;
        match events.as_slice() {
            [OrderEvent::Filled { order, filled }] => {
                assert_eq!(order.id, "a");
                assert_eq!(order.size, dec!(0.4));
                assert_eq!(*filled, dec!(0.6));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_vanished_order_is_closed_and_new_one_opened() {
        let mut fills = tracker(vec![
            Ok(vec![order("a", dec!(1))]),
            Ok(vec![order("b", dec!(3))]),
        ]);
        fills.poll_once().await;

        let events = fills.poll_once().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], OrderEvent::Opened(o) if o.id == "b"));
        assert!(matches!(&events[1], OrderEvent::Closed(o) if o.id == "a"));
    }

    #[tokio::test]
    async fn test_unchanged_orders_are_quiet() {
        let mut fills = tracker(vec![
            Ok(vec![order("a", dec!(1))]),
            Ok(vec![order("a", dec!(1))]),
        ]);
        fills.poll_once().await;
        assert!(fills.poll_once().await.is_empty());
    }

    #[tokio::test]
    async fn test_error_keeps_snapshot() {
        let mut fills = tracker(vec![
            Ok(vec![order("a", dec!(1))]),
            Err(ExchangeError::Transport("timed out".to_string())),
            Ok(vec![order("a", dec!(1))]),
        ]);
        fills.poll_once().await;

        let events = fills.poll_once().await;
        assert!(matches!(events.as_slice(), [OrderEvent::Error(_)]));
        assert_eq!(fills.open_orders(), vec![order("a", dec!(1))]);
        assert!(fills.poll_once().await.is_empty());
    }

    #[tokio::test]
    async fn test_error_before_baseline_does_not_establish_one() {
        let mut fills = tracker(vec![
            Err(ExchangeError::Transport("refused".to_string())),
            Ok(vec![order("a", dec!(1))]),
        ]);
        fills.poll_once().await;
        let events = fills.poll_once().await;
        assert!(matches!(events.as_slice(), [OrderEvent::Opened(_)]));
    }
}
