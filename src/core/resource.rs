//! Per-feed async resources and the polling set that keeps them fresh.

use crate::core::feed::{Feed, FeedTransport, fetch_feed};
use crate::core::models::{
    AvailableFunds, CurrencyRates, DebitCredit, NearDueCheques, PageNames, SalesTotals,
    TopCustomers, TopRevenueProducts, TopSellers, TopSoldProducts, UnsettledInvoices,
};
use crate::core::notify::Notifier;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, join_all};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Refresh period used by the dashboard feeds.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Result of a single fetch cycle.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// The call completed; `None` when the envelope reported a business failure.
    Loaded(Option<T>),
    /// The call itself failed.
    Failed,
}

#[derive(Debug, Clone)]
pub struct AsyncResource<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub is_error: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> AsyncResource<T> {
    /// A resource whose first fetch has not completed yet.
    pub fn pending() -> Self {
        Self {
            data: None,
            is_loading: true,
            is_error: false,
            updated_at: None,
        }
    }

    /// Folds a fetch outcome into the resource. A failed refetch keeps the
    /// last good data.
    pub fn apply(&mut self, outcome: FetchOutcome<T>) {
        self.is_loading = false;
        match outcome {
            FetchOutcome::Loaded(data) => {
                self.data = data;
                self.is_error = false;
                self.updated_at = Some(Utc::now());
            }
            FetchOutcome::Failed => {
                self.is_error = true;
            }
        }
    }
}

impl<T> Default for AsyncResource<T> {
    fn default() -> Self {
        Self::pending()
    }
}

/// One resource per feed. Each slot is only written by its own fetch cycle.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub sales: AsyncResource<SalesTotals>,
    pub balances: AsyncResource<DebitCredit>,
    pub cheques: AsyncResource<NearDueCheques>,
    pub funds: AsyncResource<AvailableFunds>,
    pub rates: AsyncResource<CurrencyRates>,
    pub invoices: AsyncResource<UnsettledInvoices>,
    pub top_sold: AsyncResource<TopSoldProducts>,
    pub top_revenue: AsyncResource<TopRevenueProducts>,
    pub top_sellers: AsyncResource<TopSellers>,
    pub top_customers: AsyncResource<TopCustomers>,
    pub pages: AsyncResource<PageNames>,
}

impl DashboardSnapshot {
    pub fn loading_flags(&self) -> Vec<bool> {
        vec![
            self.sales.is_loading,
            self.balances.is_loading,
            self.cheques.is_loading,
            self.funds.is_loading,
            self.rates.is_loading,
            self.invoices.is_loading,
            self.top_sold.is_loading,
            self.top_revenue.is_loading,
            self.top_sellers.is_loading,
            self.top_customers.is_loading,
            self.pages.is_loading,
        ]
    }

    /// Most recent successful update across all feeds.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        [
            self.sales.updated_at,
            self.balances.updated_at,
            self.cheques.updated_at,
            self.funds.updated_at,
            self.rates.updated_at,
            self.invoices.updated_at,
            self.top_sold.updated_at,
            self.top_revenue.updated_at,
            self.top_sellers.updated_at,
            self.top_customers.updated_at,
            self.pages.updated_at,
        ]
        .into_iter()
        .flatten()
        .max()
    }
}

type SlotUpdate = Box<dyn FnOnce(&mut DashboardSnapshot) + Send>;

type Poller = fn(
    Arc<dyn FeedTransport>,
    Arc<dyn Notifier>,
    Arc<watch::Sender<DashboardSnapshot>>,
    Duration,
) -> JoinHandle<()>;

async fn load<T: Feed>(transport: &dyn FeedTransport, notifier: &dyn Notifier) -> SlotUpdate {
    let outcome = fetch_feed::<T>(transport, notifier).await;
    Box::new(move |snapshot: &mut DashboardSnapshot| T::slot(snapshot).apply(outcome))
}

/// Fetches every feed once, concurrently, and returns the resulting snapshot.
pub async fn load_snapshot(
    transport: &dyn FeedTransport,
    notifier: &dyn Notifier,
) -> DashboardSnapshot {
    let cycles: Vec<BoxFuture<'_, SlotUpdate>> = vec![
        load::<SalesTotals>(transport, notifier).boxed(),
        load::<DebitCredit>(transport, notifier).boxed(),
        load::<NearDueCheques>(transport, notifier).boxed(),
        load::<AvailableFunds>(transport, notifier).boxed(),
        load::<CurrencyRates>(transport, notifier).boxed(),
        load::<UnsettledInvoices>(transport, notifier).boxed(),
        load::<TopSoldProducts>(transport, notifier).boxed(),
        load::<TopRevenueProducts>(transport, notifier).boxed(),
        load::<TopSellers>(transport, notifier).boxed(),
        load::<TopCustomers>(transport, notifier).boxed(),
        load::<PageNames>(transport, notifier).boxed(),
    ];

    let mut snapshot = DashboardSnapshot::default();
    for update in join_all(cycles).await {
        update(&mut snapshot);
    }
    snapshot
}

/// Independently polled feeds. Dropping the set stops every timer.
pub struct ResourceSet {
    snapshot: watch::Receiver<DashboardSnapshot>,
    tasks: Vec<JoinHandle<()>>,
}

impl ResourceSet {
    pub fn spawn(
        transport: Arc<dyn FeedTransport>,
        notifier: Arc<dyn Notifier>,
        period: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(DashboardSnapshot::default());
        let tx = Arc::new(tx);
        debug!(?period, "Starting feed pollers");

        let spawn = |poll: Poller| {
            poll(
                Arc::clone(&transport),
                Arc::clone(&notifier),
                Arc::clone(&tx),
                period,
            )
        };
        let tasks = vec![
            spawn(poll_feed::<SalesTotals>),
            spawn(poll_feed::<DebitCredit>),
            spawn(poll_feed::<NearDueCheques>),
            spawn(poll_feed::<AvailableFunds>),
            spawn(poll_feed::<CurrencyRates>),
            spawn(poll_feed::<UnsettledInvoices>),
            spawn(poll_feed::<TopSoldProducts>),
            spawn(poll_feed::<TopRevenueProducts>),
            spawn(poll_feed::<TopSellers>),
            spawn(poll_feed::<TopCustomers>),
            spawn(poll_feed::<PageNames>),
        ];

        Self {
            snapshot: rx,
            tasks,
        }
    }

    /// A receiver that is notified on every feed transition.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for ResourceSet {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_feed<T: Feed>(
    transport: Arc<dyn FeedTransport>,
    notifier: Arc<dyn Notifier>,
    tx: Arc<watch::Sender<DashboardSnapshot>>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let outcome = fetch_feed::<T>(transport.as_ref(), notifier.as_ref()).await;
            tx.send_modify(|snapshot| T::slot(snapshot).apply(outcome));
        }
    })
}
