//! Feed identifiers, the transport abstraction and the per-feed fetch cycle.

use crate::core::envelope::Envelope;
use crate::core::models::{
    AvailableFunds, CurrencyRates, DebitCredit, NearDueCheques, PageNames, SalesTotals,
    TopCustomers, TopRevenueProducts, TopSellers, TopSoldProducts, UnsettledInvoices,
};
use crate::core::notify::Notifier;
use crate::core::resource::{AsyncResource, DashboardSnapshot, FetchOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum FeedId {
    SalesTotals,
    DebitCredit,
    NearDueCheques,
    AvailableFunds,
    CurrencyRates,
    UnsettledInvoices,
    TopSoldProducts,
    TopRevenueProducts,
    TopSellers,
    TopCustomers,
    PageNames,
}

impl FeedId {
    pub const ALL: [FeedId; 11] = [
        FeedId::SalesTotals,
        FeedId::DebitCredit,
        FeedId::NearDueCheques,
        FeedId::AvailableFunds,
        FeedId::CurrencyRates,
        FeedId::UnsettledInvoices,
        FeedId::TopSoldProducts,
        FeedId::TopRevenueProducts,
        FeedId::TopSellers,
        FeedId::TopCustomers,
        FeedId::PageNames,
    ];

    /// Endpoint path relative to the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            FeedId::SalesTotals => "/api/dashboard/sales-totals",
            FeedId::DebitCredit => "/api/dashboard/debit-credit",
            FeedId::NearDueCheques => "/api/dashboard/near-due-cheques",
            FeedId::AvailableFunds => "/api/dashboard/available-funds",
            FeedId::CurrencyRates => "/api/dashboard/currency-rates",
            FeedId::UnsettledInvoices => "/api/dashboard/unsettled-invoices",
            FeedId::TopSoldProducts => "/api/dashboard/top-sold-products",
            FeedId::TopRevenueProducts => "/api/dashboard/top-revenue-products",
            FeedId::TopSellers => "/api/dashboard/top-sellers",
            FeedId::TopCustomers => "/api/dashboard/top-customers",
            FeedId::PageNames => "/api/dashboard/page-names",
        }
    }
}

impl Display for FeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FeedId::SalesTotals => "sales-totals",
                FeedId::DebitCredit => "debit-credit",
                FeedId::NearDueCheques => "near-due-cheques",
                FeedId::AvailableFunds => "available-funds",
                FeedId::CurrencyRates => "currency-rates",
                FeedId::UnsettledInvoices => "unsettled-invoices",
                FeedId::TopSoldProducts => "top-sold-products",
                FeedId::TopRevenueProducts => "top-revenue-products",
                FeedId::TopSellers => "top-sellers",
                FeedId::TopCustomers => "top-customers",
                FeedId::PageNames => "page-names",
            }
        )
    }
}

/// Performs the network call for a single feed.
///
/// An `Err` is a transport failure. A business failure comes back as an
/// `Ok` envelope with `status == false`.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn fetch(&self, feed: FeedId) -> Result<Envelope<serde_json::Value>>;
}

/// A payload type bound to exactly one feed and one slot of the snapshot.
pub trait Feed: DeserializeOwned + Send + Sync + 'static {
    const ID: FeedId;

    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self>;
}

/// Runs one fetch cycle for feed `T`.
///
/// Business failure messages are handed to the notifier one by one and the
/// payload is treated as absent. Transport and decode failures produce
/// [`FetchOutcome::Failed`].
#[instrument(skip_all, fields(feed = %T::ID))]
pub async fn fetch_feed<T: Feed>(
    transport: &dyn FeedTransport,
    notifier: &dyn Notifier,
) -> FetchOutcome<T> {
    let result: Result<Option<T>> = async {
        let envelope = transport.fetch(T::ID).await?;
        let (data, messages) = envelope.into_parts();
        for message in &messages {
            notifier.notify_error(message);
        }
        data.map(|value| {
            serde_json::from_value::<T>(value)
                .with_context(|| format!("Failed to decode payload for feed: {}", T::ID))
        })
        .transpose()
    }
    .await;

    match result {
        Ok(data) => {
            debug!(has_data = data.is_some(), "Feed fetched");
            FetchOutcome::Loaded(data)
        }
        Err(e) => {
            debug!("Feed fetch failed: {:#}", e);
            FetchOutcome::Failed
        }
    }
}

impl Feed for SalesTotals {
    const ID: FeedId = FeedId::SalesTotals;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.sales
    }
}

impl Feed for DebitCredit {
    const ID: FeedId = FeedId::DebitCredit;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.balances
    }
}

impl Feed for NearDueCheques {
    const ID: FeedId = FeedId::NearDueCheques;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.cheques
    }
}

impl Feed for AvailableFunds {
    const ID: FeedId = FeedId::AvailableFunds;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.funds
    }
}

impl Feed for CurrencyRates {
    const ID: FeedId = FeedId::CurrencyRates;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.rates
    }
}

impl Feed for UnsettledInvoices {
    const ID: FeedId = FeedId::UnsettledInvoices;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.invoices
    }
}

impl Feed for TopSoldProducts {
    const ID: FeedId = FeedId::TopSoldProducts;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.top_sold
    }
}

impl Feed for TopRevenueProducts {
    const ID: FeedId = FeedId::TopRevenueProducts;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.top_revenue
    }
}

impl Feed for TopSellers {
    const ID: FeedId = FeedId::TopSellers;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.top_sellers
    }
}

impl Feed for TopCustomers {
    const ID: FeedId = FeedId::TopCustomers;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.top_customers
    }
}

impl Feed for PageNames {
    const ID: FeedId = FeedId::PageNames;
    fn slot(snapshot: &mut DashboardSnapshot) -> &mut AsyncResource<Self> {
        &mut snapshot.pages
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::notify::CollectingNotifier;
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned envelopes per feed; feeds without an entry fail.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        pub(crate) responses: Mutex<HashMap<FeedId, Envelope<serde_json::Value>>>,
        pub(crate) calls: AtomicUsize,
    }

    impl MockTransport {
        pub(crate) fn with(self, feed: FeedId, data: serde_json::Value) -> Self {
            self.responses.lock().unwrap().insert(
                feed,
                Envelope {
                    status: true,
                    message: Vec::new(),
                    data: Some(data),
                    request_url: feed.endpoint().to_string(),
                    http_status_code: 200,
                },
            );
            self
        }

        pub(crate) fn with_envelope(
            self,
            feed: FeedId,
            envelope: Envelope<serde_json::Value>,
        ) -> Self {
            self.responses.lock().unwrap().insert(feed, envelope);
            self
        }
    }

    #[async_trait]
    impl FeedTransport for MockTransport {
        async fn fetch(&self, feed: FeedId) -> Result<Envelope<serde_json::Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .get(&feed)
                .cloned()
                .ok_or_else(|| anyhow!("connection refused for feed: {}", feed))
        }
    }

    #[tokio::test]
    async fn test_fetch_feed_success() {
        let transport = MockTransport::default().with(
            FeedId::DebitCredit,
            serde_json::json!({"TotalDebit": 100.0, "TotalCredit": 40.0}),
        );
        let notifier = CollectingNotifier::default();

        let outcome = fetch_feed::<DebitCredit>(&transport, &notifier).await;
        match outcome {
            FetchOutcome::Loaded(Some(data)) => {
                assert_eq!(data.total_debit, 100.0);
                assert_eq!(data.total_credit, 40.0);
            }
            other => panic!("Expected loaded data, got {other:?}"),
        }
        assert!(notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_feed_business_failure_notifies_each_message() {
        let transport = MockTransport::default().with_envelope(
            FeedId::SalesTotals,
            Envelope {
                status: false,
                message: vec!["Access denied".to_string(), "Try later".to_string()],
                data: None,
                request_url: FeedId::SalesTotals.endpoint().to_string(),
                http_status_code: 200,
            },
        );
        let notifier = CollectingNotifier::default();

        let outcome = fetch_feed::<SalesTotals>(&transport, &notifier).await;
        assert!(matches!(outcome, FetchOutcome::Loaded(None)));
        assert_eq!(notifier.drain(), vec!["Access denied", "Try later"]);
    }

    #[tokio::test]
    async fn test_fetch_feed_transport_failure() {
        let transport = MockTransport::default();
        let notifier = CollectingNotifier::default();

        let outcome = fetch_feed::<AvailableFunds>(&transport, &notifier).await;
        assert!(matches!(outcome, FetchOutcome::Failed));
        assert!(notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_feed_undecodable_payload_is_a_failure() {
        let transport = MockTransport::default()
            .with(FeedId::AvailableFunds, serde_json::json!({"Cash": "lots"}));
        let notifier = CollectingNotifier::default();

        let outcome = fetch_feed::<AvailableFunds>(&transport, &notifier).await;
        assert!(matches!(outcome, FetchOutcome::Failed));
    }

    #[test]
    fn test_endpoints_are_unique() {
        let mut endpoints: Vec<_> = FeedId::ALL.iter().map(|f| f.endpoint()).collect();
        endpoints.sort();
        endpoints.dedup();
        assert_eq!(endpoints.len(), FeedId::ALL.len());
    }
}
