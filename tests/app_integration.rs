use homedash::cli::customize::CustomizeAction;
use homedash::core::config::AppConfig;
use homedash::core::customization::{CustomizationItem, CustomizationRepository};
use homedash::core::feed::FeedId;
use homedash::core::resource::load_snapshot;
use homedash::providers::HttpFeedTransport;
use homedash::store::{KeyValueStore, MemoryStore};
use homedash::{AppCommand, Dashboard};
use std::fs;
use std::sync::Arc;
use tracing::info;

mod test_utils {
    use homedash::core::feed::FeedId;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub fn ok(data: Value) -> Value {
        json!({
            "Status": true,
            "Message": [],
            "Data": data,
            "RequestUrl": "",
            "HttpStatusCode": 200
        })
    }

    pub fn payload(feed: FeedId) -> Value {
        match feed {
            FeedId::SalesTotals => json!({
                "TotalSales": 125000.0,
                "TotalRevenue": 40000.0,
                "InvoiceCount": 42,
                "Returns": 1500.0,
                "SalesChangePercent": 3.5,
                "RevenueChangePercent": -1.2
            }),
            FeedId::DebitCredit => json!({"TotalDebit": 90000.0, "TotalCredit": 60000.0}),
            FeedId::NearDueCheques => json!({
                "ReceivableCount": 3,
                "ReceivableAmount": 15000.0,
                "PayableCount": 1,
                "PayableAmount": 5000.0
            }),
            FeedId::AvailableFunds => json!({"Cash": 1000.0, "Bank": 25000.0, "PettyCash": 200.0}),
            FeedId::CurrencyRates => json!([
                {"Code": "UsdDollar", "Title": "US Dollar", "Price": 580000.0, "ChangePercent": 0.4},
                {"Code": "SekeEmaami", "Title": "Emami Coin", "Price": 450000000.0, "ChangePercent": null}
            ]),
            FeedId::UnsettledInvoices => json!([
                {"Number": "INV-1001", "Customer": "Acme", "Amount": 7000.0, "DueDate": "2024-05-01"}
            ]),
            FeedId::TopSoldProducts | FeedId::TopRevenueProducts => json!([
                {"Name": "Steel Pipe", "Quantity": 120, "Amount": 36000.0}
            ]),
            FeedId::TopSellers | FeedId::TopCustomers => json!([
                {"Name": "Sara", "Amount": 52000.0, "InvoiceCount": 9}
            ]),
            FeedId::PageNames => json!([
                {"Id": "1", "Name": "salesrevenue"},
                {"Id": "2", "Name": "debitcredit"},
                {"Id": "3", "Name": "funds"},
                {"Id": "4", "Name": "currencyrates"}
            ]),
        }
    }

    pub async fn mount(server: &MockServer, feed: FeedId, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(feed.endpoint()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    /// Serves every feed except those in `skip`.
    pub async fn create_mock_server(skip: &[FeedId]) -> MockServer {
        let server = MockServer::start().await;
        for feed in FeedId::ALL {
            if !skip.contains(&feed) {
                mount(&server, feed, 200, ok(payload(feed))).await;
            }
        }
        server
    }
}

fn config_for(base_url: &str, data_path: &std::path::Path) -> AppConfig {
    let yaml = format!(
        r#"
api:
  base_url: "{}"
data_path: "{}"
"#,
        base_url,
        data_path.display()
    );
    serde_yaml::from_str(&yaml).expect("Failed to parse test config")
}

fn item(page_name: &str, sort: i64) -> CustomizationItem {
    CustomizationItem {
        page_id: page_name.to_string(),
        page_name: page_name.to_string(),
        label: page_name.to_string(),
        is_enabled: true,
        sort,
    }
}

fn kinds(dashboard: &Dashboard, snapshot: &homedash::core::DashboardSnapshot) -> Vec<String> {
    dashboard
        .page(snapshot)
        .widgets
        .iter()
        .map(|w| w.kind.to_string())
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_default_order_follows_page_registry() {
    let server = test_utils::create_mock_server(&[]).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config = config_for(&server.uri(), data_dir.path());
    let transport = Arc::new(HttpFeedTransport::new(&server.uri()).unwrap());
    let dashboard = Dashboard::new(&config, transport, Arc::new(MemoryStore::new()));

    let snapshot = load_snapshot(dashboard.transport.as_ref(), dashboard.notifier.as_ref()).await;
    let page = dashboard.page(&snapshot);

    assert!(!page.is_loading);
    assert_eq!(
        kinds(&dashboard, &snapshot),
        vec!["salesrevenue", "debitcredit", "funds", "currencyrates"]
    );
    assert!(page.widgets.iter().all(|w| !w.props.is_error));
    info!(widgets = page.widgets.len(), "Composed default page");
}

#[test_log::test(tokio::test)]
async fn test_stored_customization_orders_and_drops_unknown() {
    let server = test_utils::create_mock_server(&[]).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config = config_for(&server.uri(), data_dir.path());
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    CustomizationRepository::new(Arc::clone(&store))
        .save(&[
            item("salesrevenue", 1),
            item("ghost-widget", 2),
            item("debitcredit", 0),
        ])
        .unwrap();
    let transport = Arc::new(HttpFeedTransport::new(&server.uri()).unwrap());
    let dashboard = Dashboard::new(&config, transport, store);

    let snapshot = load_snapshot(dashboard.transport.as_ref(), dashboard.notifier.as_ref()).await;

    assert_eq!(
        kinds(&dashboard, &snapshot),
        vec!["debitcredit", "salesrevenue"]
    );
}

#[test_log::test(tokio::test)]
async fn test_failing_feeds_stay_isolated() {
    let server = test_utils::create_mock_server(&[FeedId::DebitCredit, FeedId::SalesTotals]).await;
    test_utils::mount(&server, FeedId::DebitCredit, 500, serde_json::json!({})).await;
    test_utils::mount(
        &server,
        FeedId::SalesTotals,
        200,
        serde_json::json!({
            "Status": false,
            "Message": ["Sales report is locked", "Ask an administrator"],
            "Data": null
        }),
    )
    .await;

    let data_dir = tempfile::tempdir().unwrap();
    let config = config_for(&server.uri(), data_dir.path());
    let transport = Arc::new(HttpFeedTransport::new(&server.uri()).unwrap());
    let dashboard = Dashboard::new(&config, transport, Arc::new(MemoryStore::new()));

    let snapshot = load_snapshot(dashboard.transport.as_ref(), dashboard.notifier.as_ref()).await;

    assert!(snapshot.balances.is_error);
    assert!(snapshot.balances.data.is_none());
    assert!(!snapshot.sales.is_error);
    assert!(snapshot.sales.data.is_none());
    assert!(snapshot.funds.data.is_some());
    assert_eq!(
        dashboard.notifier.drain(),
        vec!["Sales report is locked", "Ask an administrator"]
    );

    let page = dashboard.page(&snapshot);
    assert_eq!(page.widgets.len(), 4);
    assert!(page.widgets[1].props.is_error);
}

fn write_config(base_url: &str, data_path: &std::path::Path) -> tempfile::NamedTempFile {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
api:
  base_url: "{}"
refresh_interval_secs: 60
disabled_groups:
  - currencyrates
data_path: "{}"
"#,
        base_url,
        data_path.display()
    );
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");
    config_file
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let server = test_utils::create_mock_server(&[]).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = write_config(&server.uri(), data_dir.path());

    let result =
        homedash::run_command(AppCommand::Show, Some(config_file.path().to_str().unwrap())).await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_customize_set_stores_order() {
    let server = test_utils::create_mock_server(&[]).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = write_config(&server.uri(), data_dir.path());

    let result = homedash::run_command(
        AppCommand::Customize(CustomizeAction::Set(vec![
            "funds".to_string(),
            "salesrevenue".to_string(),
        ])),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Customize failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_customize_set_rejects_unknown_widget() {
    let server = test_utils::create_mock_server(&[]).await;
    let data_dir = tempfile::tempdir().unwrap();
    let config_file = write_config(&server.uri(), data_dir.path());

    let result = homedash::run_command(
        AppCommand::Customize(CustomizeAction::Set(vec!["ghost-widget".to_string()])),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Unknown widget: ghost-widget")
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let result = homedash::run_command(AppCommand::Show, Some("/nonexistent/config.yaml")).await;
    assert!(result.is_err());
}
