//! The closed set of widgets and the registry pairing each with its props.

use crate::core::cards::{
    MetricCard, PLACEHOLDER, balance_cards, cheque_cards, fund_cards, invoice_cards, sales_cards,
};
use crate::core::currency::{CurrencyBucket, classify};
use crate::core::filter::{CardGroupMapping, filter_by_group};
use crate::core::format::{Change, NumberFormatter};
use crate::core::models::{Invoice, PersonRank, ProductRank};
use crate::core::resource::{AsyncResource, DashboardSnapshot};
use crate::core::settings::GroupSettings;
use anyhow::anyhow;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum WidgetKind {
    SalesRevenue,
    DebitCredit,
    Cheques,
    Funds,
    CurrencyRates,
    UnsettledInvoices,
    TopSoldProducts,
    TopRevenueProducts,
    TopSellers,
    TopCustomers,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 10] = [
        WidgetKind::SalesRevenue,
        WidgetKind::DebitCredit,
        WidgetKind::Cheques,
        WidgetKind::Funds,
        WidgetKind::CurrencyRates,
        WidgetKind::UnsettledInvoices,
        WidgetKind::TopSoldProducts,
        WidgetKind::TopRevenueProducts,
        WidgetKind::TopSellers,
        WidgetKind::TopCustomers,
    ];

    /// The `pageName` this widget is registered under.
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::SalesRevenue => "salesrevenue",
            WidgetKind::DebitCredit => "debitcredit",
            WidgetKind::Cheques => "cheques",
            WidgetKind::Funds => "funds",
            WidgetKind::CurrencyRates => "currencyrates",
            WidgetKind::UnsettledInvoices => "unsettledinvoices",
            WidgetKind::TopSoldProducts => "topsoldproducts",
            WidgetKind::TopRevenueProducts => "toprevenueproducts",
            WidgetKind::TopSellers => "topsellers",
            WidgetKind::TopCustomers => "topcustomers",
        }
    }

    pub fn default_label(&self) -> &'static str {
        match self {
            WidgetKind::SalesRevenue => "Sales & Revenue",
            WidgetKind::DebitCredit => "Debit & Credit",
            WidgetKind::Cheques => "Near-due Cheques",
            WidgetKind::Funds => "Available Funds",
            WidgetKind::CurrencyRates => "Currency Rates",
            WidgetKind::UnsettledInvoices => "Unsettled Invoices",
            WidgetKind::TopSoldProducts => "Top Sold Products",
            WidgetKind::TopRevenueProducts => "Top Revenue Products",
            WidgetKind::TopSellers => "Top Sellers",
            WidgetKind::TopCustomers => "Top Customers",
        }
    }

    pub fn renderer(&self) -> Renderer {
        match self {
            WidgetKind::SalesRevenue
            | WidgetKind::DebitCredit
            | WidgetKind::Cheques
            | WidgetKind::Funds => Renderer::CardGrid,
            WidgetKind::CurrencyRates => Renderer::RateBoard,
            WidgetKind::UnsettledInvoices => Renderer::InvoiceList,
            WidgetKind::TopSoldProducts
            | WidgetKind::TopRevenueProducts
            | WidgetKind::TopSellers
            | WidgetKind::TopCustomers => Renderer::RankingTable,
        }
    }
}

impl Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown widget: {}", s))
    }
}

/// Maps a page name to its display label; unknown names label themselves.
pub fn label_for(page_name: &str) -> String {
    page_name
        .parse::<WidgetKind>()
        .map_or_else(|_| page_name.to_string(), |kind| kind.default_label().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Renderer {
    CardGrid,
    RateBoard,
    RankingTable,
    InvoiceList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutedRate {
    pub title: String,
    pub price: String,
    pub change: Option<Change>,
    pub bucket: CurrencyBucket,
    pub route: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankRow {
    pub rank: usize,
    pub name: String,
    pub detail: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRow {
    pub number: String,
    pub customer: String,
    pub amount: String,
    pub due: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetBody {
    Cards(Vec<MetricCard>),
    Rates(Vec<RoutedRate>),
    Ranking {
        detail_label: &'static str,
        rows: Vec<RankRow>,
    },
    Invoices {
        summary: Vec<MetricCard>,
        invoices: Vec<InvoiceRow>,
        detail_path: &'static str,
    },
}

/// Everything a renderer needs: its data slice plus its own feed state.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetProps {
    pub is_loading: bool,
    pub is_error: bool,
    pub body: WidgetBody,
}

impl WidgetProps {
    fn from_resource<T>(resource: &AsyncResource<T>, body: WidgetBody) -> Self {
        Self {
            is_loading: resource.is_loading,
            is_error: resource.is_error,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub key: WidgetKind,
    pub renderer: Renderer,
    pub props: WidgetProps,
}

/// Inputs the registry is a pure function of.
pub struct RegistryInputs<'a> {
    pub snapshot: &'a DashboardSnapshot,
    pub mapping: &'a CardGroupMapping,
    pub settings: &'a dyn GroupSettings,
    pub format: &'a NumberFormatter,
}

fn product_rows(products: Option<&[ProductRank]>, fmt: &NumberFormatter) -> Vec<RankRow> {
    products
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, p)| RankRow {
            rank: i + 1,
            name: p.name.clone(),
            detail: fmt.amount(p.quantity),
            amount: fmt.amount(p.amount),
        })
        .collect()
}

fn person_rows(people: Option<&[PersonRank]>, fmt: &NumberFormatter) -> Vec<RankRow> {
    people
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, p)| RankRow {
            rank: i + 1,
            name: p.name.clone(),
            detail: fmt.count(p.invoice_count),
            amount: fmt.amount(p.amount),
        })
        .collect()
}

fn invoice_rows(invoices: Option<&[Invoice]>, fmt: &NumberFormatter) -> Vec<InvoiceRow> {
    invoices
        .unwrap_or_default()
        .iter()
        .map(|invoice| InvoiceRow {
            number: invoice.number.clone(),
            customer: invoice.customer.clone(),
            amount: fmt.amount(invoice.amount),
            due: invoice.due_date.map_or_else(
                || PLACEHOLDER.to_string(),
                |d| fmt.localize(&d.format("%Y-%m-%d").to_string()),
            ),
        })
        .collect()
}

pub fn build_registry(inputs: &RegistryInputs<'_>) -> HashMap<WidgetKind, RegistryEntry> {
    let s = inputs.snapshot;
    let fmt = inputs.format;
    let card_body = |kind: WidgetKind, built: Vec<MetricCard>| {
        WidgetBody::Cards(filter_by_group(
            &built,
            kind.as_str(),
            inputs.mapping,
            inputs.settings,
        ))
    };

    let props = |kind: WidgetKind| -> WidgetProps {
        match kind {
            WidgetKind::SalesRevenue => WidgetProps::from_resource(
                &s.sales,
                card_body(kind, sales_cards(s.sales.data.as_ref(), fmt)),
            ),
            WidgetKind::DebitCredit => WidgetProps::from_resource(
                &s.balances,
                card_body(kind, balance_cards(s.balances.data.as_ref(), fmt)),
            ),
            WidgetKind::Cheques => WidgetProps::from_resource(
                &s.cheques,
                card_body(kind, cheque_cards(s.cheques.data.as_ref(), fmt)),
            ),
            WidgetKind::Funds => WidgetProps::from_resource(
                &s.funds,
                card_body(kind, fund_cards(s.funds.data.as_ref(), fmt)),
            ),
            WidgetKind::CurrencyRates => {
                let rates = s
                    .rates
                    .data
                    .as_ref()
                    .map(|r| r.0.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .map(|rate| {
                        let bucket = classify(rate.code.as_deref());
                        RoutedRate {
                            title: rate.title.clone(),
                            price: fmt.amount(rate.price),
                            change: rate.change_percent.map(|p| fmt.change(p)),
                            bucket,
                            route: bucket.route(),
                        }
                    })
                    .collect();
                WidgetProps::from_resource(&s.rates, WidgetBody::Rates(rates))
            }
            WidgetKind::UnsettledInvoices => {
                let summary = filter_by_group(
                    &invoice_cards(s.invoices.data.as_ref(), fmt),
                    kind.as_str(),
                    inputs.mapping,
                    inputs.settings,
                );
                let invoices = s.invoices.data.as_ref().map(|i| i.0.as_slice());
                WidgetProps::from_resource(
                    &s.invoices,
                    WidgetBody::Invoices {
                        summary,
                        invoices: invoice_rows(invoices, fmt),
                        detail_path: "/invoices/unsettled",
                    },
                )
            }
            WidgetKind::TopSoldProducts => WidgetProps::from_resource(
                &s.top_sold,
                WidgetBody::Ranking {
                    detail_label: "Quantity",
                    rows: product_rows(s.top_sold.data.as_ref().map(|d| d.0.as_slice()), fmt),
                },
            ),
            WidgetKind::TopRevenueProducts => WidgetProps::from_resource(
                &s.top_revenue,
                WidgetBody::Ranking {
                    detail_label: "Quantity",
                    rows: product_rows(s.top_revenue.data.as_ref().map(|d| d.0.as_slice()), fmt),
                },
            ),
            WidgetKind::TopSellers => WidgetProps::from_resource(
                &s.top_sellers,
                WidgetBody::Ranking {
                    detail_label: "Invoices",
                    rows: person_rows(s.top_sellers.data.as_ref().map(|d| d.0.as_slice()), fmt),
                },
            ),
            WidgetKind::TopCustomers => WidgetProps::from_resource(
                &s.top_customers,
                WidgetBody::Ranking {
                    detail_label: "Invoices",
                    rows: person_rows(
                        s.top_customers.data.as_ref().map(|d| d.0.as_slice()),
                        fmt,
                    ),
                },
            ),
        }
    };

    WidgetKind::ALL
        .into_iter()
        .map(|kind| {
            (
                kind,
                RegistryEntry {
                    key: kind,
                    renderer: kind.renderer(),
                    props: props(kind),
                },
            )
        })
        .collect()
}
