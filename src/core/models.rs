//! Payload types carried in the `Data` field of each feed's envelope.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesTotals {
    pub total_sales: f64,
    pub total_revenue: f64,
    pub invoice_count: u64,
    #[serde(default)]
    pub returns: f64,
    pub sales_change_percent: Option<f64>,
    pub revenue_change_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DebitCredit {
    pub total_debit: f64,
    pub total_credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NearDueCheques {
    pub receivable_count: u64,
    pub receivable_amount: f64,
    pub payable_count: u64,
    pub payable_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AvailableFunds {
    pub cash: f64,
    pub bank: f64,
    #[serde(default)]
    pub petty_cash: f64,
}

impl AvailableFunds {
    pub fn total(&self) -> f64 {
        self.cash + self.bank + self.petty_cash
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrencyRate {
    pub code: Option<String>,
    pub title: String,
    pub price: f64,
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyRates(pub Vec<CurrencyRate>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    pub number: String,
    pub customer: String,
    pub amount: f64,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnsettledInvoices(pub Vec<Invoice>);

impl UnsettledInvoices {
    pub fn total_amount(&self) -> f64 {
        self.0.iter().map(|i| i.amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductRank {
    pub name: String,
    pub quantity: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopSoldProducts(pub Vec<ProductRank>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopRevenueProducts(pub Vec<ProductRank>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonRank {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub invoice_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopSellers(pub Vec<PersonRank>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopCustomers(pub Vec<PersonRank>);

/// One entry of the server's page-name registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageName {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNames(pub Vec<PageName>);
