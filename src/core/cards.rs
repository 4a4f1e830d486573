//! Builders that turn feed payloads into uniform metric cards.
//!
//! Every builder is total: a missing payload yields the same card titles
//! with a placeholder value, so the layout does not jump while a feed loads.

use crate::core::format::{Change, NumberFormatter};
use crate::core::models::{
    AvailableFunds, DebitCredit, NearDueCheques, SalesTotals, UnsettledInvoices,
};
use crate::core::registry::WidgetKind;

pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKey {
    Sales,
    Revenue,
    Invoice,
    Returns,
    Debit,
    Credit,
    Balance,
    Cheque,
    Cash,
    Bank,
    Wallet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub unit: String,
    pub icon: IconKey,
    pub path: String,
    pub group: String,
    pub change: Option<Change>,
}

struct CardSpec {
    title: &'static str,
    icon: IconKey,
    path: &'static str,
}

fn card(
    group: WidgetKind,
    spec: CardSpec,
    value: Option<String>,
    unit: String,
    change: Option<Change>,
) -> MetricCard {
    MetricCard {
        title: spec.title.to_string(),
        value: value.unwrap_or_else(|| PLACEHOLDER.to_string()),
        unit,
        icon: spec.icon,
        path: spec.path.to_string(),
        group: group.as_str().to_string(),
        change,
    }
}

pub fn sales_cards(data: Option<&SalesTotals>, fmt: &NumberFormatter) -> Vec<MetricCard> {
    let group = WidgetKind::SalesRevenue;
    vec![
        card(
            group,
            CardSpec {
                title: "Total Sales",
                icon: IconKey::Sales,
                path: "/reports/sales",
            },
            data.map(|d| fmt.amount(d.total_sales)),
            fmt.unit(),
            data.and_then(|d| d.sales_change_percent).map(|p| fmt.change(p)),
        ),
        card(
            group,
            CardSpec {
                title: "Sales Revenue",
                icon: IconKey::Revenue,
                path: "/reports/revenue",
            },
            data.map(|d| fmt.amount(d.total_revenue)),
            fmt.unit(),
            data.and_then(|d| d.revenue_change_percent).map(|p| fmt.change(p)),
        ),
        card(
            group,
            CardSpec {
                title: "Invoice Count",
                icon: IconKey::Invoice,
                path: "/invoices",
            },
            data.map(|d| fmt.count(d.invoice_count)),
            String::new(),
            None,
        ),
        card(
            group,
            CardSpec {
                title: "Returns",
                icon: IconKey::Returns,
                path: "/reports/returns",
            },
            data.map(|d| fmt.amount(d.returns)),
            fmt.unit(),
            None,
        ),
    ]
}

pub fn balance_cards(data: Option<&DebitCredit>, fmt: &NumberFormatter) -> Vec<MetricCard> {
    let group = WidgetKind::DebitCredit;
    vec![
        card(
            group,
            CardSpec {
                title: "Receivables",
                icon: IconKey::Debit,
                path: "/reports/debit-credit",
            },
            data.map(|d| fmt.amount(d.total_debit)),
            fmt.unit(),
            None,
        ),
        card(
            group,
            CardSpec {
                title: "Payables",
                icon: IconKey::Credit,
                path: "/reports/debit-credit",
            },
            data.map(|d| fmt.amount(d.total_credit)),
            fmt.unit(),
            None,
        ),
        card(
            group,
            CardSpec {
                title: "Net Balance",
                icon: IconKey::Balance,
                path: "/reports/debit-credit",
            },
            data.map(|d| fmt.amount(d.total_debit - d.total_credit)),
            fmt.unit(),
            None,
        ),
    ]
}

pub fn cheque_cards(data: Option<&NearDueCheques>, fmt: &NumberFormatter) -> Vec<MetricCard> {
    let group = WidgetKind::Cheques;
    let count_unit = |count: u64| fmt.localize(&format!("{} cheques", fmt.count(count)));
    vec![
        card(
            group,
            CardSpec {
                title: "Receivable Cheques",
                icon: IconKey::Cheque,
                path: "/treasury/cheques/receivable",
            },
            data.map(|d| fmt.amount(d.receivable_amount)),
            data.map_or_else(String::new, |d| count_unit(d.receivable_count)),
            None,
        ),
        card(
            group,
            CardSpec {
                title: "Payable Cheques",
                icon: IconKey::Cheque,
                path: "/treasury/cheques/payable",
            },
            data.map(|d| fmt.amount(d.payable_amount)),
            data.map_or_else(String::new, |d| count_unit(d.payable_count)),
            None,
        ),
    ]
}

pub fn fund_cards(data: Option<&AvailableFunds>, fmt: &NumberFormatter) -> Vec<MetricCard> {
    let group = WidgetKind::Funds;
    vec![
        card(
            group,
            CardSpec {
                title: "Cash",
                icon: IconKey::Cash,
                path: "/treasury/cash",
            },
            data.map(|d| fmt.amount(d.cash)),
            fmt.unit(),
            None,
        ),
        card(
            group,
            CardSpec {
                title: "Bank",
                icon: IconKey::Bank,
                path: "/treasury/bank",
            },
            data.map(|d| fmt.amount(d.bank)),
            fmt.unit(),
            None,
        ),
        card(
            group,
            CardSpec {
                title: "Petty Cash",
                icon: IconKey::Wallet,
                path: "/treasury/petty-cash",
            },
            data.map(|d| fmt.amount(d.petty_cash)),
            fmt.unit(),
            None,
        ),
        card(
            group,
            CardSpec {
                title: "Total Funds",
                icon: IconKey::Wallet,
                path: "/treasury",
            },
            data.map(|d| fmt.amount(d.total())),
            fmt.unit(),
            None,
        ),
    ]
}

pub fn invoice_cards(data: Option<&UnsettledInvoices>, fmt: &NumberFormatter) -> Vec<MetricCard> {
    let group = WidgetKind::UnsettledInvoices;
    vec![
        card(
            group,
            CardSpec {
                title: "Unsettled Invoices",
                icon: IconKey::Invoice,
                path: "/invoices/unsettled",
            },
            data.map(|d| fmt.count(d.0.len() as u64)),
            String::new(),
            None,
        ),
        card(
            group,
            CardSpec {
                title: "Unsettled Amount",
                icon: IconKey::Invoice,
                path: "/invoices/unsettled",
            },
            data.map(|d| fmt.amount(d.total_amount())),
            fmt.unit(),
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(cards: &[MetricCard]) -> Vec<&str> {
        cards.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_missing_data_yields_placeholder_cards() {
        let fmt = NumberFormatter::default();
        let loaded = SalesTotals {
            total_sales: 1500.0,
            total_revenue: 300.0,
            invoice_count: 12,
            returns: 0.0,
            sales_change_percent: Some(4.2),
            revenue_change_percent: None,
        };

        let empty = sales_cards(None, &fmt);
        let full = sales_cards(Some(&loaded), &fmt);

        assert_eq!(titles(&empty), titles(&full));
        assert!(empty.iter().all(|c| c.value == PLACEHOLDER));
        assert!(empty.iter().all(|c| c.change.is_none()));
        assert_eq!(full[0].value, "1,500");
        assert_eq!(full[0].change.as_ref().map(|c| c.text.as_str()), Some("4.20%"));
        assert_eq!(full[2].value, "12");
    }

    #[test]
    fn test_cards_carry_their_group() {
        let fmt = NumberFormatter::default();
        assert!(balance_cards(None, &fmt).iter().all(|c| c.group == "debitcredit"));
        assert!(fund_cards(None, &fmt).iter().all(|c| c.group == "funds"));
        assert!(cheque_cards(None, &fmt).iter().all(|c| c.group == "cheques"));
        assert!(
            invoice_cards(None, &fmt)
                .iter()
                .all(|c| c.group == "unsettledinvoices")
        );
    }

    #[test]
    fn test_balance_net() {
        let fmt = NumberFormatter::default();
        let cards = balance_cards(
            Some(&DebitCredit {
                total_debit: 5000.0,
                total_credit: 7000.0,
            }),
            &fmt,
        );
        assert_eq!(cards[2].title, "Net Balance");
        assert_eq!(cards[2].value, "-2,000");
    }

    #[test]
    fn test_cheque_unit_shows_count() {
        let fmt = NumberFormatter::default();
        let cards = cheque_cards(
            Some(&NearDueCheques {
                receivable_count: 3,
                receivable_amount: 900.0,
                payable_count: 1,
                payable_amount: 100.0,
            }),
            &fmt,
        );
        assert_eq!(cards[0].unit, "3 cheques");
        assert_eq!(cards[1].value, "100");
    }
}
