use super::ui;
use crate::Dashboard;
use crate::core::registry::{WidgetBody, WidgetProps};
use crate::core::resource::{DashboardSnapshot, ResourceSet, load_snapshot};
use crate::core::{DashboardPage, Notifier, WidgetInstance};
use anyhow::Result;
use chrono::Local;
use comfy_table::Cell;
use std::sync::Arc;
use tracing::{debug, info};

fn render_body(body: &WidgetBody) -> String {
    let mut table = ui::new_styled_table();
    match body {
        WidgetBody::Cards(cards) => {
            table.set_header(vec![
                ui::header_cell("Metric"),
                ui::header_cell("Value"),
                ui::header_cell("Unit"),
                ui::header_cell("Change"),
            ]);
            for card in cards {
                table.add_row(vec![
                    Cell::new(&card.title),
                    ui::right_cell(&card.value),
                    Cell::new(&card.unit),
                    ui::change_cell(card.change.as_ref()),
                ]);
            }
        }
        WidgetBody::Rates(rates) => {
            table.set_header(vec![
                ui::header_cell("Rate"),
                ui::header_cell("Price"),
                ui::header_cell("Change"),
                ui::header_cell("Details"),
            ]);
            for rate in rates {
                table.add_row(vec![
                    Cell::new(&rate.title),
                    ui::right_cell(&rate.price),
                    ui::change_cell(rate.change.as_ref()),
                    Cell::new(rate.route),
                ]);
            }
        }
        WidgetBody::Ranking { detail_label, rows } => {
            table.set_header(vec![
                ui::header_cell("#"),
                ui::header_cell("Name"),
                ui::header_cell(detail_label),
                ui::header_cell("Amount"),
            ]);
            for row in rows {
                table.add_row(vec![
                    Cell::new(row.rank),
                    Cell::new(&row.name),
                    ui::right_cell(&row.detail),
                    ui::right_cell(&row.amount),
                ]);
            }
        }
        WidgetBody::Invoices {
            summary,
            invoices,
            detail_path,
        } => {
            let totals = summary
                .iter()
                .map(|c| format!("{}: {} {}", c.title, c.value, c.unit).trim().to_string())
                .collect::<Vec<_>>()
                .join("  |  ");
            table.set_header(vec![
                ui::header_cell("Invoice"),
                ui::header_cell("Customer"),
                ui::header_cell("Amount"),
                ui::header_cell("Due"),
            ]);
            for invoice in invoices {
                table.add_row(vec![
                    Cell::new(&invoice.number),
                    Cell::new(&invoice.customer),
                    ui::right_cell(&invoice.amount),
                    Cell::new(&invoice.due),
                ]);
            }
            return format!(
                "{totals}\n{table}\n{}",
                ui::style_text(&format!("More: {detail_path}"), ui::StyleType::Subtle)
            );
        }
    }
    table.to_string()
}

fn render_props(props: &WidgetProps) -> String {
    if props.is_loading {
        return ui::style_text("Loading...", ui::StyleType::Subtle);
    }
    let body = render_body(&props.body);
    if props.is_error {
        format!(
            "{}\n{body}",
            ui::style_text("Failed to refresh; showing last known data", ui::StyleType::Error)
        )
    } else {
        body
    }
}

pub fn render_widget(widget: &WidgetInstance) -> String {
    format!(
        "{}\n\n{}",
        ui::style_text(&widget.label, ui::StyleType::Title),
        render_props(&widget.props)
    )
}

pub fn render_page(page: &DashboardPage) -> String {
    if page.is_loading {
        return ui::style_text("Loading dashboard...", ui::StyleType::Subtle);
    }
    if page.widgets.is_empty() {
        return ui::style_text("No widgets to show", ui::StyleType::Subtle);
    }
    let separator = format!("\n{}\n", ui::separator());
    page.widgets
        .iter()
        .map(render_widget)
        .collect::<Vec<_>>()
        .join(&separator)
}

fn footer(snapshot: &DashboardSnapshot) -> String {
    let updated = snapshot.last_updated().map_or("never".to_string(), |t| {
        t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
    });
    ui::style_text(&format!("Last updated: {updated}"), ui::StyleType::Subtle)
}

/// Fetches every feed once and prints the page.
pub async fn show(dashboard: &Dashboard) -> Result<()> {
    let pb = ui::new_spinner("Loading dashboard...");
    let snapshot = load_snapshot(dashboard.transport.as_ref(), dashboard.notifier.as_ref()).await;
    pb.finish_and_clear();

    let page = dashboard.page(&snapshot);
    debug!(widgets = page.widgets.len(), "Composed page");
    println!("{}", render_page(&page));
    println!("\n{}", footer(&snapshot));
    ui::print_messages(dashboard.notifier.drain());
    Ok(())
}

/// Polls every feed and redraws on each transition until Ctrl-C.
pub async fn watch(dashboard: &Dashboard) -> Result<()> {
    let notifier: Arc<dyn Notifier> = dashboard.notifier.clone();
    let set = ResourceSet::spawn(
        Arc::clone(&dashboard.transport),
        notifier,
        dashboard.refresh_interval,
    );
    let mut rx = set.subscribe();
    let term = console::Term::stdout();

    let draw = |snapshot: &DashboardSnapshot| -> Result<()> {
        term.clear_screen()?;
        println!("{}", render_page(&dashboard.page(snapshot)));
        println!("\n{}", footer(snapshot));
        ui::print_messages(dashboard.notifier.drain());
        Ok(())
    };

    draw(&set.snapshot())?;
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                draw(&snapshot)?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping dashboard");
                break;
            }
        }
    }
    drop(set);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cards::{IconKey, MetricCard};
    use crate::core::filter::CardGroupMapping;
    use crate::core::format::{Locale, NumberFormatter};
    use crate::core::models::{Invoice, UnsettledInvoices};
    use crate::core::registry::{RankRow, RegistryInputs, Renderer, WidgetKind, build_registry};
    use crate::core::resource::FetchOutcome;
    use crate::core::settings::DisabledGroups;
    use chrono::NaiveDate;

    fn widget(is_loading: bool, is_error: bool) -> WidgetInstance {
        WidgetInstance {
            kind: WidgetKind::Funds,
            label: "Available Funds".to_string(),
            renderer: Renderer::CardGrid,
            props: WidgetProps {
                is_loading,
                is_error,
                body: WidgetBody::Cards(vec![MetricCard {
                    title: "Cash".to_string(),
                    value: "1,000".to_string(),
                    unit: "IRR".to_string(),
                    icon: IconKey::Cash,
                    path: "/treasury/cash".to_string(),
                    group: "funds".to_string(),
                    change: Some(NumberFormatter::default().change(2.0)),
                }]),
            },
        }
    }

    #[test]
    fn test_loading_page_hides_widgets() {
        let page = DashboardPage {
            is_loading: true,
            widgets: vec![widget(false, false)],
        };
        let output = render_page(&page);
        assert!(output.contains("Loading dashboard..."));
        assert!(!output.contains("Cash"));
    }

    #[test]
    fn test_widget_shows_own_loading_state() {
        let output = render_widget(&widget(true, false));
        assert!(output.contains("Available Funds"));
        assert!(output.contains("Loading..."));
        assert!(!output.contains("1,000"));
    }

    #[test]
    fn test_widget_renders_cards() {
        let output = render_widget(&widget(false, false));
        assert!(output.contains("Cash"));
        assert!(output.contains("1,000"));
        assert!(output.contains("2.00%"));
    }

    #[test]
    fn test_stale_widget_flags_error() {
        let output = render_widget(&widget(false, true));
        assert!(output.contains("Failed to refresh"));
        assert!(output.contains("1,000"));
    }

    #[test]
    fn test_ranking_body() {
        let output = render_body(&WidgetBody::Ranking {
            detail_label: "Invoices",
            rows: vec![RankRow {
                rank: 1,
                name: "Acme".to_string(),
                detail: "4".to_string(),
                amount: "9,000".to_string(),
            }],
        });
        assert!(output.contains("Acme"));
        assert!(output.contains("Invoices"));
        assert!(output.contains("9,000"));
    }

    #[test]
    fn test_invoice_widget_uses_locale_numerals() {
        let mut snapshot = DashboardSnapshot::default();
        snapshot
            .invoices
            .apply(FetchOutcome::Loaded(Some(UnsettledInvoices(vec![Invoice {
                number: "INV-7".to_string(),
                customer: "Acme".to_string(),
                amount: 1_234_567.0,
                due_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            }]))));
        let registry = build_registry(&RegistryInputs {
            snapshot: &snapshot,
            mapping: &CardGroupMapping::builtin(),
            settings: &DisabledGroups::default(),
            format: &NumberFormatter::new(Locale::Fa, "ریال"),
        });

        let output = render_body(&registry[&WidgetKind::UnsettledInvoices].props.body);
        assert!(output.contains("۱,۲۳۴,۵۶۷"));
        assert!(output.contains("۲۰۲۴-۰۵-۰۱"));
        assert!(!output.contains("1234567"));
    }

    #[test]
    fn test_change_cell_shows_localized_percent() {
        let fa = NumberFormatter::new(Locale::Fa, "ریال");
        let mut table = ui::new_styled_table();
        table.add_row(vec![ui::change_cell(Some(&fa.change(2.5)))]);
        let output = table.to_string();
        assert!(output.contains("۲.۵۰%"));
        assert!(!output.contains("2.50%"));
    }
}
