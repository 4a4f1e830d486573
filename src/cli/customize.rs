use super::ui;
use crate::Dashboard;
use crate::core::customization::{CustomizationItem, default_items, items_for, validate_page_names};
use crate::core::feed::fetch_feed;
use crate::core::models::PageNames;
use crate::core::registry::WidgetKind;
use crate::core::resource::FetchOutcome;
use anyhow::{Context, Result, bail};
use comfy_table::Cell;
use std::collections::HashSet;

/// Changes the user can make to the stored customization.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomizeAction {
    Show,
    Set(Vec<String>),
    Hide(String),
    Unhide(String),
    Reset,
}

pub fn display_items(items: &[CustomizationItem]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Sort"),
        ui::header_cell("Page"),
        ui::header_cell("Label"),
        ui::header_cell("Enabled"),
    ]);
    let mut sorted: Vec<_> = items.iter().collect();
    sorted.sort_by_key(|item| item.sort);
    for item in sorted {
        table.add_row(vec![
            Cell::new(item.sort),
            Cell::new(&item.page_name),
            Cell::new(&item.label),
            Cell::new(if item.is_enabled { "yes" } else { "no" }),
        ]);
    }

    let mut output = table.to_string();
    let unknown = validate_page_names(items);
    if !unknown.is_empty() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("Unknown widgets (ignored): {}", unknown.join(", ")),
                ui::StyleType::Warning
            )
        ));
    }
    output
}

/// The list an edit starts from: stored items, else the server defaults.
async fn current_items(dashboard: &Dashboard) -> Result<Vec<CustomizationItem>> {
    if let Some(stored) = dashboard.repository.load() {
        return Ok(stored);
    }
    let transport = dashboard.transport.as_ref();
    let pages = fetch_feed::<PageNames>(transport, dashboard.notifier.as_ref()).await;
    ui::print_messages(dashboard.notifier.drain());
    match pages {
        FetchOutcome::Loaded(Some(pages)) => Ok(default_items(&pages)),
        _ => bail!("Could not load the dashboard pages; nothing was changed"),
    }
}

fn unique_kinds(names: &[String]) -> Result<Vec<WidgetKind>> {
    let mut seen = HashSet::new();
    let mut kinds = Vec::with_capacity(names.len());
    for name in names {
        let kind = name.parse::<WidgetKind>()?;
        if !seen.insert(kind) {
            bail!("Widget listed more than once: {kind}");
        }
        kinds.push(kind);
    }
    Ok(kinds)
}

fn set_enabled(items: &mut [CustomizationItem], page_name: &str, enabled: bool) -> Result<()> {
    let item = items
        .iter_mut()
        .find(|item| item.page_name == page_name)
        .with_context(|| format!("Widget not in the dashboard: {page_name}"))?;
    item.is_enabled = enabled;
    Ok(())
}

pub async fn customize(dashboard: &Dashboard, action: CustomizeAction) -> Result<()> {
    match action {
        CustomizeAction::Show => {
            let items = current_items(dashboard).await?;
            println!("{}", display_items(&items));
        }
        CustomizeAction::Set(names) => {
            if names.is_empty() {
                bail!("At least one widget is required");
            }
            let items = items_for(&unique_kinds(&names)?);
            dashboard.repository.save(&items)?;
            println!("{}", display_items(&items));
        }
        CustomizeAction::Hide(name) => {
            let mut items = current_items(dashboard).await?;
            set_enabled(&mut items, &name, false)?;
            dashboard.repository.save(&items)?;
            println!("{}", display_items(&items));
        }
        CustomizeAction::Unhide(name) => {
            let mut items = current_items(dashboard).await?;
            set_enabled(&mut items, &name, true)?;
            dashboard.repository.save(&items)?;
            println!("{}", display_items(&items));
        }
        CustomizeAction::Reset => {
            dashboard.repository.clear()?;
            println!("Customization cleared; defaults apply");
        }
    }
    dashboard.resolver.invalidate();
    Ok(())
}
