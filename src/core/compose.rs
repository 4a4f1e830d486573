//! Composition of the page: ordering, lookup and the readiness gate.

use crate::core::customization::{CustomizationItem, CustomizationResolver};
use crate::core::filter::CardGroupMapping;
use crate::core::format::NumberFormatter;
use crate::core::registry::{
    RegistryEntry, RegistryInputs, Renderer, WidgetKind, WidgetProps, build_registry,
};
use crate::core::resource::DashboardSnapshot;
use crate::core::settings::GroupSettings;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetInstance {
    pub kind: WidgetKind,
    pub label: String,
    pub renderer: Renderer,
    pub props: WidgetProps,
}

/// Renders `order` by ascending `sort` (ties keep list order).
///
/// An entry is skipped without any trace when its page name has no registry
/// entry, when it is disabled in the stored list, or when its group is
/// disabled in settings.
pub fn compose(
    order: &[CustomizationItem],
    registry: &HashMap<WidgetKind, RegistryEntry>,
    settings: &dyn GroupSettings,
) -> Vec<WidgetInstance> {
    let mut sorted: Vec<&CustomizationItem> = order.iter().collect();
    sorted.sort_by_key(|item| item.sort);

    sorted
        .into_iter()
        .filter(|item| item.is_enabled && settings.is_group_enabled(&item.page_name))
        .filter_map(|item| {
            let kind = item.page_name.parse::<WidgetKind>().ok()?;
            let entry = registry.get(&kind)?;
            Some(WidgetInstance {
                kind,
                label: item.label.clone(),
                renderer: entry.renderer,
                props: entry.props.clone(),
            })
        })
        .collect()
}

/// True only while every feed is still loading; one settled feed is enough
/// to render the page.
pub fn is_page_loading(flags: &[bool]) -> bool {
    flags.iter().all(|loading| *loading)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPage {
    pub is_loading: bool,
    pub widgets: Vec<WidgetInstance>,
}

/// Runs the full pipeline for one snapshot.
pub fn build_page(
    snapshot: &DashboardSnapshot,
    resolver: &CustomizationResolver,
    settings: &dyn GroupSettings,
    mapping: &CardGroupMapping,
    format: &NumberFormatter,
) -> DashboardPage {
    let order = resolver.resolve(snapshot.pages.data.as_ref());
    let registry = build_registry(&RegistryInputs {
        snapshot,
        mapping,
        settings,
        format,
    });
    DashboardPage {
        is_loading: is_page_loading(&snapshot.loading_flags()),
        widgets: compose(&order, &registry, settings),
    }
}
