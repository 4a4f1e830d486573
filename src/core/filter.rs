//! Restricts which metric cards each widget group surfaces.

use crate::core::cards::MetricCard;
use crate::core::settings::GroupSettings;
use std::collections::HashMap;

/// `group -> allow-listed card titles`. A group without an entry is not
/// restricted; a group with an empty list shows nothing.
#[derive(Debug, Clone, Default)]
pub struct CardGroupMapping {
    groups: HashMap<String, Vec<String>>,
}

impl CardGroupMapping {
    pub fn builtin() -> Self {
        let table: [(&str, &[&str]); 3] = [
            ("salesrevenue", &["Total Sales", "Sales Revenue", "Returns"]),
            ("debitcredit", &["Receivables", "Payables", "Net Balance"]),
            ("funds", &["Cash", "Bank", "Total Funds"]),
        ];
        Self {
            groups: table
                .into_iter()
                .map(|(group, titles)| {
                    (
                        group.to_string(),
                        titles.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Replaces the allow-list of every group named in `overrides`.
    pub fn with_overrides(mut self, overrides: &HashMap<String, Vec<String>>) -> Self {
        for (group, titles) in overrides {
            self.groups.insert(group.clone(), titles.clone());
        }
        self
    }

    pub fn allow_list(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }
}

pub fn filter_by_group(
    cards: &[MetricCard],
    group: &str,
    mapping: &CardGroupMapping,
    settings: &dyn GroupSettings,
) -> Vec<MetricCard> {
    if !settings.is_group_enabled(group) {
        return Vec::new();
    }
    match mapping.allow_list(group) {
        None => cards.to_vec(),
        Some(allowed) => cards
            .iter()
            .filter(|card| allowed.iter().any(|title| *title == card.title))
            .cloned()
            .collect(),
    }
}
