//! Whether a widget group is enabled, as configured outside the dashboard.

use std::collections::HashSet;

pub trait GroupSettings: Send + Sync {
    fn is_group_enabled(&self, group: &str) -> bool;
}

/// Every group is enabled unless it is listed.
#[derive(Debug, Default, Clone)]
pub struct DisabledGroups {
    groups: HashSet<String>,
}

impl DisabledGroups {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}

impl GroupSettings for DisabledGroups {
    fn is_group_enabled(&self, group: &str) -> bool {
        !self.groups.contains(group)
    }
}
