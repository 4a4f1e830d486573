//! Resolves the ordered list of widgets from the user's stored customization
//! or, when none is stored, from the server's page-name registry.

use crate::core::models::PageNames;
use crate::core::registry::{WidgetKind, label_for};
use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Storage key of the persisted customization list.
pub const CUSTOMIZATION_KEY: &str = "homeCustomization";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationItem {
    pub page_id: String,
    pub page_name: String,
    pub label: String,
    pub is_enabled: bool,
    pub sort: i64,
}

/// Loads and saves the customization list through a key-value store.
#[derive(Clone)]
pub struct CustomizationRepository {
    store: Arc<dyn KeyValueStore>,
}

impl CustomizationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the stored list, or `None` when nothing usable is stored.
    /// A value that fails to parse is treated as absent.
    pub fn load(&self) -> Option<Vec<CustomizationItem>> {
        let raw = match self.store.get(CUSTOMIZATION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read stored customization: {:#}", e);
                return None;
            }
        };
        match serde_json::from_str::<Vec<CustomizationItem>>(&raw) {
            Ok(items) => Some(items),
            Err(e) => {
                warn!("Ignoring corrupt stored customization: {}", e);
                None
            }
        }
    }

    pub fn save(&self, items: &[CustomizationItem]) -> Result<()> {
        let raw = serde_json::to_string(items).context("Failed to serialize customization")?;
        self.store
            .set(CUSTOMIZATION_KEY, &raw)
            .context("Failed to store customization")
    }

    pub fn clear(&self) -> Result<()> {
        self.store
            .remove(CUSTOMIZATION_KEY)
            .context("Failed to clear customization")
    }
}

/// The default list: registry enumeration order, everything enabled.
pub fn default_items(pages: &PageNames) -> Vec<CustomizationItem> {
    pages
        .0
        .iter()
        .enumerate()
        .map(|(index, page)| CustomizationItem {
            page_id: page.id.clone(),
            page_name: page.name.clone(),
            label: label_for(&page.name),
            is_enabled: true,
            sort: index as i64,
        })
        .collect()
}

/// An ordering built from widget kinds, used when the user sets an order
/// directly.
pub fn items_for(kinds: &[WidgetKind]) -> Vec<CustomizationItem> {
    kinds
        .iter()
        .enumerate()
        .map(|(index, kind)| CustomizationItem {
            page_id: kind.as_str().to_string(),
            page_name: kind.as_str().to_string(),
            label: kind.default_label().to_string(),
            is_enabled: true,
            sort: index as i64,
        })
        .collect()
}

/// Page names that do not correspond to any known widget.
pub fn validate_page_names(items: &[CustomizationItem]) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.page_name.parse::<WidgetKind>().is_err())
        .map(|item| item.page_name.clone())
        .collect()
}

struct Memo {
    pages: Option<PageNames>,
    items: Vec<CustomizationItem>,
}

/// Resolves the customization list, memoized per page-name registry value.
pub struct CustomizationResolver {
    repository: CustomizationRepository,
    memo: Mutex<Option<Memo>>,
}

impl CustomizationResolver {
    pub fn new(repository: CustomizationRepository) -> Self {
        Self {
            repository,
            memo: Mutex::new(None),
        }
    }

    /// A stored list wins verbatim; no merge with newer registry entries.
    /// Otherwise the default list is derived from `pages`.
    pub fn resolve(&self, pages: Option<&PageNames>) -> Vec<CustomizationItem> {
        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = memo.as_ref()
            && cached.pages.as_ref() == pages
        {
            return cached.items.clone();
        }

        let items = match self.repository.load() {
            Some(stored) => {
                debug!(count = stored.len(), "Using stored customization");
                stored
            }
            None => pages.map(default_items).unwrap_or_default(),
        };
        *memo = Some(Memo {
            pages: pages.cloned(),
            items: items.clone(),
        });
        items
    }

    /// Drops the memoized list so the next resolve re-reads storage.
    pub fn invalidate(&self) {
        *self.memo.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
