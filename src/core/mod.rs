//! Core dashboard composition logic

pub mod cards;
pub mod compose;
pub mod config;
pub mod currency;
pub mod customization;
pub mod envelope;
pub mod feed;
pub mod filter;
pub mod format;
pub mod log;
pub mod models;
pub mod notify;
pub mod registry;
pub mod resource;
pub mod settings;

// Re-export main types for cleaner imports
pub use cards::{IconKey, MetricCard};
pub use compose::{DashboardPage, WidgetInstance, build_page, compose, is_page_loading};
pub use customization::{CustomizationItem, CustomizationRepository, CustomizationResolver};
pub use envelope::Envelope;
pub use feed::{Feed, FeedId, FeedTransport};
pub use notify::Notifier;
pub use registry::{RegistryEntry, Renderer, WidgetKind, WidgetProps};
pub use resource::{AsyncResource, DashboardSnapshot};
pub use settings::GroupSettings;
