pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::customize::CustomizeAction;
use crate::core::compose::build_page;
use crate::core::config::AppConfig;
use crate::core::customization::{CustomizationRepository, CustomizationResolver};
use crate::core::filter::CardGroupMapping;
use crate::core::format::NumberFormatter;
use crate::core::notify::CollectingNotifier;
use crate::core::settings::DisabledGroups;
use crate::core::{DashboardPage, DashboardSnapshot, FeedTransport};
use crate::providers::http::HttpFeedTransport;
use crate::store::{DiskStore, KeyValueStore};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Show,
    Watch,
    Customize(CustomizeAction),
}

/// The dashboard's collaborators, wired from configuration.
pub struct Dashboard {
    pub transport: Arc<dyn FeedTransport>,
    pub notifier: Arc<CollectingNotifier>,
    pub repository: CustomizationRepository,
    pub resolver: CustomizationResolver,
    pub settings: DisabledGroups,
    pub mapping: CardGroupMapping,
    pub format: NumberFormatter,
    pub refresh_interval: Duration,
}

impl Dashboard {
    pub fn new(
        config: &AppConfig,
        transport: Arc<dyn FeedTransport>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let repository = CustomizationRepository::new(store);
        Self {
            transport,
            notifier: Arc::new(CollectingNotifier::default()),
            resolver: CustomizationResolver::new(repository.clone()),
            repository,
            settings: config.group_settings(),
            mapping: config.card_mapping(),
            format: config.number_formatter(),
            refresh_interval: config.refresh_interval(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = HttpFeedTransport::new(&config.api.base_url)?;
        let store_path = config.default_data_path()?.join("store");
        let store = DiskStore::open(&store_path)?;
        Ok(Self::new(config, Arc::new(transport), Arc::new(store)))
    }

    pub fn page(&self, snapshot: &DashboardSnapshot) -> DashboardPage {
        build_page(
            snapshot,
            &self.resolver,
            &self.settings,
            &self.mapping,
            &self.format,
        )
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Home dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let dashboard = Dashboard::from_config(&config)?;

    match command {
        AppCommand::Show => cli::dashboard::show(&dashboard).await,
        AppCommand::Watch => cli::dashboard::watch(&dashboard).await,
        AppCommand::Customize(action) => cli::customize::customize(&dashboard, action).await,
    }
}
