use crate::cli::ServeArgs;
use crate::infra::{AppState, FileHouseholdRepository, InMemoryHouseholdRepository};
use crate::routes::with_screening_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use benefit_screener::config::{AppConfig, StoreConfig};
use benefit_screener::error::AppError;
use benefit_screener::telemetry;
use benefit_screener::workflows::screening::{
    Client, ClientId, HouseholdMember, HouseholdRepository, RepositoryError, ScreeningService,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Record store selected from configuration.
pub(crate) enum HouseholdStore {
    Memory(InMemoryHouseholdRepository),
    File(FileHouseholdRepository),
}

impl HouseholdStore {
    pub(crate) fn from_config(config: &StoreConfig) -> Self {
        match &config.data_dir {
            Some(dir) => Self::File(FileHouseholdRepository::new(dir.clone())),
            None => Self::Memory(InMemoryHouseholdRepository::default()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::File(store) => store.root().display().to_string(),
        }
    }
}

impl HouseholdRepository for HouseholdStore {
    fn load_client(&self, client_id: &ClientId) -> Result<Client, RepositoryError> {
        match self {
            Self::Memory(store) => store.load_client(client_id),
            Self::File(store) => store.load_client(client_id),
        }
    }

    fn load_household(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        match self {
            Self::Memory(store) => store.load_household(client_id),
            Self::File(store) => store.load_household(client_id),
        }
    }

    fn save_household(
        &self,
        client_id: &ClientId,
        members: Vec<HouseholdMember>,
    ) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(store) => store.save_household(client_id, members),
            Self::File(store) => store.save_household(client_id, members),
        }
    }
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let rules = config.screening_rules()?;
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = HouseholdStore::from_config(&config.store);
    let store_location = store.describe();
    let screening_service = Arc::new(ScreeningService::new(Arc::new(store), rules));

    let app = with_screening_routes(screening_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, store = %store_location, "benefit screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
