use crate::{services, settings::Settings};
use actix_web::web;
use blockscout_service_launcher::{database, launcher, launcher::LaunchSettings};
use chain_metrics_logic::Normalizer;
use migration::Migrator;
use sea_orm::DatabaseConnection;

const SERVICE_NAME: &str = "chain_metrics";

pub struct AppState {
    pub db: DatabaseConnection,
    pub normalizer: Normalizer,
    pub default_lookback_days: u32,
}

impl AppState {
    pub fn new(db: DatabaseConnection, settings: &Settings) -> Self {
        Self {
            db,
            normalizer: Normalizer::new(settings.normalizer.clone()),
            default_lookback_days: settings.trend.default_lookback_days,
        }
    }
}

#[derive(Clone)]
struct Router {
    state: web::Data<AppState>,
}

impl Router {
    pub fn grpc_router(&self) -> tonic::transport::server::Router {
        let (_, health) = tonic_health::server::health_reporter();
        tonic::transport::Server::builder().add_service(health)
    }
}

impl launcher::HttpRouter for Router {
    fn register_routes(&self, service_config: &mut web::ServiceConfig) {
        http_configure(service_config, self.state.clone());
    }
}

pub fn http_configure(config: &mut web::ServiceConfig, state: web::Data<AppState>) {
    config
        .app_data(state)
        .route("/health", web::get().to(services::health))
        .service(
            web::scope("/api/v1")
                .route("/series:normalize", web::post().to(services::normalize))
                .service(
                    web::resource("/snapshots/{series}")
                        .route(web::post().to(services::record_snapshot))
                        .route(web::get().to(services::list_snapshots)),
                )
                .route("/snapshots/{series}/trend", web::get().to(services::trend)),
        );
}

pub async fn run(settings: Settings) -> Result<(), anyhow::Error> {
    blockscout_service_launcher::tracing::init_logs(
        SERVICE_NAME,
        &settings.tracing,
        &settings.jaeger,
    )?;

    let db = database::initialize_postgres::<Migrator>(&settings.database).await?;
    let router = Router {
        state: web::Data::new(AppState::new(db, &settings)),
    };

    let grpc_router = router.grpc_router();
    let http_router = router;

    let launch_settings = LaunchSettings {
        service_name: SERVICE_NAME.to_string(),
        server: settings.server,
        metrics: settings.metrics,
        graceful_shutdown: Default::default(),
    };

    launcher::launch(launch_settings, http_router, grpc_router).await
}
