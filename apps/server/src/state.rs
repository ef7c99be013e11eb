//! Shared application state

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    auth::AuthManager,
    authorize::{PermissionEvaluator, PermissionGate, ResourcePolicyEvaluator},
    config::{Config, DatabaseBackend},
    converter::ConverterService,
    db::{MemoryPersistence, Persistence, PostgresPersistence},
    repository::Registry,
    services::Services,
    Result,
};

/// Shared application state passed to all handlers. Immutable once built.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthManager>,
    pub store: Arc<dyn Persistence>,
    pub gate: PermissionGate,
    pub converter: Arc<ConverterService>,
    pub registry: Arc<Registry>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let store: Arc<dyn Persistence> = match config.database.backend {
            DatabaseBackend::Postgres => {
                let pool = create_db_pool(&config).await?;
                if config.database.run_migrations {
                    tracing::info!("Running database migrations...");
                    sqlx::migrate!("./migrations").run(&pool).await?;
                }
                Arc::new(PostgresPersistence::new(pool))
            }
            DatabaseBackend::Memory => {
                let store = match &config.database.seed_file {
                    Some(path) => {
                        tracing::info!(seed_file = %path, "Loading in-memory store");
                        MemoryPersistence::from_seed_file(path)?
                    }
                    None => {
                        tracing::warn!("Memory backend without seed_file; the store is empty");
                        MemoryPersistence::new()
                    }
                };
                Arc::new(store)
            }
        };

        let evaluator = Arc::new(ResourcePolicyEvaluator::new(store.clone()));
        Ok(Self::with_components(config, store, evaluator))
    }

    /// Assemble the state over an existing store and permission evaluator.
    pub fn with_components(
        config: Config,
        store: Arc<dyn Persistence>,
        evaluator: Arc<dyn PermissionEvaluator>,
    ) -> Self {
        let config = Arc::new(config);
        let auth = Arc::new(AuthManager::new(Arc::new(config.auth.clone())));
        let gate = PermissionGate::new(evaluator);
        let converter = Arc::new(ConverterService::new(&config.rest.base_url));
        let services = Services::new(store.clone(), &config);
        let registry = Arc::new(Registry::standard(
            &services,
            gate.clone(),
            converter.clone(),
            &config,
        ));

        Self {
            config,
            auth,
            store,
            gate,
            converter,
            registry,
        }
    }
}

async fn create_db_pool(config: &Config) -> Result<PgPool> {
    tracing::info!("Creating database connection pool...");

    let statement_timeout = config.database.statement_timeout_seconds;
    let lock_timeout = config.database.lock_timeout_seconds;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .min_connections(config.database.pool_min_size)
        .max_connections(config.database.pool_max_size)
        .acquire_timeout(std::time::Duration::from_secs(
            config.database.pool_timeout_seconds,
        ))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query(&format!("SET statement_timeout = '{statement_timeout}s'"))
                    .execute(&mut *conn)
                    .await?;
                sqlx::query(&format!("SET lock_timeout = '{lock_timeout}s'"))
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database.url)
        .await?;

    tracing::info!(
        min = config.database.pool_min_size,
        max = config.database.pool_max_size,
        "Database pool created"
    );

    Ok(pool)
}
