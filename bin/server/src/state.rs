//! Shared application state.

use crate::config::{RegistryConfig, ServerConfig, StorageBackend};
use crate::db::{PgObjectStore, PgPrivacyStore, PgRelationshipStore};
use crate::identity::UserIdResolver;
use crate::objects::{InMemoryObjectStore, ObjectDirectory, ObjectStore};
use rootcause::Report;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tether_core::Result;
use tether_authz::{AuthzChecker, IdentityResolver};
use tether_privacy::{InMemoryPrivacyStore, PrivacyRegistry, PrivacyStore};
use tether_relations::{InMemoryRelationshipStore, RelationshipRegistry, RelationshipStore};

/// State shared by every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Relationship registry.
    pub relations: RelationshipRegistry,
    /// Privacy-attribute registry.
    pub privacy: PrivacyRegistry,
    /// Checker over both registries.
    pub checker: AuthzChecker,
    /// Resolves user handles in request bodies and paths.
    pub identities: Arc<dyn IdentityResolver>,
    /// Owners of protected objects.
    pub objects: ObjectDirectory,
}

impl AppState {
    /// Creates state over the given stores.
    pub fn new(
        relationship_store: Arc<dyn RelationshipStore>,
        privacy_store: Arc<dyn PrivacyStore>,
        object_store: Arc<dyn ObjectStore>,
        registry: &RegistryConfig,
    ) -> Self {
        let relations =
            RelationshipRegistry::new(relationship_store).with_unique_names(registry.unique_names);
        let privacy = PrivacyRegistry::new(privacy_store).with_unique_names(registry.unique_names);
        Self {
            checker: AuthzChecker::new(relations.clone(), privacy.clone()),
            relations,
            privacy,
            identities: Arc::new(UserIdResolver),
            objects: ObjectDirectory::new(object_store),
        }
    }

    /// Creates state over fresh in-memory stores.
    pub fn in_memory(registry: &RegistryConfig) -> Self {
        Self::new(
            InMemoryRelationshipStore::shared(),
            InMemoryPrivacyStore::shared(),
            InMemoryObjectStore::shared(),
            registry,
        )
    }

    /// Connects the configured storage backend and builds the state.
    ///
    /// For PostgreSQL this also runs pending migrations.
    pub async fn connect(config: &ServerConfig) -> Result<Self, StartupError> {
        match config.storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Ok(Self::in_memory(&config.registry))
            }
            StorageBackend::Postgres => {
                let url = config
                    .storage
                    .database_url
                    .as_deref()
                    .ok_or_else(|| StartupError::MissingDatabaseUrl.report())?;

                let pool = PgPoolOptions::new()
                    .max_connections(config.storage.max_connections)
                    .connect(url)
                    .await
                    .map_err(|e| StartupError::Database(e).report())?;

                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| StartupError::Migration(e).report())?;

                Ok(Self::new(
                    Arc::new(PgRelationshipStore::new(pool.clone())),
                    Arc::new(PgPrivacyStore::new(pool.clone())),
                    Arc::new(PgObjectStore::new(pool)),
                    &config.registry,
                ))
            }
        }
    }
}

/// Errors raised while building the application state.
#[derive(Debug)]
pub enum StartupError {
    /// The postgres backend was selected without `storage.database_url`.
    MissingDatabaseUrl,
    /// Connecting to the database failed.
    Database(sqlx::Error),
    /// Applying migrations failed.
    Migration(sqlx::migrate::MigrateError),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDatabaseUrl => {
                write!(f, "storage.database_url is required for the postgres backend")
            }
            Self::Database(e) => write!(f, "failed to connect to database: {e}"),
            Self::Migration(e) => write!(f, "failed to run migrations: {e}"),
        }
    }
}

impl std::error::Error for StartupError {}

impl StartupError {
    fn report(self) -> Report<StartupError> {
        self.into()
    }
}
