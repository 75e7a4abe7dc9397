//! Service container and startup wiring
//!
//! Connects MySQL and Redis from [`AppConfig`], builds the adapters and hands
//! them to the core services. One audit service and one clock are shared by
//! every service.

use std::sync::Arc;

use tracing::{error, info, warn};

use rh_core::clock::{Clock, SystemClock};
use rh_core::repositories::LedgerStore;
use rh_core::services::{
    ApiKeyService, AuditService, AuditServiceConfig, CleanupConfig, CredentialCleanupService,
    OAuthService, PermissionResolver, TokenService, TracingAuditSink,
};
use rh_shared::config::AppConfig;

use crate::cache::{RedisClient, RedisLedger};
use crate::database::{
    DatabasePool, MySqlApiKeyRepository, MySqlOAuthRepository, MySqlRoleRepository,
    MySqlUserRepository,
};
use crate::InfrastructureError;

pub type IdentityTokenService = TokenService<MySqlUserRepository>;
pub type IdentityOAuthService = OAuthService<MySqlOAuthRepository, MySqlOAuthRepository>;
pub type IdentityApiKeyService = ApiKeyService<MySqlApiKeyRepository>;
pub type IdentityPermissionResolver = PermissionResolver<MySqlRoleRepository>;
pub type IdentityCleanupService = CredentialCleanupService<MySqlOAuthRepository, MySqlApiKeyRepository>;

/// Refuses configurations that are unsafe for their environment
///
/// Runs before any connection is opened.
fn check_config(config: &AppConfig) -> Result<(), InfrastructureError> {
    if let Err(e) = config.validate() {
        error!(environment = %config.environment, error = %e, "Refusing unsafe configuration");
        return Err(e.into());
    }
    if config.auth.jwt.is_using_default_secret() {
        warn!("Using the development JWT secret");
    }
    Ok(())
}

/// Fully wired identity services
#[derive(Clone)]
pub struct IdentityServices {
    pub database: DatabasePool,
    pub redis: RedisClient,
    pub tokens: Arc<IdentityTokenService>,
    pub oauth: Arc<IdentityOAuthService>,
    pub api_keys: Arc<IdentityApiKeyService>,
    pub permissions: Arc<IdentityPermissionResolver>,
    pub cleanup: Arc<IdentityCleanupService>,
}

impl IdentityServices {
    /// Connect to the stores and build every service
    pub async fn connect(config: &AppConfig) -> Result<Self, InfrastructureError> {
        info!(environment = %config.environment, "Initializing identity services");
        check_config(config)?;

        let database = DatabasePool::new(&config.database).await?;
        let redis = RedisClient::new(config.cache.clone()).await?;

        let services = Self::assemble(config, database, redis, Arc::new(SystemClock))?;
        info!("Identity services initialized successfully");
        Ok(services)
    }

    /// Build the services on top of existing connections
    pub fn assemble(
        config: &AppConfig,
        database: DatabasePool,
        redis: RedisClient,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, InfrastructureError> {
        check_config(config)?;
        let pool = database.get_pool().clone();
        let ledger: Arc<dyn LedgerStore> = Arc::new(RedisLedger::new(redis.clone()));
        let audit = AuditService::new(Arc::new(TracingAuditSink), AuditServiceConfig::default());

        let users = Arc::new(MySqlUserRepository::new(pool.clone()));
        let oauth_repository = Arc::new(MySqlOAuthRepository::new(pool.clone()));
        let api_key_repository = Arc::new(MySqlApiKeyRepository::new(pool.clone()));
        let roles = Arc::new(MySqlRoleRepository::new(pool));

        let tokens = TokenService::new(
            &config.auth.jwt,
            ledger.clone(),
            users,
            clock.clone(),
            audit.clone(),
        )
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;

        let oauth = OAuthService::new(
            oauth_repository.clone(),
            oauth_repository.clone(),
            ledger.clone(),
            clock.clone(),
            audit.clone(),
            config.auth.oauth.clone(),
        );

        let api_keys = ApiKeyService::new(
            api_key_repository.clone(),
            clock.clone(),
            audit.clone(),
            config.auth.api_keys.clone(),
        );

        let permissions = PermissionResolver::new(
            roles,
            ledger,
            clock.clone(),
            audit,
            config.auth.permissions.clone(),
        );

        let cleanup = CredentialCleanupService::new(
            oauth_repository,
            api_key_repository,
            clock,
            CleanupConfig {
                api_key_retention_days: config.auth.api_keys.retention_days,
                ..CleanupConfig::default()
            },
        );

        Ok(Self {
            database,
            redis,
            tokens: Arc::new(tokens),
            oauth: Arc::new(oauth),
            api_keys: Arc::new(api_keys),
            permissions: Arc::new(permissions),
            cleanup: Arc::new(cleanup),
        })
    }

    /// Both stores answer their health probes
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let database = self.database.health_check().await?;
        let cache = self.redis.health_check().await?;
        Ok(database && cache)
    }
}
