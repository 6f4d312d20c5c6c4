//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an environment overlay, and `SEATBOOK__*`
//! environment variables. Each sub-module is one configuration section.

pub mod app;
pub mod auth;
pub mod booking;
pub mod ledger;
pub mod lock_store;
pub mod logging;
pub mod realtime;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::booking::{BookingConfig, InventoryConfig, ItineraryConfig, MAX_HOLD_TTL_SECONDS};
pub use self::ledger::{DatabaseConfig, LedgerConfig};
pub use self::lock_store::{LockStoreConfig, RedisLockConfig};
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SEATBOOK";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Lock store settings.
    #[serde(default)]
    pub lock_store: LockStoreConfig,
    /// Booking ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Hold and confirmation settings.
    #[serde(default)]
    pub booking: BookingConfig,
    /// Fixed seat inventory.
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// Real-time WebSocket settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, the `config/{env}` overlay, and environment
    /// variables such as `SEATBOOK__LOCK_STORE__PROVIDER=redis`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the coordination layer cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.inventory.coaches == 0 || self.inventory.seats_per_coach == 0 {
            return Err(AppError::configuration(
                "inventory must contain at least one coach and one seat",
            ));
        }
        if self.booking.hold_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "booking.hold_ttl_seconds must be greater than zero",
            ));
        }
        if self.booking.hold_ttl_seconds > MAX_HOLD_TTL_SECONDS {
            return Err(AppError::configuration(format!(
                "booking.hold_ttl_seconds must not exceed {MAX_HOLD_TTL_SECONDS}"
            )));
        }
        if self.worker.reconcile_interval_seconds == 0 {
            return Err(AppError::configuration(
                "worker.reconcile_interval_seconds must be greater than zero",
            ));
        }
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        Ok(())
    }
}
