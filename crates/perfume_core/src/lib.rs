//! Business core of the perfume back office.
//! This crate owns validation, authorization and catalog orchestration.

pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{config_from_env, load_config, ConfigError, CoreConfig};
pub use context::CoreContext;
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::account::{fold_email, Account, AccountRole};
pub use model::manufacturer::Manufacturer;
pub use model::perfume::{IngredientGroup, Perfume, PerfumeId, PerfumeView};
pub use model::session::Session;
pub use repo::account_repo::{authenticate_account, SqliteAccountRepository};
pub use repo::manufacturer_repo::{list_manufacturers_sorted, SqliteManufacturerRepository};
pub use repo::perfume_repo::{
    list_perfumes_with_manufacturer, search_perfumes, SqlitePerfumeRepository,
};
pub use repo::unit_of_work::UnitOfWork;
pub use repo::{RepoError, RepoResult, Repository};
pub use service::auth_service::{can_mutate, can_read, AuthService};
pub use service::catalog_service::{
    group_views_by_ingredients, CatalogError, CatalogResult, CatalogService, OperationResult,
    SearchOutcome,
};
pub use service::manufacturer_service::ManufacturerService;
pub use validation::{validate_perfume, ValidationError};

/// Minimal health-check API for presentation wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
