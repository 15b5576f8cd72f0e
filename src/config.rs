use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::store::{ensure_indexes_exist, Store};

/// Secret used to sign identity tokens in tests.
#[cfg(test)]
pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use-in-production";

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // secrets
    jwt_secret: String,
}

impl Config {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Secret key shared with the identity provider, used to verify identity tokens.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the store fairing and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Which storage backend to use.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Keep everything in process memory. Nothing survives a restart.
    #[default]
    Memory,
    MongoDb,
}

/// Configuration for storage.
#[derive(Debug, Deserialize)]
struct StoreConfig {
    #[serde(default)]
    store: StoreBackend,
    // secrets
    db_uri: Option<String>,
    #[serde(default = "default_db_name")]
    db_name: String,
}

fn default_db_name() -> String {
    "community".to_string()
}

/// A fairing that loads the storage config, connects to the database if one
/// is configured, performs any setup necessary, and places the registries
/// into managed state.
pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<StoreConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load store config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let store = match config.store {
            StoreBackend::Memory => {
                warn!("Using the in-memory store, data will not survive a restart");
                Store::in_memory()
            }
            StoreBackend::MongoDb => {
                let Some(db_uri) = config.db_uri else {
                    error!("The mongodb store requires `db_uri` to be set");
                    return Err(rocket);
                };
                info!("Loaded database config, connecting...");
                // Construct the connection.
                let client = match MongoClient::with_uri_str(db_uri).await {
                    Ok(client) => client,
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                };
                let db = client.database(&config.db_name);

                // Ensure the required indexes exist.
                if let Err(e) = ensure_indexes_exist(&db).await {
                    error!("Failed to connect to database: {e}");
                    return Err(rocket);
                }
                info!("...database connection online!");
                Store::mongodb(&db)
            }
        };

        // Manage the state.
        Ok(crate::manage_store(rocket, store))
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Config {
        /// The configuration test rockets are built with.
        pub fn example() -> Self {
            Self::new(TEST_JWT_SECRET)
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::figment::Figment;

    use super::*;

    #[test]
    fn store_defaults_to_memory() {
        let config: StoreConfig = Figment::new().extract().unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.db_name, "community");
        assert!(config.db_uri.is_none());
    }

    #[test]
    fn store_mongodb() {
        let config: StoreConfig = Figment::new()
            .merge(("store", "mongodb"))
            .merge(("db_uri", "mongodb://localhost:27017"))
            .extract()
            .unwrap();
        assert_eq!(config.store, StoreBackend::MongoDb);
        assert_eq!(config.db_uri.as_deref(), Some("mongodb://localhost:27017"));
    }

    #[test]
    fn missing_secret() {
        assert!(Figment::new().extract::<Config>().is_err());
    }
}
