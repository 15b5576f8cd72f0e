#[macro_use]
extern crate rocket;
#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{figment::Figment, Build, Rocket};

use crate::{
    config::{ConfigFairing, StoreFairing},
    logging::LoggerFairing,
    model::{
        db::{concern::ConcernRegistry, election::ElectionRegistry},
        store::Store,
    },
};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

/// Build a rocket whose storage backend is chosen by configuration.
pub fn build() -> Rocket<Build> {
    rocket_with_fairings(rocket::custom(figment())).attach(StoreFairing)
}

/// Build a rocket that serves the given store, bypassing the storage configuration.
pub fn rocket_for_store(store: Store) -> Rocket<Build> {
    manage_store(rocket_with_fairings(rocket::custom(figment())), store)
}

/// Place the registries for the given store into managed state.
pub(crate) fn manage_store(rocket: Rocket<Build>, store: Store) -> Rocket<Build> {
    rocket
        .manage(ElectionRegistry::new(store.elections))
        .manage(ConcernRegistry::new(store.concerns))
}

fn rocket_with_fairings(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .attach(ConfigFairing)
        .attach(LoggerFairing)
        .mount("/", api::routes())
        .register("/", api::catchers())
}

/// Get the configuration provider (production version).
#[cfg(not(test))]
fn figment() -> Figment {
    rocket::Config::figment()
}

/// Get the configuration provider (test version).
/// Fixes the token secret so tests can mint their own identity tokens.
#[cfg(test)]
fn figment() -> Figment {
    rocket::Config::figment().merge(("jwt_secret", config::TEST_JWT_SECRET))
}
