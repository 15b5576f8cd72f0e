use rocket::{
    http::Status,
    response::status,
    serde::json::Json,
    Catcher, Request, Route,
};

use crate::error::ErrorBody;

mod concern;
mod election;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(election::routes());
    routes.extend(voting::routes());
    routes.extend(concern::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

/// Render failures that never reached a handler, e.g. from request guards or
/// unmatched routes, in the same shape as handler errors.
#[catch(default)]
fn default_catcher(status: Status, req: &Request<'_>) -> status::Custom<Json<ErrorBody>> {
    debug!("Caught {status} for {} {}", req.method(), req.uri());
    status::Custom(status, Json(ErrorBody::for_status(status)))
}
