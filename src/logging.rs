use rocket::{
    fairing::{Fairing, Info, Kind},
    http::StatusClass,
    request::{FromRequest, Outcome},
    Data, Orbit, Request, Response, Rocket,
};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::model::{common::election::ElectionId, db::concern::ConcernId};

/// A unique identifier for a particular request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> RequestId {
        static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        RequestId(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for &'r RequestId {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(req.local_cache(RequestId::next))
    }
}

/// When the request arrived.
#[derive(Debug, Copy, Clone)]
struct Arrival(Instant);

/// The record a request is about, so that log lines can be grepped by election or concern.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Subject {
    Election(ElectionId),
    Concern(ConcernId),
}

impl Subject {
    /// Find the `<election_id>` or `<concern_id>` segment of a route pattern in a request path.
    fn find(pattern: &str, path: &str) -> Option<Self> {
        let pattern = pattern.split('?').next()?;
        pattern
            .split('/')
            .zip(path.split('/'))
            .find_map(|(param, value)| match param {
                "<election_id>" => value.parse().ok().map(Self::Election),
                "<concern_id>" => value.parse().ok().map(Self::Concern),
                _ => None,
            })
    }

    fn of(req: &Request<'_>) -> Option<Self> {
        let pattern = req.route()?.uri.to_string();
        Self::find(&pattern, &req.uri().path().to_string())
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Election(id) => write!(f, "election {id}"),
            Self::Concern(id) => write!(f, "concern {id}"),
        }
    }
}

/// The matched route, by handler name if it has one.
fn route_name(req: &Request<'_>) -> String {
    match req.route() {
        Some(route) => match route.name {
            Some(ref name) => format!("{name} ({})", route.uri),
            None => route.uri.to_string(),
        },
        None => "UNKNOWN ROUTE".to_string(),
    }
}

/// Logs every request and response, plus server start and stop.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let config = rocket.config();
        let scheme = if config.tls_enabled() { "https" } else { "http" };
        info!(
            "Community dashboard backend listening on {scheme}://{}:{}",
            config.address, config.port
        );
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        req.local_cache(|| Arrival(Instant::now()));
        let id = req.local_cache(RequestId::next);
        info!("->req{id} {} {}", req.method(), req.uri());
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let id = req.local_cache(RequestId::next);
        let elapsed = req.local_cache(|| Arrival(Instant::now())).0.elapsed();
        let status = res.status();
        let subject = Subject::of(req)
            .map(|subject| format!(" [{subject}]"))
            .unwrap_or_default();
        let line = format!(
            "<-rsp{id} {status} {}{subject} ({}ms)",
            route_name(req),
            elapsed.as_millis()
        );
        match status.class() {
            StatusClass::ServerError => error!("{line}"),
            StatusClass::ClientError => warn!("{line}"),
            _ => info!("{line}"),
        }
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutdown requested, draining requests");
    }
}
