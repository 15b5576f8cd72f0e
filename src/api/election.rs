use chrono::Utc;
use rocket::{
    serde::json::{self, Json},
    Route, State,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logging::RequestId;
use crate::model::{
    api::{
        auth::{AuthToken, ElectionManager, Member},
        election::{ElectionDescription, ElectionResults, ElectionSpec, ElectionSummary},
        vote::TallyResponse,
    },
    common::election::{ElectionId, Phase},
    db::election::ElectionRegistry,
};

pub fn routes() -> Vec<Route> {
    routes![
        list_elections,
        create_election,
        get_election,
        get_phase,
        get_tally,
        get_results,
    ]
}

/// The derived phase of an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseResponse {
    pub phase: Phase,
}

#[get("/elections")]
async fn list_elections(
    _token: AuthToken<Member>,
    registry: &State<ElectionRegistry>,
) -> Result<Json<Vec<ElectionSummary>>> {
    let now = Utc::now();
    let summaries = registry
        .list()
        .await?
        .into_iter()
        .map(|election| ElectionSummary::new(election, now))
        .collect();
    Ok(Json(summaries))
}

#[post("/elections", data = "<spec>", format = "json")]
async fn create_election(
    token: AuthToken<ElectionManager>,
    spec: std::result::Result<Json<ElectionSpec>, json::Error<'_>>,
    registry: &State<ElectionRegistry>,
    request_id: &RequestId,
) -> Result<Json<ElectionDescription>> {
    let now = Utc::now();
    let election = registry
        .create_election(spec?.into_inner(), &token.id, now)
        .await?;
    info!("req{request_id}: '{}' created election {}", token.id, election.id);
    Ok(Json(ElectionDescription::new(election, now)))
}

#[get("/elections/<election_id>")]
async fn get_election(
    _token: AuthToken<Member>,
    election_id: ElectionId,
    registry: &State<ElectionRegistry>,
) -> Result<Json<ElectionDescription>> {
    let election = registry.get(election_id).await?;
    Ok(Json(ElectionDescription::new(election, Utc::now())))
}

#[get("/elections/<election_id>/phase")]
async fn get_phase(
    _token: AuthToken<Member>,
    election_id: ElectionId,
    registry: &State<ElectionRegistry>,
) -> Result<Json<PhaseResponse>> {
    let phase = registry.current_phase(election_id, Utc::now()).await?;
    Ok(Json(PhaseResponse { phase }))
}

#[get("/elections/<election_id>/tally?<post>")]
async fn get_tally(
    _token: AuthToken<Member>,
    election_id: ElectionId,
    post: Option<String>,
    registry: &State<ElectionRegistry>,
) -> Result<Json<TallyResponse>> {
    let post = post.ok_or_else(|| Error::Validation("A post must be given".to_string()))?;
    let tally = registry.tally(election_id, &post, Utc::now()).await?;
    Ok(Json(tally))
}

#[get("/elections/<election_id>/results")]
async fn get_results(
    _token: AuthToken<Member>,
    election_id: ElectionId,
    registry: &State<ElectionRegistry>,
) -> Result<Json<ElectionResults>> {
    let results = registry.results(election_id, Utc::now()).await?;
    Ok(Json(results))
}
