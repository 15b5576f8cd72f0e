use chrono::Utc;
use rocket::{
    serde::json::{self, Json},
    Route, State,
};

use crate::error::Result;
use crate::logging::RequestId;
use crate::model::{
    api::{
        auth::{AuthToken, Member},
        vote::{ApplicationRequest, CandidacyCreated, Participation, VoteRequest},
    },
    common::election::ElectionId,
    db::election::ElectionRegistry,
};

pub fn routes() -> Vec<Route> {
    routes![apply, cast_vote, get_participation]
}

#[post("/elections/<election_id>/candidacies", data = "<application>", format = "json")]
async fn apply(
    token: AuthToken<Member>,
    election_id: ElectionId,
    application: std::result::Result<Json<ApplicationRequest>, json::Error<'_>>,
    registry: &State<ElectionRegistry>,
    request_id: &RequestId,
) -> Result<Json<CandidacyCreated>> {
    let application = application?;
    let candidacy_id = registry
        .apply(
            election_id,
            &token.id,
            &application.post,
            &application.reason,
            Utc::now(),
        )
        .await?;
    debug!("req{request_id}: candidacy {candidacy_id} created");
    Ok(Json(CandidacyCreated { candidacy_id }))
}

/// Record the caller's vote, and return what they now vote for.
#[post("/elections/<election_id>/votes", data = "<vote>", format = "json")]
async fn cast_vote(
    token: AuthToken<Member>,
    election_id: ElectionId,
    vote: std::result::Result<Json<VoteRequest>, json::Error<'_>>,
    registry: &State<ElectionRegistry>,
    request_id: &RequestId,
) -> Result<Json<Participation>> {
    let vote = vote?;
    registry
        .cast_vote(election_id, &token.id, vote.candidacy_id, Utc::now())
        .await?;
    debug!("req{request_id}: vote cast in election {election_id}");
    let participation = registry.participation(election_id, &token.id).await?;
    Ok(Json(participation))
}

#[get("/elections/<election_id>/participation")]
async fn get_participation(
    token: AuthToken<Member>,
    election_id: ElectionId,
    registry: &State<ElectionRegistry>,
) -> Result<Json<Participation>> {
    let participation = registry.participation(election_id, &token.id).await?;
    Ok(Json(participation))
}
