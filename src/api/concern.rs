use chrono::Utc;
use rocket::{
    serde::json::{self, Json},
    Route, State,
};

use crate::error::Result;
use crate::logging::RequestId;
use crate::model::{
    api::{
        auth::{AuthToken, ConcernManager, Member},
        concern::{ConcernDescription, ConcernRequest, StatusUpdate},
    },
    db::concern::{ConcernId, ConcernRegistry},
};

pub fn routes() -> Vec<Route> {
    routes![submit_concern, list_concerns, get_concern, update_status]
}

#[post("/concerns", data = "<concern>", format = "json")]
async fn submit_concern(
    token: AuthToken<Member>,
    concern: std::result::Result<Json<ConcernRequest>, json::Error<'_>>,
    registry: &State<ConcernRegistry>,
    request_id: &RequestId,
) -> Result<Json<ConcernDescription>> {
    let concern = concern?;
    let concern = registry
        .submit(&token.id, &concern.title, &concern.description, Utc::now())
        .await?;
    debug!("req{request_id}: concern {} submitted", concern.id);
    Ok(Json(concern.into()))
}

#[get("/concerns")]
async fn list_concerns(
    token: AuthToken<Member>,
    registry: &State<ConcernRegistry>,
) -> Result<Json<Vec<ConcernDescription>>> {
    let concerns = registry.list_for(&token.id, token.role).await?;
    Ok(Json(concerns.into_iter().map(Into::into).collect()))
}

#[get("/concerns/<concern_id>")]
async fn get_concern(
    token: AuthToken<Member>,
    concern_id: ConcernId,
    registry: &State<ConcernRegistry>,
) -> Result<Json<ConcernDescription>> {
    let concern = registry.get_for(concern_id, &token.id, token.role).await?;
    Ok(Json(concern.into()))
}

#[put("/concerns/<concern_id>/status", data = "<update>", format = "json")]
async fn update_status(
    token: AuthToken<ConcernManager>,
    concern_id: ConcernId,
    update: std::result::Result<Json<StatusUpdate>, json::Error<'_>>,
    registry: &State<ConcernRegistry>,
    request_id: &RequestId,
) -> Result<Json<ConcernDescription>> {
    let update = update?;
    let concern = registry
        .update_status(concern_id, update.status, Utc::now())
        .await?;
    info!(
        "req{request_id}: '{}' set concern {concern_id} to '{}'",
        token.id, concern.status
    );
    Ok(Json(concern.into()))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::serde_json,
    };

    use super::*;
    use crate::error::ErrorBody;
    use crate::model::{
        api::auth::Identity,
        common::{election::Post, role::Role},
        db::concern::ConcernStatus,
    };

    async fn submit(client: &Client, who: &Identity, title: &str) -> ConcernDescription {
        let request = ConcernRequest {
            title: title.to_string(),
            description: "Please look into it".to_string(),
        };
        let response = client
            .post(uri!(submit_concern))
            .header(ContentType::JSON)
            .header(who.bearer())
            .body(serde_json::to_string(&request).unwrap())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
    }

    async fn list(client: &Client, who: &Identity) -> Vec<ConcernDescription> {
        let response = client
            .get(uri!(list_concerns))
            .header(who.bearer())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
    }

    async fn set_status(
        client: &Client,
        who: &Identity,
        concern_id: ConcernId,
        status: ConcernStatus,
    ) -> Status {
        client
            .put(uri!(update_status(concern_id)))
            .header(ContentType::JSON)
            .header(who.bearer())
            .body(serde_json::to_string(&StatusUpdate { status }).unwrap())
            .dispatch()
            .await
            .status()
    }

    #[backend_test]
    async fn visibility(client: Client) {
        let alice = Identity::member("alice");
        let bob = Identity::member("bob");
        let welfare = Identity::new("welfare", Role::Officer(Post::WelfareOfficer));

        let first = submit(&client, &alice, "Parking").await;
        assert_eq!(first.status, ConcernStatus::New);
        assert_eq!(first.author, "alice");
        submit(&client, &bob, "Noise").await;

        assert_eq!(list(&client, &alice).await.len(), 1);
        assert_eq!(list(&client, &welfare).await.len(), 2);

        let response = client
            .get(uri!(get_concern(first.id)))
            .header(bob.bearer())
            .dispatch()
            .await;
        assert_eq!(Status::NotFound, response.status());

        let response = client
            .get(uri!(get_concern(first.id)))
            .header(welfare.bearer())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
    }

    #[backend_test]
    async fn empty_concern(client: Client) {
        let response = client
            .post(uri!(submit_concern))
            .header(ContentType::JSON)
            .header(Identity::member("alice").bearer())
            .body(r#"{"title": "Something"}"#)
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
    }

    #[backend_test]
    async fn status_changes(client: Client) {
        let alice = Identity::member("alice");
        let dev = Identity::new("dev", Role::Developer);
        let concern = submit(&client, &alice, "Parking").await;

        assert_eq!(
            Status::Forbidden,
            set_status(&client, &alice, concern.id, ConcernStatus::Resolved).await
        );
        assert_eq!(
            Status::Ok,
            set_status(&client, &dev, concern.id, ConcernStatus::InProgress).await
        );
        assert_eq!(
            Status::BadRequest,
            set_status(&client, &dev, concern.id, ConcernStatus::New).await
        );
        assert_eq!(
            Status::Ok,
            set_status(&client, &dev, concern.id, ConcernStatus::Resolved).await
        );
        assert_eq!(
            Status::NotFound,
            set_status(&client, &dev, 99, ConcernStatus::Resolved).await
        );

        // Not a status at all.
        let response = client
            .put(uri!(update_status(concern.id)))
            .header(ContentType::JSON)
            .header(dev.bearer())
            .body(r#"{"status": "Reopened"}"#)
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
        let body: ErrorBody =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body.error, "validation");

        let mine = list(&client, &alice).await;
        assert_eq!(mine[0].status, ConcernStatus::Resolved);
    }
}
