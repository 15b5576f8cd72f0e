use std::marker::PhantomData;
use std::ops::Deref;

use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::common::{role::Role, UserId};

use super::capability::{refusal, Capability};

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Who the caller is, as asserted by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user ID.
    #[serde(rename = "sub")]
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    pub role: Role,
}

/// Token claims: the identity plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    identity: Identity,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

impl Identity {
    /// Decode and verify an identity token.
    pub fn from_token(token: &str, config: &Config) -> Result<Self, Error> {
        let claims = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )?
        .claims;
        Ok(claims.identity)
    }
}

/// A verified identity whose role has capability `C`.
pub struct AuthToken<C> {
    identity: Identity,
    phantom: PhantomData<C>,
}

impl<C> Deref for AuthToken<C> {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.identity
    }
}

/// Get the raw token from the `Authorization` header, falling back to the cookie.
fn raw_token(req: &Request<'_>) -> Option<String> {
    let bearer = req
        .headers()
        .get_one("Authorization")
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    match bearer {
        Some(token) => Some(token.to_string()),
        None => req
            .cookies()
            .get(AUTH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string()),
    }
}

#[rocket::async_trait]
impl<'r, C> FromRequest<'r> for AuthToken<C>
where
    C: Capability + Send,
{
    type Error = Error;

    /// Verify the caller's identity token, and check their role has capability `C`.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = match req.guard::<&State<Config>>().await {
            Outcome::Success(config) => config,
            _ => {
                let err = Error::Internal("Configuration is not managed".to_string());
                return Outcome::Failure((Status::InternalServerError, err));
            }
        };

        let token = match raw_token(req) {
            Some(token) => token,
            None => {
                let err = Error::Unauthorized("No identity token provided".to_string());
                return Outcome::Failure((Status::Unauthorized, err));
            }
        };

        let identity = match Identity::from_token(&token, config) {
            Ok(identity) => identity,
            Err(err) => {
                debug!("Rejected identity token: {err}");
                return Outcome::Failure((Status::Unauthorized, err));
            }
        };

        if !C::permits(identity.role) {
            let err = Error::Forbidden(refusal::<C>(identity.role));
            return Outcome::Failure((Status::Forbidden, err));
        }

        Outcome::Success(Self {
            identity,
            phantom: PhantomData,
        })
    }
}


#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    use super::*;

    #[test]
    fn token_round_trip() {
        let config = Config::example();
        let identity = Identity::flame();
        let decoded = Identity::from_token(&identity.token(&config), &config).unwrap();
        assert_eq!(decoded, identity);
    }

    #[test]
    fn wrong_secret() {
        let token = Identity::member("alice").token(&Config::example());
        let other = Config::new("a different secret");
        assert!(Identity::from_token(&token, &other).is_err());
    }

    #[test]
    fn expired() {
        let config = Config::example();
        let claims = Claims {
            identity: Identity::member("alice"),
            expire_at: Utc::now() - Duration::hours(1),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .unwrap();

        let err = Identity::from_token(&token, &config).unwrap_err();
        assert_eq!(err.status(), Status::Unauthorized);
    }

    #[test]
    fn unknown_role() {
        #[derive(Serialize)]
        struct Raw {
            sub: &'static str,
            role: &'static str,
            exp: i64,
        }

        let config = Config::example();
        let raw = Raw {
            sub: "mallory",
            role: "Supreme Leader",
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &raw,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .unwrap();
        assert!(Identity::from_token(&token, &config).is_err());
    }
}
