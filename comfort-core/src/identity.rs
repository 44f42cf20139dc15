//! Identity-provider integration used by the auth endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;
use tracing::{info, warn};

use crate::{config::Auth0Config, provider::truncate_body};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("request to identity provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("identity provider {step} returned {status}: {body}")]
    Status { step: &'static str, status: u16, body: String },

    #[error("identity provider returned an empty access token")]
    EmptyToken,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync + Debug {
    /// Resend the address-verification email. `Ok(false)` means no such user.
    async fn resend_verification(&self, email: &str) -> Result<bool, IdentityError>;
}

/// Auth0 management API client.
#[derive(Debug, Clone)]
pub struct Auth0Client {
    config: Auth0Config,
    base_url: String,
    http: Client,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    audience: String,
    grant_type: &'static str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

#[derive(Deserialize)]
struct Auth0User {
    user_id: String,
}

#[derive(Serialize)]
struct VerificationJob<'a> {
    user_id: &'a str,
}

impl Auth0Client {
    pub fn new(config: Auth0Config) -> Self {
        let base_url = format!("https://{}", config.domain.trim_end_matches('/'));
        Self { config, base_url, http: Client::new() }
    }

    async fn management_token(&self) -> Result<String, IdentityError> {
        let request = TokenRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            audience: format!("{}/api/v2/", self.base_url),
            grant_type: "client_credentials",
        };

        let res = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .json(&request)
            .send()
            .await?;

        let res = check_status("token request", res).await?;
        let token: TokenResponse = res.json().await?;
        if token.access_token.is_empty() {
            return Err(IdentityError::EmptyToken);
        }
        Ok(token.access_token)
    }

    async fn find_user(
        &self,
        token: &str,
        email: &str,
    ) -> Result<Option<Auth0User>, IdentityError> {
        let res = self
            .http
            .get(format!("{}/api/v2/users-by-email", self.base_url))
            .bearer_auth(token)
            .query(&[("email", email)])
            .send()
            .await?;

        let res = check_status("user lookup", res).await?;
        let users: Vec<Auth0User> = res.json().await?;
        Ok(users.into_iter().next())
    }
}

#[async_trait]
impl IdentityProvider for Auth0Client {
    async fn resend_verification(&self, email: &str) -> Result<bool, IdentityError> {
        let token = self.management_token().await?;

        let Some(user) = self.find_user(&token, email).await? else {
            warn!(email, "no identity-provider user for email");
            return Ok(false);
        };

        let res = self
            .http
            .post(format!("{}/api/v2/jobs/verification-email", self.base_url))
            .bearer_auth(&token)
            .json(&VerificationJob { user_id: &user.user_id })
            .send()
            .await?;
        check_status("verification job", res).await?;

        info!(email, user_id = %user.user_id, "verification email queued");
        Ok(true)
    }
}

async fn check_status(
    step: &'static str,
    res: reqwest::Response,
) -> Result<reqwest::Response, IdentityError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(IdentityError::Status { step, status: status.as_u16(), body: truncate_body(&body) })
}
