//! External identity directory.
//!
//! Resolves claimed external usernames to their numeric platform IDs and
//! fetches profile descriptions for the description verification method. The
//! production implementation talks to the Roblox users API.

use serde::Deserialize;
use serenity::async_trait;

use crate::server::error::AppError;

/// Identity lookups consumed by the verification correlator.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Resolves a username to the platform's numeric ID.
    ///
    /// # Arguments
    /// - `username` - Claimed external username
    ///
    /// # Returns
    /// - `Ok(Some(String))` - Resolved external ID
    /// - `Ok(None)` - No such user
    /// - `Err(AppError)` - Directory request failed
    async fn resolve_external_id(&self, username: &str) -> Result<Option<String>, AppError>;

    /// Fetches the profile description for an external ID.
    ///
    /// # Arguments
    /// - `external_id` - Platform numeric ID
    ///
    /// # Returns
    /// - `Ok(String)` - Profile description (empty if the user has none)
    /// - `Err(AppError)` - Directory request failed
    async fn fetch_description(&self, external_id: &str) -> Result<String, AppError>;
}

#[derive(Deserialize)]
struct UsernameLookupResponse {
    data: Vec<UsernameHit>,
}

#[derive(Deserialize)]
struct UsernameHit {
    id: u64,
}

#[derive(Deserialize)]
struct ProfileResponse {
    description: Option<String>,
}

/// Directory backed by the Roblox users API.
pub struct RobloxDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl RobloxDirectory {
    /// Creates a new directory over the given HTTP client.
    ///
    /// # Arguments
    /// - `http` - HTTP client for external API requests
    /// - `base_url` - Users API base URL, e.g. `https://users.roblox.com`
    ///
    /// # Returns
    /// - `RobloxDirectory` - New directory instance
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl IdentityDirectory for RobloxDirectory {
    async fn resolve_external_id(&self, username: &str) -> Result<Option<String>, AppError> {
        let response: UsernameLookupResponse = self
            .http
            .post(format!("{}/v1/usernames/users", self.base_url))
            .json(&serde_json::json!({
                "usernames": [username],
                "excludeBannedUsers": true,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.data.first().map(|hit| hit.id.to_string()))
    }

    async fn fetch_description(&self, external_id: &str) -> Result<String, AppError> {
        let response: ProfileResponse = self
            .http
            .get(format!("{}/v1/users/{}", self.base_url, external_id))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.description.unwrap_or_default())
    }
}
