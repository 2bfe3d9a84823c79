//! Posting-platform client (Mastodon-compatible status API).
//!
//! Three operations, all thin wrappers over authenticated HTTP:
//!
//! - read the creation timestamp of the account's newest post (feeds the
//!   new-data decision; the feed itself is the bot's only persistence)
//! - upload the rendered progress-bar image
//! - publish a status with the image attached

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, multipart};
use serde::Deserialize;

use crate::error::AppError;

pub struct SocialClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct Account {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct Media {
    id: String,
}

impl SocialClient {
    /// Build a client from `SOCIAL_BASE_URL` / `SOCIAL_ACCESS_TOKEN`,
    /// loading a `.env` file if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("SOCIAL_BASE_URL")
            .map_err(|_| AppError::new(2, "Missing SOCIAL_BASE_URL in environment (.env)."))?;
        let token = std::env::var("SOCIAL_ACCESS_TOKEN")
            .map_err(|_| AppError::new(2, "Missing SOCIAL_ACCESS_TOKEN in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Creation time of the account's most recent post, or `None` if the
    /// account has never posted (first run).
    pub fn last_post_created_at(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        let account: Account = self
            .get_json(&format!("{}/api/v1/accounts/verify_credentials", self.base_url))?;

        let statuses: Vec<Status> = self.get_json(&format!(
            "{}/api/v1/accounts/{}/statuses?limit=1&exclude_replies=true&exclude_reblogs=true",
            self.base_url, account.id
        ))?;

        Ok(statuses.first().map(|s| s.created_at))
    }

    /// Upload an image attachment; returns the platform's media id.
    pub fn upload_media(&self, path: &std::path::Path) -> Result<String, AppError> {
        let form = multipart::Form::new().file("file", path).map_err(|e| {
            AppError::new(2, format!("Failed to read media '{}': {e}", path.display()))
        })?;

        let resp = self
            .client
            .post(format!("{}/api/v1/media", self.base_url))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .map_err(|e| AppError::new(4, format!("Media upload failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Media upload failed with status {}.", resp.status()),
            ));
        }

        let media: Media = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse media response: {e}")))?;
        Ok(media.id)
    }

    /// Publish a status with one attached media item.
    pub fn post_status(&self, text: &str, media_id: &str) -> Result<(), AppError> {
        let resp = self
            .client
            .post(format!("{}/api/v1/statuses", self.base_url))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "status": text,
                "media_ids": [media_id],
            }))
            .send()
            .map_err(|e| AppError::new(4, format!("Posting failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Posting failed with status {}.", resp.status()),
            ));
        }
        Ok(())
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| AppError::new(4, format!("Feed request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Feed request failed with status {}.", resp.status()),
            ));
        }

        resp.json()
            .map_err(|e| AppError::new(4, format!("Failed to parse feed response: {e}")))
    }
}
