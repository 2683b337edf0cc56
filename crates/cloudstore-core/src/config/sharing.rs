//! Public link configuration.

use serde::{Deserialize, Serialize};

/// Settings for public share links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Origin the front-end serves `/s/{token}` pages from.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Upper bound for `expiresIn` on link creation, in days.
    #[serde(default = "default_max_link_expiry")]
    pub max_link_expiry_days: i64,
}

impl SharingConfig {
    /// Build the shareable URL for a link token.
    pub fn share_url(&self, token: &str) -> String {
        format!("{}/s/{}", self.public_base_url.trim_end_matches('/'), token)
    }
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            max_link_expiry_days: default_max_link_expiry(),
        }
    }
}

fn default_public_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_max_link_expiry() -> i64 {
    365
}
