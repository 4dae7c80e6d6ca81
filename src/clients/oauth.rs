use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

/// Identity returned by the external provider for an opaque session id.
#[derive(Debug, Deserialize)]
pub struct SessionIdentity {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

/// Client for the external OAuth session-data endpoint. Any failure
/// surfaces as an authentication failure at the gateway, never as a
/// partially authenticated user.
#[derive(Clone)]
pub struct SessionIdentityClient {
    client: Client,
    session_url: String,
}

impl SessionIdentityClient {
    #[must_use]
    pub fn new(client: Client, session_url: String) -> Self {
        Self {
            client,
            session_url,
        }
    }

    pub async fn lookup(&self, session_id: &str) -> Result<SessionIdentity> {
        let response = self
            .client
            .get(&self.session_url)
            .header("X-Session-ID", session_id)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("identity provider returned status {}", response.status());
        }

        Ok(response.json().await?)
    }
}
