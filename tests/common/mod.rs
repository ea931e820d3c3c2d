#![allow(dead_code)]

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::StatusCode;
use uuid::Uuid;

use compliance_portal::access::Role;
use compliance_portal::auth::{encode_jwt, Claims};
use compliance_portal::config::AppConfig;
use compliance_portal::entities::UserProfile;
use compliance_portal::{router, AppState};

/// Router served in-process on a free port, backed by in-memory stores
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub config: AppConfig,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(AppConfig::development()).await
    }

    pub async fn start_with(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::in_memory(&config);
        let app = router(state.clone(), &config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        // Redirects are assertions here, never followed
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(10))
            .build()?;

        let server = Self { base_url, state, config, client };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create a profile with `role` and return a bearer token for it
    pub async fn user(&self, role: Role) -> Result<(Uuid, String)> {
        self.member(role, None).await
    }

    /// Like [`TestServer::user`], placing the profile in `organization_id`
    pub async fn member(&self, role: Role, organization_id: Option<Uuid>) -> Result<(Uuid, String)> {
        let id = Uuid::new_v4();
        let profile = UserProfile {
            id,
            email: format!("{}-{}@example.com", role, &id.to_string()[..8]),
            full_name: format!("Test {}", role),
            role,
            organization_id,
            created_at: Utc::now(),
        };
        self.state.profiles.insert(profile).await?;
        Ok((id, self.token(id)?))
    }

    pub fn token(&self, user_id: Uuid) -> Result<String> {
        let claims = Claims::with_expiry(user_id, None, 1);
        Ok(encode_jwt(&claims, &self.config.security.jwt_secret)?)
    }

    pub fn get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    pub fn post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token)
    }

    pub fn put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(token)
    }

    pub fn delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(token)
    }
}

/// `Location` header of a redirect response
pub fn location(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
