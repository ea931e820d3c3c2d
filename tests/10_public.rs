mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let server = common::TestServer::start().await?;

    let resp = server.client.get(server.url("/")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Compliance Portal API");
    Ok(())
}

#[tokio::test]
async fn health_without_database() -> Result<()> {
    let server = common::TestServer::start().await?;

    let body: Value = server.client.get(server.url("/health")).send().await?.json().await?;
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}
