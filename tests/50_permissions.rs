mod common;

use anyhow::Result;
use compliance_portal::access::Role;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn audit_pack_generation_requires_reports_export() -> Result<()> {
    let server = TestServer::start().await?;
    let request = json!({ "period_start": "2025-01-01", "period_end": "2025-03-31" });

    let (_, user_token) = server.user(Role::User).await?;
    let resp = server.post("/api/audit-packs", &user_token).json(&request).send().await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let (customer_id, customer_token) = server.user(Role::Customer).await?;
    let resp = server.post("/api/audit-packs", &customer_token).json(&request).send().await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["generated_by"], customer_id.to_string());

    let body: Value = server.get("/api/audit-packs", &customer_token).send().await?.json().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Packs belong to whoever generated them
    let body: Value = server.get("/api/audit-packs", &user_token).send().await?.json().await?;
    assert!(body["data"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn repeated_permission_checks_agree() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.user(Role::User).await?;
    let request = json!({ "period_start": "2025-01-01", "period_end": "2025-01-31" });

    for _ in 0..3 {
        let resp = server.post("/api/audit-packs", &token).json(&request).send().await?;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
    Ok(())
}

#[tokio::test]
async fn user_management_needs_users_manage() -> Result<()> {
    let server = TestServer::start().await?;

    let (_, manager) = server.user(Role::Manager).await?;
    let resp = server.get("/api/admin/users", &manager).send().await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let (_, admin) = server.user(Role::Admin).await?;
    let resp = server.get("/api/admin/users", &admin).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn role_change_takes_effect_on_next_request() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin) = server.user(Role::Admin).await?;
    let (user_id, user_token) = server.user(Role::User).await?;

    // Warm the role cache with the old role
    let resp = server.get("/api/admin/organizations", &user_token).send().await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = server
        .client
        .put(server.url(&format!("/api/admin/users/{}", user_id)))
        .bearer_auth(&admin)
        .json(&json!({ "email": "promoted@example.com", "full_name": "Promoted", "role": "manager" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = server.get("/api/admin/organizations", &user_token).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn platform_dashboard_lists_catalogs() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.user(Role::PlatformAdmin).await?;

    let body: Value = server.get("/api/platform/dashboard", &token).send().await?.json().await?;
    assert_eq!(body["data"]["roles"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["permissions"].as_array().unwrap().len(), 8);
    Ok(())
}

#[tokio::test]
async fn admins_cannot_grant_platform_admin() -> Result<()> {
    let server = TestServer::start().await?;
    let (admin_id, admin) = server.user(Role::Admin).await?;
    let path = format!("/api/admin/users/{}", admin_id);

    let resp = server
        .put(&path, &admin)
        .json(&json!({ "email": "admin@example.com", "full_name": "Site Admin", "role": "platform_admin" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = server
        .post("/api/admin/users", &admin)
        .json(&json!({ "email": "root@example.com", "full_name": "Root", "role": "platform_admin" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Nothing changed: still an admin, still kept out of the platform area
    let body: Value = server.get(&path, &admin).send().await?.json().await?;
    assert_eq!(body["data"]["role"], "admin");
    let resp = server.get("/api/platform/roles", &admin).send().await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    Ok(())
}

#[tokio::test]
async fn admins_cannot_manage_platform_admin_profiles() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin) = server.user(Role::Admin).await?;
    let (root_id, root) = server.user(Role::PlatformAdmin).await?;
    let path = format!("/api/admin/users/{}", root_id);

    let resp = server
        .put(&path, &admin)
        .json(&json!({ "email": "demoted@example.com", "full_name": "Demoted", "role": "customer" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(server.delete(&path, &admin).send().await?.status(), StatusCode::FORBIDDEN);

    let resp = server.get("/api/platform/roles", &root).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}
