mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use compliance_portal::access::Role;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn create_list_complete_and_reopen() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.user(Role::User).await?;
    let today = Utc::now().date_naive();

    for (title, days) in [("Check thermometer", 5), ("Fire drill", 1), ("Deep clean", 10)] {
        let resp = server
            .post("/api/tasks", &token)
            .json(&json!({
                "title": title,
                "category": "cleaning",
                "due_date": today + Duration::days(days),
            }))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let body: Value = server.get("/api/tasks", &token).send().await?.json().await?;
    let titles: Vec<_> = body["data"].as_array().unwrap().iter().map(|t| t["title"].clone()).collect();
    assert_eq!(titles, ["Fire drill", "Check thermometer", "Deep clean"]);

    let id = body["data"][0]["id"].as_str().unwrap().to_string();
    let body: Value = server.post(&format!("/api/tasks/{}/complete", id), &token).send().await?.json().await?;
    assert_eq!(body["data"]["status"], "completed");
    assert!(body["data"]["completed_at"].is_string());

    let body: Value = server.post(&format!("/api/tasks/{}/reopen", id), &token).send().await?.json().await?;
    assert_eq!(body["data"]["status"], "pending");
    assert!(body["data"]["completed_at"].is_null());
    Ok(())
}

#[tokio::test]
async fn blank_title_is_rejected_with_field_errors() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.user(Role::Customer).await?;

    let resp = server
        .post("/api/tasks", &token)
        .json(&json!({ "title": "   ", "due_date": "2025-01-05" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await?;
    assert_eq!(body["code"], "UNPROCESSABLE_ENTITY");
    assert!(body["field_errors"]["title"].is_string());

    let body: Value = server.get("/api/tasks", &token).send().await?.json().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn filters_and_bad_sort_column() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.user(Role::User).await?;

    for (title, category) in [("Allergen training", "training"), ("Extinguisher service", "fire-safety")] {
        server
            .post("/api/tasks", &token)
            .json(&json!({ "title": title, "category": category, "due_date": "2030-01-01" }))
            .send()
            .await?;
    }

    let body: Value = server.get("/api/tasks?category=training", &token).send().await?.json().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let body: Value = server.get("/api/tasks?search=EXTINGUISHER", &token).send().await?.json().await?;
    assert_eq!(body["data"][0]["category"], "fire-safety");

    let resp = server.get("/api/tasks?order=password", &token).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn agenda_merges_tasks_and_reminders() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.user(Role::User).await?;
    let today = Utc::now().date_naive();

    server
        .post("/api/tasks", &token)
        .json(&json!({ "title": "Pest inspection", "due_date": today + Duration::days(7) }))
        .send()
        .await?;
    server
        .post("/api/reminders", &token)
        .json(&json!({ "title": "Order gloves", "remind_on": today + Duration::days(2) }))
        .send()
        .await?;
    server
        .post("/api/reminders", &token)
        .json(&json!({ "title": "Licence renewal", "remind_on": today + Duration::days(90) }))
        .send()
        .await?;

    let body: Value = server.get("/api/agenda", &token).send().await?.json().await?;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["kind"], "reminder");
    assert_eq!(items[1]["kind"], "task");
    Ok(())
}

#[tokio::test]
async fn tasks_of_other_users_read_as_missing() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, alice) = server.user(Role::User).await?;
    let (_, bob) = server.user(Role::User).await?;

    let body: Value = server
        .post("/api/tasks", &alice)
        .json(&json!({ "title": "Walk-in fridge check", "due_date": "2025-01-05" }))
        .send()
        .await?
        .json()
        .await?;
    let path = format!("/api/tasks/{}", body["data"]["id"].as_str().unwrap());

    let body: Value = server.get("/api/tasks", &bob).send().await?.json().await?;
    assert!(body["data"].as_array().unwrap().is_empty());

    assert_eq!(server.get(&path, &bob).send().await?.status(), StatusCode::NOT_FOUND);
    let resp = server
        .put(&path, &bob)
        .json(&json!({ "title": "Hijacked", "due_date": "2025-01-05" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = server.post(&format!("{}/complete", path), &bob).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.delete(&path, &bob).send().await?.status(), StatusCode::NOT_FOUND);

    let body: Value = server.get(&path, &alice).send().await?.json().await?;
    assert_eq!(body["data"]["title"], "Walk-in fridge check");
    assert_eq!(body["data"]["status"], "pending");

    let body: Value = server.get("/api/dashboard", &bob).send().await?.json().await?;
    assert_eq!(body["data"]["total_tasks"], 0);
    Ok(())
}

#[tokio::test]
async fn organization_members_share_tasks() -> Result<()> {
    let server = TestServer::start().await?;
    let site = Some(uuid::Uuid::new_v4());
    let (owner_id, owner) = server.member(Role::User, site).await?;
    let (_, colleague) = server.member(Role::User, site).await?;
    let (_, outsider) = server.member(Role::User, Some(uuid::Uuid::new_v4())).await?;

    let body: Value = server
        .post("/api/tasks", &owner)
        .json(&json!({ "title": "Allergen board", "due_date": "2025-01-05" }))
        .send()
        .await?
        .json()
        .await?;
    let path = format!("/api/tasks/{}", body["data"]["id"].as_str().unwrap());

    let body: Value = server
        .put(&path, &colleague)
        .json(&json!({ "title": "Allergen board (front)", "due_date": "2025-01-06" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["title"], "Allergen board (front)");
    assert_eq!(body["data"]["owner_id"], owner_id.to_string());

    let body: Value = server.get("/api/tasks", &outsider).send().await?.json().await?;
    assert!(body["data"].as_array().unwrap().is_empty());
    Ok(())
}
