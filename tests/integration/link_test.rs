//! Public link tests: issuing, replacing, and anonymous resolution.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use cloudstore_core::types::{FileId, UserId};
use cloudstore_database::LinkStore;
use cloudstore_entity::resource::ResourceKey;
use cloudstore_entity::share::{CreateLink, SharePermission};

use crate::helpers::{TestApp, TestUser};

async fn issue(app: &TestApp, owner: &TestUser, path: &str, body: serde_json::Value) -> String {
    let response = app
        .request("POST", path, Some(body), Some(&owner.token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data()["token"]
        .as_str()
        .expect("token")
        .to_string()
}

#[tokio::test]
async fn test_link_resolves_anonymously() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let doc = app.create_file(&owner, "report.pdf", None).await;

    let token = issue(&app, &owner, &format!("/api/files/{doc}/share-link"), json!({})).await;

    let view = app.request("GET", &format!("/s/{token}"), None, None).await;
    assert_eq!(view.status, StatusCode::OK);
    assert_eq!(view.data()["resource"]["name"], "report.pdf");
    assert_eq!(view.data()["permission"], "view");
    assert_eq!(view.data()["sharedBy"]["email"], "owner@example.com");
    assert!(view.data().get("files").is_none());

    let download = app
        .request("GET", &format!("/s/{token}/download"), None, None)
        .await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.data()["fileName"], "report.pdf");
}

#[tokio::test]
async fn test_reissue_replaces_token() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    let path = format!("/api/files/{doc}/share-link");

    let old = issue(&app, &owner, &path, json!({})).await;
    let new = issue(&app, &owner, &path, json!({ "permission": "edit" })).await;
    assert_ne!(old, new);

    let stale = app.request("GET", &format!("/s/{old}"), None, None).await;
    assert_eq!(stale.status, StatusCode::NOT_FOUND);

    let current = app
        .request("GET", &path, None, Some(&owner.token))
        .await;
    assert_eq!(current.data()["token"], new);
    assert_eq!(current.data()["permission"], "edit");
    assert!(
        current.data()["url"]
            .as_str()
            .is_some_and(|url| url.ends_with(&format!("/s/{new}")))
    );
}

#[tokio::test]
async fn test_expiry_bounds() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    let path = format!("/api/files/{doc}/share-link");

    let too_long = app
        .request("POST", &path, Some(json!({ "expiresIn": 366 })), Some(&owner.token))
        .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
    assert_eq!(too_long.error_code(), "VALIDATION_ERROR");

    let week = app
        .request("POST", &path, Some(json!({ "expiresIn": 7 })), Some(&owner.token))
        .await;
    assert_eq!(week.status, StatusCode::OK);
    assert!(week.data()["expiresAt"].is_string());

    let forever = app
        .request("POST", &path, Some(json!({ "expiresIn": 0 })), Some(&owner.token))
        .await;
    assert!(forever.data()["expiresAt"].is_null());
}

#[tokio::test]
async fn test_revoked_link_stops_resolving() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    let path = format!("/api/files/{doc}/share-link");
    let token = issue(&app, &owner, &path, json!({})).await;

    let revoked = app
        .request("DELETE", &path, None, Some(&owner.token))
        .await;
    assert_eq!(revoked.status, StatusCode::OK);

    let view = app.request("GET", &format!("/s/{token}"), None, None).await;
    assert_eq!(view.status, StatusCode::NOT_FOUND);

    let none = app.request("GET", &path, None, Some(&owner.token)).await;
    assert!(none.data().is_null());
}

#[tokio::test]
async fn test_only_owner_issues_links() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let alice = app.user("alice@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    app.share(&owner, "files", &doc, "alice@example.com", "edit")
        .await;

    let response = app
        .request(
            "POST",
            &format!("/api/files/{doc}/share-link"),
            Some(json!({})),
            Some(&alice.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_folder_link_lists_owner_items_only() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let alice = app.user("alice@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    let plan = app.create_file(&owner, "plan.txt", Some(&team)).await;
    let sub = app.create_folder(&owner, "Drafts", Some(&team)).await;
    app.create_file(&owner, "draft.txt", Some(&sub)).await;
    app.share(&owner, "folders", &team, "alice@example.com", "edit")
        .await;
    let foreign = app.create_file(&alice, "alice.txt", Some(&team)).await;

    let token = issue(&app, &owner, &format!("/api/folders/{team}/share-link"), json!({})).await;

    let view = app.request("GET", &format!("/s/{token}"), None, None).await;
    assert_eq!(view.status, StatusCode::OK);
    assert_eq!(view.data()["itemCount"], 2);
    assert_eq!(view.data()["files"][0]["id"], plan);
    assert_eq!(view.data()["subfolders"][0]["name"], "Drafts");
    assert_eq!(view.data()["subfolders"][0]["itemCount"], 1);

    let inner = app
        .request("GET", &format!("/s/{token}/folder/{sub}"), None, None)
        .await;
    assert_eq!(inner.status, StatusCode::OK);
    assert_eq!(inner.data()["files"][0]["name"], "draft.txt");

    let no_id = app
        .request("GET", &format!("/s/{token}/download"), None, None)
        .await;
    assert_eq!(no_id.status, StatusCode::BAD_REQUEST);

    let owned = app
        .request(
            "GET",
            &format!("/s/{token}/download?fileId={plan}"),
            None,
            None,
        )
        .await;
    assert_eq!(owned.status, StatusCode::OK);

    let other = app
        .request(
            "GET",
            &format!("/s/{token}/download?fileId={foreign}"),
            None,
            None,
        )
        .await;
    assert_eq!(other.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link_to_trashed_item_is_unavailable() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    let token = issue(&app, &owner, &format!("/api/files/{doc}/share-link"), json!({})).await;

    app.request("DELETE", &format!("/api/files/{doc}"), None, Some(&owner.token))
        .await;

    let view = app.request("GET", &format!("/s/{token}"), None, None).await;
    assert_eq!(view.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_access_count_tracks_resolutions() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    let path = format!("/api/files/{doc}/share-link");
    let token = issue(&app, &owner, &path, json!({})).await;

    app.request("GET", &format!("/s/{token}"), None, None).await;
    app.request("GET", &format!("/s/{token}/download"), None, None)
        .await;

    let link = app.request("GET", &path, None, Some(&owner.token)).await;
    assert_eq!(link.data()["accessCount"], 2);
}

#[tokio::test]
async fn test_expired_link_returns_gone() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    let token = issue(
        &app,
        &owner,
        &format!("/api/files/{doc}/share-link"),
        json!({ "expiresIn": 7 }),
    )
    .await;

    app.services
        .stores
        .links
        .replace(&CreateLink {
            resource: ResourceKey::file(doc.parse::<FileId>().expect("file id")),
            token: token.clone(),
            permission: SharePermission::View,
            expires_at: Some(Utc::now() - Duration::minutes(1)),
            created_by: owner.id.parse::<UserId>().expect("user id"),
        })
        .await
        .expect("backdate");

    let response = app.request("GET", &format!("/s/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.error_code(), "GONE");
}
