//! Drive listing, rename, and move tests.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_root_lists_only_own_items() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    app.create_folder(&owner, "Mine", None).await;
    app.create_file(&bob, "theirs.txt", None).await;

    let root = app
        .request("GET", "/api/folders/root", None, Some(&owner.token))
        .await;

    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.data().as_array().map(Vec::len), Some(1));
    assert_eq!(root.data()[0]["name"], "Mine");
    assert_eq!(root.data()[0]["type"], "folder");
}

#[tokio::test]
async fn test_get_item_reports_effective_permission() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    let carol = app.user("carol@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    let doc = app.create_file(&owner, "doc.txt", Some(&team)).await;
    app.share(&owner, "folders", &team, "bob@example.com", "edit")
        .await;

    let inherited = app
        .request("GET", &format!("/api/files/{doc}"), None, Some(&bob.token))
        .await;
    assert_eq!(inherited.status, StatusCode::OK);
    assert_eq!(inherited.data()["permission"], "edit");
    assert_eq!(inherited.data()["name"], "doc.txt");

    let stranger = app
        .request("GET", &format!("/api/files/{doc}"), None, Some(&carol.token))
        .await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rename_validates_name() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{team}"),
            Some(json!({ "name": "" })),
            Some(&owner.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_move_reports_per_item_failures() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    let target = app.create_folder(&owner, "Archive", None).await;
    let mine = app.create_file(&owner, "mine.txt", None).await;
    let theirs = app.create_file(&bob, "theirs.txt", None).await;

    let response = app
        .request(
            "POST",
            "/api/items/move",
            Some(json!({
                "items": [
                    { "type": "file", "id": mine },
                    { "type": "file", "id": theirs },
                ],
                "targetFolderId": target,
            })),
            Some(&owner.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["successCount"], 1);
    assert_eq!(response.data()["errorCount"], 1);
    assert_eq!(response.data()["errors"][0]["id"], theirs);

    let contents = app
        .request(
            "GET",
            &format!("/api/folders/{target}/contents"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(contents.item_names(), vec!["mine.txt"]);
}
