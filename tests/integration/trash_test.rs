//! Trash gate tests: cascade, restore, purge.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_trash_cascades_and_hides_from_grantees() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    let sub = app.create_folder(&owner, "Sub", Some(&team)).await;
    let doc = app.create_file(&owner, "doc.txt", Some(&sub)).await;
    app.share(&owner, "folders", &team, "bob@example.com", "view")
        .await;

    let trashed = app
        .request("DELETE", &format!("/api/folders/{team}"), None, Some(&owner.token))
        .await;
    assert_eq!(trashed.status, StatusCode::OK);
    assert_eq!(trashed.data()["trashed"], 3);

    let as_bob = app
        .request("GET", &format!("/api/files/{doc}"), None, Some(&bob.token))
        .await;
    assert_eq!(as_bob.status, StatusCode::NOT_FOUND);

    let with_me = app
        .request("GET", "/api/shares/with-me", None, Some(&bob.token))
        .await;
    assert_eq!(with_me.data().as_array().map(Vec::len), Some(0));

    let root = app
        .request("GET", "/api/folders/root", None, Some(&owner.token))
        .await;
    assert_eq!(root.data().as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_restore_brings_back_access() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    app.create_file(&owner, "doc.txt", Some(&team)).await;
    app.share(&owner, "folders", &team, "bob@example.com", "view")
        .await;

    app.request("DELETE", &format!("/api/folders/{team}"), None, Some(&owner.token))
        .await;
    let restored = app
        .request(
            "POST",
            &format!("/api/folders/{team}/restore"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(restored.status, StatusCode::OK);
    assert_eq!(restored.data()["isDeleted"], false);

    let contents = app
        .request(
            "GET",
            &format!("/api/folders/{team}/contents"),
            None,
            Some(&bob.token),
        )
        .await;
    assert_eq!(contents.status, StatusCode::OK);
    assert_eq!(contents.item_names(), vec!["doc.txt"]);
    assert_eq!(contents.data()["permission"], "view");
}

#[tokio::test]
async fn test_restore_requires_ownership() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let alice = app.user("alice@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    app.share(&owner, "files", &doc, "alice@example.com", "edit")
        .await;

    let trashed = app
        .request("DELETE", &format!("/api/files/{doc}"), None, Some(&alice.token))
        .await;
    assert_eq!(trashed.status, StatusCode::OK);

    let restore = app
        .request(
            "POST",
            &format!("/api/files/{doc}/restore"),
            None,
            Some(&alice.token),
        )
        .await;
    assert_eq!(restore.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_restore_under_trashed_parent_conflicts() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    let doc = app.create_file(&owner, "doc.txt", Some(&team)).await;

    app.request("DELETE", &format!("/api/files/{doc}"), None, Some(&owner.token))
        .await;
    app.request("DELETE", &format!("/api/folders/{team}"), None, Some(&owner.token))
        .await;

    let response = app
        .request(
            "POST",
            &format!("/api/files/{doc}/restore"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_purge_requires_trash_first() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    let purge_path = format!("/api/files/{doc}/permanent");

    let early = app
        .request("DELETE", &purge_path, None, Some(&owner.token))
        .await;
    assert_eq!(early.status, StatusCode::CONFLICT);

    app.request("DELETE", &format!("/api/files/{doc}"), None, Some(&owner.token))
        .await;
    let purged = app
        .request("DELETE", &purge_path, None, Some(&owner.token))
        .await;
    assert_eq!(purged.status, StatusCode::OK);

    let gone = app
        .request("GET", &format!("/api/files/{doc}"), None, Some(&owner.token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_trash() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    app.create_file(&owner, "a.txt", Some(&team)).await;
    let loose = app.create_file(&owner, "b.txt", None).await;

    app.request("DELETE", &format!("/api/folders/{team}"), None, Some(&owner.token))
        .await;
    app.request("DELETE", &format!("/api/files/{loose}"), None, Some(&owner.token))
        .await;

    let listed = app
        .request("GET", "/api/trash", None, Some(&owner.token))
        .await;
    assert_eq!(listed.data().as_array().map(Vec::len), Some(2));

    let emptied = app
        .request("DELETE", "/api/trash", None, Some(&owner.token))
        .await;
    assert_eq!(emptied.status, StatusCode::OK);
    assert_eq!(emptied.data()["successCount"], 3);
    assert_eq!(emptied.data()["errorCount"], 0);

    let after = app
        .request("GET", "/api/trash", None, Some(&owner.token))
        .await;
    assert_eq!(after.data().as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_owner_purges_guest_uploads_in_shared_folder() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let alice = app.user("alice@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    app.share(&owner, "folders", &team, "alice@example.com", "edit")
        .await;
    app.create_file(&alice, "x.txt", Some(&team)).await;

    app.request("DELETE", &format!("/api/folders/{team}"), None, Some(&owner.token))
        .await;

    let alice_trash = app
        .request("GET", "/api/trash", None, Some(&alice.token))
        .await;
    assert_eq!(alice_trash.data().as_array().map(Vec::len), Some(0));

    let purged = app
        .request(
            "DELETE",
            &format!("/api/folders/{team}/permanent"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(purged.status, StatusCode::OK);

    let owner_trash = app
        .request("GET", "/api/trash", None, Some(&owner.token))
        .await;
    assert_eq!(owner_trash.data().as_array().map(Vec::len), Some(0));
}
