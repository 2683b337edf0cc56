//! Grant lifecycle and visibility tests over HTTP.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_team_folder_visibility_is_asymmetric() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let team = app.create_folder(&owner, "Team", None).await;
    app.create_file(&owner, "plan.txt", Some(&team)).await;
    assert_eq!(
        app.share(&owner, "folders", &team, "alice@example.com", "edit")
            .await
            .status,
        StatusCode::CREATED
    );
    assert_eq!(
        app.share(&owner, "folders", &team, "bob@example.com", "view")
            .await
            .status,
        StatusCode::CREATED
    );

    app.create_file(&alice, "notes.txt", Some(&team)).await;

    let path = format!("/api/folders/{team}/contents");
    let as_alice = app.request("GET", &path, None, Some(&alice.token)).await;
    let as_bob = app.request("GET", &path, None, Some(&bob.token)).await;
    let as_owner = app.request("GET", &path, None, Some(&owner.token)).await;

    let mut alice_names = as_alice.item_names();
    alice_names.sort();
    assert_eq!(alice_names, vec!["notes.txt", "plan.txt"]);
    assert_eq!(as_alice.data()["permission"], "edit");
    assert_eq!(as_bob.item_names(), vec!["plan.txt"]);
    assert_eq!(as_bob.data()["permission"], "view");
    assert_eq!(as_owner.item_names(), vec!["plan.txt"]);
    assert_eq!(as_owner.data()["permission"], "owner");
}

#[tokio::test]
async fn test_viewer_cannot_add_to_shared_folder() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;

    let team = app.create_folder(&owner, "Team", None).await;
    app.share(&owner, "folders", &team, "bob@example.com", "view")
        .await;

    let response = app
        .request(
            "POST",
            "/api/files",
            Some(json!({ "name": "x.txt", "folderId": team })),
            Some(&bob.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_resharing_updates_permission() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;

    let first = app
        .share(&owner, "folders", &team, "bob@example.com", "view")
        .await;
    let second = app
        .share(&owner, "folders", &team, "  BOB@example.com ", "edit")
        .await;

    assert_eq!(first.data()["created"], true);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.data()["created"], false);
    assert_eq!(second.data()["share"]["permission"], "edit");
    assert_eq!(
        first.data()["share"]["id"],
        second.data()["share"]["id"],
        "re-sharing must not create a second grant"
    );

    let shares = app
        .request(
            "GET",
            &format!("/api/folders/{team}/shares"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(shares.data().as_array().map(Vec::len), Some(1));
    assert_eq!(shares.data()[0]["granteeId"], bob.id);
}

#[tokio::test]
async fn test_share_rejects_unknown_and_self() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;

    let unknown = app
        .share(&owner, "folders", &team, "ghost@example.com", "view")
        .await;
    let malformed = app
        .share(&owner, "folders", &team, "not-an-email", "view")
        .await;
    let self_share = app
        .share(&owner, "folders", &team, "owner@example.com", "view")
        .await;

    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(self_share.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_owner_administers_grants() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let alice = app.user("alice@example.com").await;
    app.user("carol@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    app.share(&owner, "folders", &team, "alice@example.com", "edit")
        .await;

    let response = app
        .share(&alice, "folders", &team, "carol@example.com", "view")
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_revoke_removes_access() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    let created = app
        .share(&owner, "folders", &team, "bob@example.com", "view")
        .await;
    let share_id = created.data()["share"]["id"]
        .as_str()
        .expect("share id")
        .to_string();

    let revoked = app
        .request(
            "DELETE",
            &format!("/api/folders/{team}/shares/{share_id}"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(revoked.status, StatusCode::OK);

    let after = app
        .request(
            "GET",
            &format!("/api/folders/{team}/contents"),
            None,
            Some(&bob.token),
        )
        .await;
    assert_eq!(after.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_share_changes_permission() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    let created = app
        .share(&owner, "files", &doc, "bob@example.com", "view")
        .await;
    let share_id = created.data()["share"]["id"]
        .as_str()
        .expect("share id")
        .to_string();

    let updated = app
        .request(
            "PATCH",
            &format!("/api/files/{doc}/shares/{share_id}"),
            Some(json!({ "permission": "edit" })),
            Some(&owner.token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["permission"], "edit");

    let renamed = app
        .request(
            "PATCH",
            &format!("/api/files/{doc}"),
            Some(json!({ "name": "renamed.txt" })),
            Some(&bob.token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.data()["name"], "renamed.txt");
}

#[tokio::test]
async fn test_leave_share() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    let doc = app.create_file(&owner, "doc.txt", None).await;
    app.share(&owner, "files", &doc, "bob@example.com", "view")
        .await;

    let left = app
        .request(
            "DELETE",
            &format!("/api/files/{doc}/shares/me"),
            None,
            Some(&bob.token),
        )
        .await;
    assert_eq!(left.status, StatusCode::OK);

    let with_me = app
        .request("GET", "/api/shares/with-me", None, Some(&bob.token))
        .await;
    assert_eq!(with_me.data().as_array().map(Vec::len), Some(0));

    let again = app
        .request(
            "DELETE",
            &format!("/api/files/{doc}/shares/me"),
            None,
            Some(&bob.token),
        )
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shared_listings() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    app.user("carol@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    app.share(&owner, "folders", &team, "bob@example.com", "view")
        .await;
    app.share(&owner, "folders", &team, "carol@example.com", "edit")
        .await;

    let with_me = app
        .request("GET", "/api/shares/with-me", None, Some(&bob.token))
        .await;
    assert_eq!(with_me.status, StatusCode::OK);
    assert_eq!(with_me.data()[0]["name"], "Team");
    assert_eq!(with_me.data()[0]["permission"], "view");
    assert_eq!(with_me.data()[0]["sharedBy"]["email"], "owner@example.com");

    let by_me = app
        .request("GET", "/api/shares/by-me", None, Some(&owner.token))
        .await;
    assert_eq!(by_me.data().as_array().map(Vec::len), Some(1));
    assert_eq!(by_me.data()[0]["sharedWithCount"], 2);
    assert_eq!(by_me.data()[0]["hasPublicLink"], false);
}

#[tokio::test]
async fn test_remove_all_trashes_item() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let bob = app.user("bob@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    app.share(&owner, "folders", &team, "bob@example.com", "view")
        .await;
    app.request(
        "POST",
        &format!("/api/folders/{team}/share-link"),
        Some(json!({})),
        Some(&owner.token),
    )
    .await;

    let removed = app
        .request(
            "DELETE",
            &format!("/api/folders/{team}/shares/all"),
            None,
            Some(&owner.token),
        )
        .await;

    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.data()["grantsRemoved"], 1);
    assert_eq!(removed.data()["linkRemoved"], true);
    assert_eq!(removed.data()["trashed"], 1);

    let trash = app
        .request("GET", "/api/trash", None, Some(&owner.token))
        .await;
    assert_eq!(trash.data()[0]["id"], team);

    let as_bob = app
        .request(
            "GET",
            &format!("/api/folders/{team}"),
            None,
            Some(&bob.token),
        )
        .await;
    assert_eq!(as_bob.status, StatusCode::NOT_FOUND);
}
