//! Owner stars and grantee stars over HTTP.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_owner_star_and_starred_listing() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    let doc = app.create_file(&owner, "doc.txt", None).await;

    let starred = app
        .request("POST", &format!("/api/files/{doc}/star"), None, Some(&owner.token))
        .await;
    assert_eq!(starred.status, StatusCode::OK);
    assert_eq!(starred.data()["isStarred"], true);
    app.request("POST", &format!("/api/folders/{team}/star"), None, Some(&owner.token))
        .await;

    let listing = app
        .request("GET", "/api/starred", None, Some(&owner.token))
        .await;
    let names: Vec<&str> = listing
        .data()
        .as_array()
        .map(|items| items.iter().filter_map(|i| i["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Team", "doc.txt"]);

    let unstarred = app
        .request("POST", &format!("/api/files/{doc}/star"), None, Some(&owner.token))
        .await;
    assert_eq!(unstarred.data()["isStarred"], false);
}

#[tokio::test]
async fn test_grantee_star_shows_in_shared_with_me() {
    let app = TestApp::new();
    let owner = app.user("owner@example.com").await;
    let alice = app.user("alice@example.com").await;
    let team = app.create_folder(&owner, "Team", None).await;
    app.share(&owner, "folders", &team, "alice@example.com", "view")
        .await;

    let not_owner = app
        .request("POST", &format!("/api/folders/{team}/star"), None, Some(&alice.token))
        .await;
    assert_eq!(not_owner.status, StatusCode::FORBIDDEN);

    let starred = app
        .request(
            "POST",
            &format!("/api/folders/{team}/star-shared"),
            None,
            Some(&alice.token),
        )
        .await;
    assert_eq!(starred.status, StatusCode::OK);
    assert_eq!(starred.data()["isStarred"], true);

    let with_me = app
        .request("GET", "/api/shares/with-me", None, Some(&alice.token))
        .await;
    assert_eq!(with_me.data()[0]["name"], "Team");
    assert_eq!(with_me.data()[0]["isStarred"], true);

    let as_owner = app
        .request("GET", &format!("/api/folders/{team}"), None, Some(&owner.token))
        .await;
    assert_eq!(as_owner.data()["isStarred"], false);

    let no_grant = app
        .request(
            "POST",
            &format!("/api/folders/{team}/star-shared"),
            None,
            Some(&owner.token),
        )
        .await;
    assert_eq!(no_grant.status, StatusCode::NOT_FOUND);
}
