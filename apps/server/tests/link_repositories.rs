#![allow(unused)]
//! Relation endpoints: `/api/{category}/{model}/{id}/{relation}`.

mod support;

use axum::http::StatusCode;
use serde_json::Value as JsonValue;
use support::*;

#[tokio::test]
async fn parent_community_of_collection() -> anyhow::Result<()> {
    let app = TestApp::new();

    let parent = app
        .get(&format!("/api/core/collections/{THESES}/parentCommunity"))
        .await?;
    assert_status(parent.status, StatusCode::OK, "nested collection");
    assert_eq!(parent.body["id"], SUB_COMMUNITY);
    assert_eq!(parent.body["type"], "community");

    let top_level = app
        .get(&format!("/api/core/collections/{ORPHANS}/parentCommunity"))
        .await?;
    assert_status(top_level.status, StatusCode::NO_CONTENT, "top-level collection");
    assert_eq!(top_level.body, JsonValue::Null);

    let missing = app
        .get(&format!("/api/core/collections/{MISSING}/parentCommunity"))
        .await?;
    assert_status(missing.status, StatusCode::NOT_FOUND, "missing collection");
    Ok(())
}

#[tokio::test]
async fn malformed_parent_id_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new();
    for path in [
        "/api/core/collections/nope/parentCommunity",
        "/api/system/processes/x/files",
    ] {
        assert_status(app.get_as(ADMIN, path).await?.status, StatusCode::NOT_FOUND, path);
    }
    Ok(())
}

#[tokio::test]
async fn unknown_relation_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new();
    let res = app
        .get(&format!("/api/core/communities/{TOP_COMMUNITY}/mappedItems"))
        .await?;
    assert_status(res.status, StatusCode::NOT_FOUND, "unknown relation");
    Ok(())
}

#[tokio::test]
async fn community_tree_relations() -> anyhow::Result<()> {
    let app = TestApp::new();

    let subs = app
        .get(&format!("/api/core/communities/{TOP_COMMUNITY}/subcommunities"))
        .await?;
    assert_status(subs.status, StatusCode::OK, "subcommunities");
    assert_eq!(page_ids(&subs.body, "subcommunities"), vec![SUB_COMMUNITY]);
    assert_eq!(subs.body["page"]["totalElements"], 1);
    assert_eq!(
        subs.body["_links"]["self"]["href"],
        format!("{BASE}/api/core/communities/{TOP_COMMUNITY}/subcommunities")
    );

    let collections = app
        .get(&format!("/api/core/communities/{SUB_COMMUNITY}/collections"))
        .await?;
    assert_eq!(page_ids(&collections.body, "collections"), vec![THESES]);

    let top_parent = app
        .get(&format!("/api/core/communities/{TOP_COMMUNITY}/parentCommunity"))
        .await?;
    assert_status(top_parent.status, StatusCode::NO_CONTENT, "top-level community");
    Ok(())
}

#[tokio::test]
async fn item_bundle_and_bitstream_relations() -> anyhow::Result<()> {
    let app = TestApp::new();

    let owning = app
        .get(&format!("/api/core/items/{PUBLIC_ITEM}/owningCollection"))
        .await?;
    assert_eq!(owning.body["id"], THESES);

    let bundles = app.get(&format!("/api/core/items/{PUBLIC_ITEM}/bundles")).await?;
    assert_eq!(page_ids(&bundles.body, "bundles"), vec![ORIGINAL_BUNDLE]);

    let item = app.get(&format!("/api/core/bundles/{ORIGINAL_BUNDLE}/item")).await?;
    assert_eq!(item.body["id"], PUBLIC_ITEM);

    let bitstreams = app
        .get(&format!("/api/core/bundles/{ORIGINAL_BUNDLE}/bitstreams"))
        .await?;
    assert_eq!(
        page_ids(&bitstreams.body, "bitstreams"),
        vec![THESIS_PDF, LICENSE_TXT]
    );
    Ok(())
}

#[tokio::test]
async fn link_gate_uses_the_parent() -> anyhow::Result<()> {
    let app = TestApp::new();
    let path = format!("/api/core/items/{PRIVATE_ITEM}/owningCollection");
    assert_status(app.get(&path).await?.status, StatusCode::UNAUTHORIZED, "anonymous");
    assert_status(app.get_as(USER, &path).await?.status, StatusCode::OK, "policy holder");
    Ok(())
}

#[tokio::test]
async fn versioning_relations() -> anyhow::Result<()> {
    let app = TestApp::new();

    let version = app.get(&format!("/api/core/items/{PUBLIC_ITEM}/version")).await?;
    assert_status(version.status, StatusCode::OK, "item version");
    assert_eq!(version.body["id"], 1);

    let unversioned = app
        .get_as(USER, &format!("/api/core/items/{PRIVATE_ITEM}/version"))
        .await?;
    assert_status(unversioned.status, StatusCode::NO_CONTENT, "unversioned item");

    let history = app.get("/api/versioning/versions/1/versionhistory").await?;
    assert_eq!(history.body["id"], 1);

    let item = app.get("/api/versioning/versions/1/item").await?;
    assert_eq!(item.body["id"], PUBLIC_ITEM);

    let listed = app.get("/api/versioning/versionhistories/1/versions").await?;
    assert_status(listed.status, StatusCode::OK, "anonymous versions");
    assert_eq!(listed.body["page"]["totalElements"], 2);

    let missing = app.get("/api/versioning/versionhistories/99999/versions").await?;
    assert_status(missing.status, StatusCode::NOT_FOUND, "versions of missing history");
    Ok(())
}

#[tokio::test]
async fn eperson_and_group_relations() -> anyhow::Result<()> {
    let app = TestApp::new();

    let members = app
        .get_as(ADMIN, &format!("/api/eperson/groups/{ADMIN_GROUP}/epersons"))
        .await?;
    assert_eq!(page_ids(&members.body, "epersons"), vec![ADMIN]);

    let subgroups = app
        .get_as(ADMIN, &format!("/api/eperson/groups/{ADMIN_GROUP}/subgroups"))
        .await?;
    assert_eq!(page_ids(&subgroups.body, "subgroups"), vec![STAFF_GROUP]);

    let groups = app
        .get_as(STAFF_MEMBER, &format!("/api/eperson/epersons/{STAFF_MEMBER}/groups"))
        .await?;
    assert_eq!(page_ids(&groups.body, "groups"), vec![STAFF_GROUP]);

    let subscriber = app.get_as(USER, "/api/core/subscriptions/1/eperson").await?;
    assert_eq!(subscriber.body["id"], USER);

    let resource = app.get_as(USER, "/api/core/subscriptions/1/resource").await?;
    assert_eq!(resource.body["id"], THESES);
    assert_eq!(resource.body["type"], "collection");
    Ok(())
}

#[tokio::test]
async fn process_files() -> anyhow::Result<()> {
    let app = TestApp::new();
    let files = app.get_as(USER, "/api/system/processes/1/files").await?;
    assert_status(files.status, StatusCode::OK, "process files");
    assert_eq!(page_ids(&files.body, "files"), vec![LICENSE_TXT]);
    Ok(())
}

#[tokio::test]
async fn workflow_relations() -> anyhow::Result<()> {
    let app = TestApp::new();

    let step = app.get_as(USER, "/api/workflow/claimedtasks/1/step").await?;
    assert_eq!(step.body["id"], "reviewstep");

    let action = app.get_as(USER, "/api/workflow/claimedtasks/1/action").await?;
    assert_eq!(action.body["id"], "reviewaction");

    let owner = app.get_as(USER, "/api/workflow/claimedtasks/1/owner").await?;
    assert_eq!(owner.body["id"], USER);

    let actions = app
        .get_as(USER, "/api/config/workflowsteps/reviewstep/workflowactions?size=1")
        .await?;
    assert_eq!(page_ids(&actions.body, "workflowactions"), vec!["claimaction"]);
    assert_eq!(actions.body["page"]["totalElements"], 2);
    Ok(())
}

#[tokio::test]
async fn license_label_relation() -> anyhow::Result<()> {
    let app = TestApp::new();

    let label = app.get("/api/core/clarinlicenses/1/clarinLicenseLabel").await?;
    assert_eq!(label.body["id"], 1);

    let none = app.get("/api/core/clarinlicenses/2/clarinLicenseLabel").await?;
    assert_status(none.status, StatusCode::NO_CONTENT, "license without label");
    Ok(())
}

#[tokio::test]
async fn embeds_resolve_one_level() -> anyhow::Result<()> {
    let app = TestApp::new();

    let item = app
        .get(&format!("/api/core/items/{PUBLIC_ITEM}?embed=owningCollection"))
        .await?;
    assert_eq!(item.body["_embedded"]["owningCollection"]["id"], THESES);
    assert!(item.body["_embedded"].get("bundles").is_none());
    // One level only: the embedded collection carries links, not embeds.
    assert!(item.body["_embedded"]["owningCollection"]
        .get("_embedded")
        .is_none());
    assert!(item.body["_embedded"]["owningCollection"]["_links"]["parentCommunity"].is_object());

    let full = app
        .get(&format!("/api/core/items/{PUBLIC_ITEM}?projection=full"))
        .await?;
    let embedded = &full.body["_embedded"];
    assert_eq!(
        embedded["bundles"]["_embedded"]["bundles"][0]["id"],
        ORIGINAL_BUNDLE
    );
    assert_eq!(embedded["version"]["id"], 1);

    let orphan = app
        .get(&format!("/api/core/collections/{ORPHANS}?embed=parentCommunity"))
        .await?;
    assert_eq!(orphan.body["_embedded"]["parentCommunity"], JsonValue::Null);
    Ok(())
}
