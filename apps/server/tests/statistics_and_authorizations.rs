#![allow(unused)]
//! Usage reports and authorization features.

mod support;

use axum::http::StatusCode;
use support::*;

#[tokio::test]
async fn usage_reports_count_events_of_the_object() -> anyhow::Result<()> {
    let app = TestApp::new();

    let visits = app
        .get(&format!("/api/statistics/usagereports/{PUBLIC_ITEM}_TotalVisits"))
        .await?;
    assert_status(visits.status, StatusCode::OK, "visits");
    assert_eq!(visits.body["id"], format!("{PUBLIC_ITEM}_TotalVisits"));
    assert_eq!(visits.body["reportType"], "TotalVisits");
    assert_eq!(visits.body["points"][0]["values"]["views"], 3);
    assert_eq!(visits.body["points"][0]["label"], "First Thesis");

    // Downloads of the item's bitstream are not downloads of the item.
    let item_downloads = app
        .get(&format!("/api/statistics/usagereports/{PUBLIC_ITEM}_TotalDownloads"))
        .await?;
    assert_eq!(item_downloads.body["points"][0]["values"]["views"], 0);

    let downloads = app
        .get(&format!("/api/statistics/usagereports/{THESIS_PDF}_TotalDownloads"))
        .await?;
    assert_eq!(downloads.body["points"][0]["values"]["views"], 1);
    Ok(())
}

#[tokio::test]
async fn usage_reports_respect_object_permissions() -> anyhow::Result<()> {
    let app = TestApp::new();
    let path = format!("/api/statistics/usagereports/{PRIVATE_ITEM}_TotalVisits");
    assert_status(app.get(&path).await?.status, StatusCode::UNAUTHORIZED, "anonymous");
    assert_status(app.get_as(USER, &path).await?.status, StatusCode::OK, "reader");

    let unknown_type = format!("/api/statistics/usagereports/{PUBLIC_ITEM}_TopCountries");
    assert_status(app.get(&unknown_type).await?.status, StatusCode::NOT_FOUND, "report type");
    Ok(())
}

#[tokio::test]
async fn admin_only_statistics() -> anyhow::Result<()> {
    let mut config = test_config();
    config.statistics.admin_only = true;
    let app = TestApp::with_config(config);

    let path = format!("/api/statistics/usagereports/{PUBLIC_ITEM}_TotalVisits");
    assert_status(app.get(&path).await?.status, StatusCode::UNAUTHORIZED, "anonymous");
    assert_status(app.get_as(USER, &path).await?.status, StatusCode::FORBIDDEN, "user");
    assert_status(app.get_as(ADMIN, &path).await?.status, StatusCode::OK, "admin");
    Ok(())
}

#[tokio::test]
async fn subscribe_feature_for_the_caller() -> anyhow::Result<()> {
    let app = TestApp::new();
    let id = format!("{USER}_canSubscribeDso_core.collection_{THESES}");
    let path = format!("/api/authz/authorizations/{id}");

    let granted = app.get_as(USER, &path).await?;
    assert_status(granted.status, StatusCode::OK, "own authorization");
    assert_eq!(granted.body["id"], id);
    assert_eq!(granted.body["type"], "authorization");
    assert_eq!(
        granted.body["_links"]["object"]["href"],
        format!("{BASE}/api/core/collections/{THESES}")
    );

    // Asking about someone else needs administrator rights.
    assert_status(app.get(&path).await?.status, StatusCode::UNAUTHORIZED, "anonymous asks");
    assert_status(app.get_as(ADMIN, &path).await?.status, StatusCode::OK, "admin asks");

    let anonymous_form = format!("/api/authz/authorizations/canSubscribeDso_core.collection_{THESES}");
    assert_status(
        app.get(&anonymous_form).await?.status,
        StatusCode::NOT_FOUND,
        "anonymous cannot subscribe",
    );
    Ok(())
}

#[tokio::test]
async fn administrator_feature() -> anyhow::Result<()> {
    let app = TestApp::new();
    let admin = format!("/api/authz/authorizations/{ADMIN}_administratorOf_core.community_{TOP_COMMUNITY}");
    assert_status(app.get_as(ADMIN, &admin).await?.status, StatusCode::OK, "admin");

    let user = format!("/api/authz/authorizations/{USER}_administratorOf_core.community_{TOP_COMMUNITY}");
    assert_status(app.get_as(USER, &user).await?.status, StatusCode::NOT_FOUND, "user");

    let wrong_type = format!("/api/authz/authorizations/{ADMIN}_administratorOf_core.item_{TOP_COMMUNITY}");
    assert_status(app.get_as(ADMIN, &wrong_type).await?.status, StatusCode::NOT_FOUND, "type mismatch");
    Ok(())
}
