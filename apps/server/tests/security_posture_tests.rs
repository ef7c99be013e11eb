#![allow(unused)]
mod support;

use axum::http::{Method, StatusCode};
use support::*;

#[tokio::test]
async fn security_headers_are_present() -> anyhow::Result<()> {
    let app = TestApp::new();
    let res = app.get("/health").await?;
    assert_status(res.status, StatusCode::OK, "health");

    for (name, expected) in [
        ("x-content-type-options", "nosniff"),
        ("x-frame-options", "DENY"),
        ("referrer-policy", "no-referrer"),
        ("content-security-policy", "default-src 'none'; frame-ancestors 'none'"),
    ] {
        let got = res
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(got, expected, "missing/incorrect header '{}'", name);
    }

    // HSTS should not be set for plain HTTP requests.
    assert!(res.headers.get("strict-transport-security").is_none());
    Ok(())
}

#[tokio::test]
async fn hsts_behind_tls_terminating_proxy() -> anyhow::Result<()> {
    let app = TestApp::new();
    let res = app
        .request(Method::GET, "/health", None, &[("x-forwarded-proto", "https")])
        .await?;
    assert!(res.headers.get("strict-transport-security").is_some());
    Ok(())
}

#[tokio::test]
async fn cors_is_not_permissive_by_default() -> anyhow::Result<()> {
    let app = TestApp::new();
    let res = app
        .request(
            Method::GET,
            "/api",
            None,
            &[("origin", "https://evil.example")],
        )
        .await?;
    assert_status(res.status, StatusCode::OK, "root");
    assert!(
        res.headers.get("access-control-allow-origin").is_none(),
        "expected no permissive CORS by default"
    );
    Ok(())
}

#[tokio::test]
async fn configured_cors_origin_is_allowed() -> anyhow::Result<()> {
    let mut config = test_config();
    config.server.cors_origins = vec!["https://ui.example.org".to_string()];
    let app = TestApp::with_config(config);

    let res = app
        .request(Method::GET, "/api", None, &[("origin", "https://ui.example.org")])
        .await?;
    assert_eq!(
        res.headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://ui.example.org")
    );
    Ok(())
}

#[tokio::test]
async fn errors_do_not_leak_internals() -> anyhow::Result<()> {
    let app = TestApp::new();
    let res = app.get(&format!("/api/core/communities/{MISSING}")).await?;
    let keys: Vec<&String> = res.body.as_object().map(|o| o.keys().collect()).unwrap_or_default();
    assert_eq!(keys, vec!["timestamp", "status", "error", "message"]);
    Ok(())
}

#[tokio::test]
async fn root_lists_every_endpoint() -> anyhow::Result<()> {
    let app = TestApp::new();
    let res = app.get("/api").await?;
    assert_status(res.status, StatusCode::OK, "root");
    let links = &res.body["_links"];
    assert_eq!(links["self"]["href"], format!("{BASE}/api"));
    assert_eq!(links["communities"]["href"], format!("{BASE}/api/core/communities"));
    assert_eq!(links["properties"]["href"], format!("{BASE}/api/config/properties"));
    assert_eq!(
        links["usagereports"]["href"],
        format!("{BASE}/api/statistics/usagereports")
    );
    // 21 entity endpoints plus self.
    assert_eq!(links.as_object().map(|l| l.len()), Some(22));
    Ok(())
}

#[tokio::test]
async fn authn_status_reports_the_caller() -> anyhow::Result<()> {
    let app = TestApp::new();

    let anonymous = app.get("/api/authn/status").await?;
    assert_eq!(anonymous.body["okay"], true);
    assert_eq!(anonymous.body["authenticated"], false);
    assert_eq!(anonymous.body["type"], "status");
    assert!(anonymous.body["_links"].get("eperson").is_none());

    let user = app.get_as(USER, "/api/authn/status").await?;
    assert_eq!(user.body["authenticated"], true);
    assert_eq!(
        user.body["_links"]["eperson"]["href"],
        format!("{BASE}/api/eperson/epersons/{USER}")
    );
    Ok(())
}

#[tokio::test]
async fn metrics_are_exported() -> anyhow::Result<()> {
    let app = TestApp::new();
    app.get(&format!("/api/core/communities/{TOP_COMMUNITY}")).await?;

    let res = app.get("/metrics").await?;
    assert_status(res.status, StatusCode::OK, "metrics");
    let text = res.body.as_str().unwrap_or_default();
    assert!(text.contains("dspace_rest_http_requests_total"));
    assert!(text.contains("route=\"/api/:category/:model/:id\""));
    Ok(())
}
