//! Shared fixtures for the HTTP integration tests.
//!
//! Every test drives the real router in-process over an in-memory store
//! seeded with a small repository:
//!
//! ```text
//! Top Community
//! └── Sub Community
//!     └── Theses (collection)
//!         ├── First Thesis (public, versioned)
//!         │   └── ORIGINAL bundle: thesis.pdf, license.txt
//!         └── Private Draft (readable by USER only)
//! Orphans (collection without a community)
//! ```

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;
use uuid::Uuid;

use dspace_rest::{
    api::create_router,
    auth::AuthManager,
    authorize::ResourcePolicyEvaluator,
    config::{Config, DatabaseBackend},
    context::Context,
    db::{Column, JoinTable, MemoryPersistence, Persistence, Table, Window},
    state::AppState,
};

pub const ADMIN: &str = "00000000-0000-0000-0000-0000000000a1";
pub const USER: &str = "00000000-0000-0000-0000-0000000000a2";
/// Administrator through the nested Staff group.
pub const STAFF_MEMBER: &str = "00000000-0000-0000-0000-0000000000a3";

pub const ADMIN_GROUP: &str = "00000000-0000-0000-0000-0000000000b1";
pub const ANONYMOUS_GROUP: &str = "00000000-0000-0000-0000-0000000000b2";
pub const STAFF_GROUP: &str = "00000000-0000-0000-0000-0000000000b3";

pub const TOP_COMMUNITY: &str = "00000000-0000-0000-0000-0000000000c1";
pub const SUB_COMMUNITY: &str = "00000000-0000-0000-0000-0000000000c2";

pub const THESES: &str = "00000000-0000-0000-0000-0000000000d1";
pub const ORPHANS: &str = "00000000-0000-0000-0000-0000000000d2";

pub const PUBLIC_ITEM: &str = "00000000-0000-0000-0000-0000000000e1";
pub const PRIVATE_ITEM: &str = "00000000-0000-0000-0000-0000000000e2";

pub const ORIGINAL_BUNDLE: &str = "00000000-0000-0000-0000-0000000000f1";
pub const THESIS_PDF: &str = "00000000-0000-0000-0000-0000000000f2";
pub const LICENSE_TXT: &str = "00000000-0000-0000-0000-0000000000f3";

/// Never present in the seed.
pub const MISSING: &str = "00000000-0000-0000-0000-0000000000ff";

pub const BASE: &str = "http://localhost:8080";

pub fn seed() -> JsonValue {
    let read_anonymous = |id: i32, resource: &str| {
        json!({ "policy_id": id, "resource_id": resource, "action_id": 0, "epersongroup_id": ANONYMOUS_GROUP })
    };

    json!({
        "eperson": [
            { "uuid": ADMIN, "email": "admin@example.org", "firstname": "Ada", "lastname": "Admin", "can_log_in": true },
            { "uuid": USER, "email": "user@example.org", "firstname": "Uma", "lastname": "User", "can_log_in": true },
            { "uuid": STAFF_MEMBER, "email": "staff@example.org", "can_log_in": true }
        ],
        "epersongroup": [
            { "uuid": ADMIN_GROUP, "name": "Administrator", "permanent": true },
            { "uuid": ANONYMOUS_GROUP, "name": "Anonymous", "permanent": true },
            { "uuid": STAFF_GROUP, "name": "Staff" }
        ],
        "epersongroup2eperson": [
            { "eperson_group_id": ADMIN_GROUP, "eperson_id": ADMIN },
            { "eperson_group_id": STAFF_GROUP, "eperson_id": STAFF_MEMBER }
        ],
        "group2group": [
            { "parent_id": ADMIN_GROUP, "child_id": STAFF_GROUP }
        ],
        "community": [
            { "uuid": TOP_COMMUNITY, "name": "Top Community", "handle": "123456789/1" },
            { "uuid": SUB_COMMUNITY, "name": "Sub Community", "parent_community_id": TOP_COMMUNITY }
        ],
        "collection": [
            { "uuid": THESES, "name": "Theses", "owning_community_id": SUB_COMMUNITY },
            { "uuid": ORPHANS, "name": "Orphans" }
        ],
        "item": [
            { "uuid": PUBLIC_ITEM, "name": "First Thesis", "owning_collection_id": THESES, "in_archive": true },
            { "uuid": PRIVATE_ITEM, "name": "Private Draft", "owning_collection_id": THESES }
        ],
        "bundle": [
            { "uuid": ORIGINAL_BUNDLE, "name": "ORIGINAL", "item_id": PUBLIC_ITEM, "primary_bitstream_id": THESIS_PDF }
        ],
        "bitstream": [
            { "uuid": THESIS_PDF, "name": "thesis.pdf", "bundle_id": ORIGINAL_BUNDLE, "size_bytes": 52000, "mime_type": "application/pdf", "sequence_id": 1 },
            { "uuid": LICENSE_TXT, "name": "license.txt", "bundle_id": ORIGINAL_BUNDLE, "size_bytes": 1200, "mime_type": "text/plain", "sequence_id": 2 }
        ],
        "resourcepolicy": [
            read_anonymous(1, TOP_COMMUNITY),
            read_anonymous(2, SUB_COMMUNITY),
            read_anonymous(3, THESES),
            read_anonymous(4, ORPHANS),
            read_anonymous(5, PUBLIC_ITEM),
            read_anonymous(6, ORIGINAL_BUNDLE),
            read_anonymous(7, THESIS_PDF),
            read_anonymous(8, LICENSE_TXT),
            { "policy_id": 9, "resource_id": PRIVATE_ITEM, "action_id": 0, "eperson_id": USER }
        ],
        "subscription": [
            { "subscription_id": 1, "subscription_type": "content", "eperson_id": USER, "dspace_object_id": THESES, "frequencies": ["D"] }
        ],
        "process": [
            { "process_id": 1, "script_name": "import", "user_id": USER, "status": "COMPLETED",
              "creation_time": "2024-03-01T10:00:00Z", "parameters": "-f data.zip" }
        ],
        "process2bitstream": [
            { "process_id": 1, "bitstream_id": LICENSE_TXT }
        ],
        "versionhistory": [
            { "versionhistory_id": 1 }
        ],
        "versionitem": [
            { "versionitem_id": 1, "version_number": 1, "item_id": PUBLIC_ITEM, "eperson_id": USER,
              "version_date": "2024-03-02T09:30:00Z", "version_summary": "initial", "versionhistory_id": 1 },
            { "versionitem_id": 2, "version_number": 2, "version_date": "2024-03-05T09:30:00Z", "versionhistory_id": 1 }
        ],
        "cwf_claimtask": [
            { "claimtask_id": 1, "workflowitem_id": 7, "workflow_id": "default", "step_id": "reviewstep",
              "action_id": "reviewaction", "owner_id": USER }
        ],
        "license_label": [
            { "label_id": 1, "label": "PUB", "title": "Publicly Available" }
        ],
        "license_definition": [
            { "license_id": 1, "name": "CC-BY", "definition": "https://creativecommons.org/licenses/by/4.0/", "label_id": 1 },
            { "license_id": 2, "name": "Custom", "definition": "https://example.org/custom" }
        ],
        "usage_event": [
            { "event_id": 1, "dspace_object_id": PUBLIC_ITEM, "event_type": "view", "occurred_at": "2024-03-03T00:00:00Z" },
            { "event_id": 2, "dspace_object_id": PUBLIC_ITEM, "event_type": "view", "occurred_at": "2024-03-04T00:00:00Z" },
            { "event_id": 3, "dspace_object_id": PUBLIC_ITEM, "event_type": "view", "occurred_at": "2024-03-05T00:00:00Z" },
            { "event_id": 4, "dspace_object_id": THESIS_PDF, "event_type": "download", "occurred_at": "2024-03-05T00:00:00Z" }
        ]
    })
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.database.backend = DatabaseBackend::Memory;
    config.auth.jwt_secret = Some("integration-test-secret".to_string());
    config.rest.base_url = BASE.to_string();
    config
}

/// Store wrapper counting every persistence call.
pub struct CountingStore {
    inner: MemoryPersistence,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Persistence for CountingStore {
    async fn find(
        &self,
        ctx: &Context,
        table: &Table,
        id: &str,
    ) -> dspace_rest::Result<Option<JsonValue>> {
        self.tick();
        self.inner.find(ctx, table, id).await
    }

    async fn find_all(
        &self,
        ctx: &Context,
        table: &Table,
        window: Window,
    ) -> dspace_rest::Result<Vec<JsonValue>> {
        self.tick();
        self.inner.find_all(ctx, table, window).await
    }

    async fn count(&self, ctx: &Context, table: &Table) -> dspace_rest::Result<u64> {
        self.tick();
        self.inner.count(ctx, table).await
    }

    async fn find_by(
        &self,
        ctx: &Context,
        table: &Table,
        column: &Column,
        value: &str,
        window: Window,
    ) -> dspace_rest::Result<Vec<JsonValue>> {
        self.tick();
        self.inner.find_by(ctx, table, column, value, window).await
    }

    async fn count_by(
        &self,
        ctx: &Context,
        table: &Table,
        column: &Column,
        value: &str,
    ) -> dspace_rest::Result<u64> {
        self.tick();
        self.inner.count_by(ctx, table, column, value).await
    }

    async fn find_linked(
        &self,
        ctx: &Context,
        join: &JoinTable,
        parent_id: &str,
        window: Window,
    ) -> dspace_rest::Result<Vec<JsonValue>> {
        self.tick();
        self.inner.find_linked(ctx, join, parent_id, window).await
    }

    async fn count_linked(
        &self,
        ctx: &Context,
        join: &JoinTable,
        parent_id: &str,
    ) -> dspace_rest::Result<u64> {
        self.tick();
        self.inner.count_linked(ctx, join, parent_id).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `Null` for empty bodies.
    pub body: JsonValue,
}

pub struct TestApp {
    router: Router,
    auth: AuthManager,
    calls: Arc<AtomicUsize>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let store: Arc<dyn Persistence> = Arc::new(CountingStore {
            inner: MemoryPersistence::from_seed(seed()).expect("seed is valid"),
            calls: calls.clone(),
        });
        let evaluator = Arc::new(ResourcePolicyEvaluator::new(store.clone()));
        let auth = AuthManager::new(Arc::new(config.auth.clone()));
        let state = AppState::with_components(config, store, evaluator);

        Self {
            router: create_router(state),
            auth,
            calls,
        }
    }

    pub fn token_for(&self, eperson: &str) -> String {
        let id = Uuid::parse_str(eperson).expect("fixture ids are uuids");
        self.auth.issue_token(id).expect("token signs")
    }

    /// Persistence calls made so far.
    pub fn store_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_store_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<TestResponse> {
        self.request(Method::GET, path, None, &[]).await
    }

    pub async fn get_as(&self, eperson: &str, path: &str) -> anyhow::Result<TestResponse> {
        let token = self.token_for(eperson);
        self.request(Method::GET, path, Some(&token), &[]).await
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        for (name, value) in extra_headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty())?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }
}

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "unexpected status for {context}: got {actual}, expected {expected}"
    );
}

/// Ids of the elements under `_embedded.{key}` of a page.
pub fn page_ids(body: &JsonValue, key: &str) -> Vec<String> {
    body["_embedded"][key]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i["id"].as_str().map(str::to_string).or_else(|| {
                    i["id"].as_i64().map(|n| n.to_string())
                }))
                .collect()
        })
        .unwrap_or_default()
}
