use std::fs;

use axum::http::StatusCode;
use axum_test::TestServer;
use switchboard::api::create_router;
use switchboard::flags::{Environment, FlagManifest, FlagRecord, FlagResolver, ManifestLoader};
use switchboard::store::{CreateTaskInput, RecordStore};
use tempfile::TempDir;

const SEARCH_OFF_EXPORT_ON: &str = r#"{
    "environment": "stage",
    "features": {
        "search": { "enabled": false },
        "export": { "enabled": true }
    }
}"#;

fn write_manifest(dir: &TempDir, content: &str) {
    fs::write(dir.path().join("stage.json"), content).expect("Failed to write manifest");
}

/// Builds a server over a temp manifest dir. The dir handle is returned so
/// reload tests can edit the manifest under the running server.
fn setup(manifest: &str) -> (TestServer, TempDir, RecordStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_manifest(&dir, manifest);

    let resolver = FlagResolver::new(ManifestLoader::new(dir.path()), Environment::Stage);
    let store = RecordStore::open_memory();
    let app = create_router(resolver, store.clone()).expect("Failed to build router");

    (
        TestServer::new(app).expect("Failed to create test server"),
        dir,
        store,
    )
}

mod flag_queries {
    use super::*;

    #[tokio::test]
    async fn returns_the_full_manifest() {
        let (server, _dir, _store) = setup(SEARCH_OFF_EXPORT_ON);

        let response = server.get("/api/v1/flags").await;

        response.assert_status_ok();
        let manifest: FlagManifest = response.json();
        assert_eq!(manifest.environment, Environment::Stage);
        assert_eq!(manifest.features.len(), 2);
        assert!(manifest.features["export"].enabled);
        assert!(!manifest.features["search"].enabled);
    }

    #[tokio::test]
    async fn describes_a_defined_flag() {
        let (server, _dir, _store) = setup(SEARCH_OFF_EXPORT_ON);

        let response = server.get("/api/v1/flags/search").await;

        response.assert_status_ok();
        let record: FlagRecord = response.json();
        assert!(!record.enabled);
    }

    #[tokio::test]
    async fn reports_an_unknown_flag_as_not_found() {
        let (server, _dir, _store) = setup(SEARCH_OFF_EXPORT_ON);

        let response = server.get("/api/v1/flags/ghost_feature").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_an_empty_manifest_when_the_source_is_broken() {
        let (server, _dir, _store) = setup("{ not json");

        let response = server.get("/api/v1/flags").await;

        response.assert_status_ok();
        let manifest: FlagManifest = response.json();
        assert!(manifest.features.is_empty());
    }
}

mod capability_mounting {
    use super::*;

    #[tokio::test]
    async fn routes_requests_to_an_enabled_capability() {
        let (server, _dir, store) = setup(SEARCH_OFF_EXPORT_ON);
        store
            .create_task(CreateTaskInput {
                title: "Write the quarterly report".to_string(),
            })
            .expect("Failed to create task");

        let response = server.get("/api/v1/export/tasks").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["count"], 1);
        assert_eq!(body["tasks"][0]["title"], "Write the quarterly report");
    }

    #[tokio::test]
    async fn a_disabled_capability_is_not_found_not_forbidden() {
        let (server, _dir, _store) = setup(SEARCH_OFF_EXPORT_ON);

        let response = server.get("/api/v1/search/tasks?q=report").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_works_when_its_flag_is_enabled() {
        let (server, _dir, store) = setup(r#"{
            "environment": "stage",
            "features": { "search": { "enabled": true } }
        }"#);
        store
            .create_task(CreateTaskInput {
                title: "Fix the login page".to_string(),
            })
            .expect("Failed to create task");
        store
            .create_task(CreateTaskInput {
                title: "Order coffee".to_string(),
            })
            .expect("Failed to create task");

        let response = server.get("/api/v1/search/tasks?q=login").await;

        response.assert_status_ok();
        let tasks: serde_json::Value = response.json();
        assert_eq!(tasks.as_array().map(Vec::len), Some(1));
        assert_eq!(tasks[0]["title"], "Fix the login page");
    }

    #[tokio::test]
    async fn stats_reports_totals_when_enabled() {
        let (server, _dir, store) = setup(r#"{
            "environment": "stage",
            "features": { "stats": { "enabled": true } }
        }"#);
        store
            .create_task(CreateTaskInput {
                title: "One open task".to_string(),
            })
            .expect("Failed to create task");

        let response = server.get("/api/v1/stats/tasks").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["open"], 1);
        assert_eq!(body["done"], 0);
    }

    #[tokio::test]
    async fn a_broken_manifest_mounts_nothing() {
        let (server, _dir, _store) = setup("{ not json");

        server
            .get("/api/v1/export/tasks")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/api/v1/search/tasks?q=x")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/api/v1/stats/tasks")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod reload {
    use super::*;

    #[tokio::test]
    async fn returns_the_new_manifest() {
        let (server, dir, _store) = setup(SEARCH_OFF_EXPORT_ON);

        write_manifest(&dir, r#"{
            "environment": "stage",
            "features": {
                "search": { "enabled": true },
                "export": { "enabled": true }
            }
        }"#);

        let response = server.post("/api/v1/flags/reload").await;

        response.assert_status_ok();
        let manifest: FlagManifest = response.json();
        assert!(manifest.features["search"].enabled);
    }

    #[tokio::test]
    async fn flag_queries_see_the_new_state_immediately() {
        let (server, dir, _store) = setup(SEARCH_OFF_EXPORT_ON);

        write_manifest(&dir, r#"{
            "environment": "stage",
            "features": {
                "search": { "enabled": true },
                "export": { "enabled": false }
            }
        }"#);
        server.post("/api/v1/flags/reload").await.assert_status_ok();

        let manifest: FlagManifest = server.get("/api/v1/flags").await.json();
        assert!(manifest.features["search"].enabled);
        assert!(!manifest.features["export"].enabled);
    }

    #[tokio::test]
    async fn mounted_routes_are_not_rebound_by_reload() {
        let (server, dir, _store) = setup(SEARCH_OFF_EXPORT_ON);

        // Flip both flags and reload. Export was mounted at startup and must
        // stay reachable; search was never mounted and must stay absent.
        write_manifest(&dir, r#"{
            "environment": "stage",
            "features": {
                "search": { "enabled": true },
                "export": { "enabled": false }
            }
        }"#);
        server.post("/api/v1/flags/reload").await.assert_status_ok();

        server.get("/api/v1/export/tasks").await.assert_status_ok();
        server
            .get("/api/v1/search/tasks?q=x")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn a_failed_reload_keeps_the_previous_manifest() {
        let (server, dir, _store) = setup(SEARCH_OFF_EXPORT_ON);

        write_manifest(&dir, "{ broken");
        let response = server.post("/api/v1/flags/reload").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let manifest: FlagManifest = server.get("/api/v1/flags").await.json();
        assert!(manifest.features["export"].enabled);
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let (server, _dir, _store) = setup(SEARCH_OFF_EXPORT_ON);

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
    }
}
