//! Normalized configuration driving the REST operations
//!
//! Runs against a scripted transport: normalize the fixture repositories,
//! look them up through the repository cache, then publish an artifact and
//! settle the token settings.

use std::path::PathBuf;

use chrono::Duration;
use nexus_client::{
    ComponentSpec, ComponentState, Credentials, Method, NexusClient, RepositoryCache, TokenState, UserTokenSettings,
    reconcile_raw_component, reconcile_user_tokens,
};
use nexus_core::{ConfigStore, SchemaRegistry, normalize_repositories};
use nexus_test_utils::{ManualClock, MockTransport, TestWorkspace, empty_response, json_response};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const BASE: &str = "https://nexus.example.com";
const SETTINGS_URL: &str = "https://nexus.example.com/service/rest/v1/repositorySettings";

fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/nexus")
        .join(relative)
}

fn normalized_maven_proxies() -> Vec<Value> {
    let registry = SchemaRegistry::load(fixture("schemas.yaml")).unwrap();
    let records: Vec<Value> = ConfigStore::new()
        .load(&fixture("repositories/maven-proxy.yaml"))
        .unwrap();
    normalize_repositories(&records, "proxy", "maven", &registry).unwrap()
}

#[test]
fn test_missing_repositories_found_through_cache() {
    let transport = MockTransport::new().route(
        Method::Get,
        SETTINGS_URL,
        json_response(
            200,
            json!([
                {"name": "maven-central", "format": "maven2", "type": "proxy", "online": true},
                {"name": "google-maven", "format": "maven2", "type": "hosted", "online": true}
            ]),
        ),
    );
    let client = NexusClient::new(BASE, Credentials::new("admin", "admin123"), &transport);
    let clock = ManualClock::fixed();
    let mut cache = RepositoryCache::with_clock(&clock);

    let missing: Vec<String> = normalized_maven_proxies()
        .iter()
        .filter_map(|repository| repository["name"].as_str())
        .filter(|name| {
            cache
                .get_repository(&client, name, Some("proxy"), Some("maven2"))
                .unwrap()
                .is_none()
        })
        .map(String::from)
        .collect();

    // google-maven exists but as a hosted repository.
    assert_eq!(missing, vec!["google-maven", "corp-proxy"]);
    assert_eq!(transport.requests().len(), 1);

    clock.advance(Duration::minutes(6));
    cache.get_repository(&client, "maven-central", None, None).unwrap();
    assert_eq!(transport.requests().len(), 2);
}

#[test]
fn test_publish_artifact_twice_is_idempotent() {
    let workspace = TestWorkspace::new();
    let source = workspace.write("dist/settings.xml", "<settings/>");
    let search_url = "https://nexus.example.com/service/rest/v1/search/assets?repository=configs&name=/maven/settings.xml&sort=version&direction=desc";
    let upload_url = "https://nexus.example.com/service/rest/v1/components?repository=configs";

    let spec = ComponentSpec {
        repository: "configs".into(),
        name: "settings.xml".into(),
        dest: "maven".into(),
        source: Some(source),
        state: ComponentState::Present,
    };
    let details = || json_response(200, json!({"name": "configs", "format": "raw", "type": "hosted"}));

    let before_upload = MockTransport::new()
        .route(Method::Get, "https://nexus.example.com/service/rest/v1/repositories/configs", details())
        .route(Method::Get, search_url, json_response(200, json!({"items": []})))
        .route(Method::Post, upload_url, empty_response(204));
    let client = NexusClient::new(BASE, Credentials::new("admin", "admin123"), &before_upload);
    let first = reconcile_raw_component(&client, &spec, false).unwrap();
    assert!(first.changed);

    let after_upload = MockTransport::new()
        .route(Method::Get, "https://nexus.example.com/service/rest/v1/repositories/configs", details())
        .route(
            Method::Get,
            search_url,
            json_response(200, json!({"items": [{"id": "Y29uZmlncw", "path": "/maven/settings.xml"}]})),
        );
    let client = NexusClient::new(BASE, Credentials::new("admin", "admin123"), &after_upload);
    let second = reconcile_raw_component(&client, &spec, false).unwrap();
    assert!(!second.changed);
    assert_eq!(second.component_id.as_deref(), Some("Y29uZmlncw"));
    assert!(after_upload.requests_with(Method::Post).is_empty());
}

#[test]
fn test_token_settings_converge() {
    let tokens_url = "https://nexus.example.com/service/rest/v1/security/user-tokens";
    let desired = UserTokenSettings::desired(TokenState::Enabled, true, false, 30);
    let enabled = serde_json::to_value(desired).unwrap();

    let transport = MockTransport::new()
        .respond(json_response(
            200,
            json!({"enabled": false, "protectContent": false, "expirationEnabled": false, "expirationDays": 30}),
        ))
        .route(Method::Put, tokens_url, json_response(200, enabled.clone()))
        .respond(json_response(200, enabled));
    let client = NexusClient::new(BASE, Credentials::new("admin", "admin123"), &transport);

    assert!(reconcile_user_tokens(&client, &desired, false).unwrap().changed);
    assert!(!reconcile_user_tokens(&client, &desired, false).unwrap().changed);
    assert_eq!(transport.requests_with(Method::Put).len(), 1);
}
