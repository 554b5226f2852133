//! Normalization of the checked-in configuration fixtures
//!
//! Loads the schema registry and input files from `test-fixtures/nexus` the
//! same way the CLI does and compares against the expected API payloads.

use std::path::PathBuf;

use nexus_core::filters::{
    normalize_cleanup_policies, normalize_content_selectors, normalize_ldap_connections, normalize_local_users,
    normalize_security_realms,
};
use nexus_core::{ConfigStore, Normalizer, SchemaRegistry, normalize_repositories};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Map, Value, json};

fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/nexus")
        .join(relative)
}

fn load<T: serde::de::DeserializeOwned>(relative: &str) -> T {
    ConfigStore::new().load(&fixture(relative)).unwrap()
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::load(fixture("schemas.yaml")).unwrap()
}

#[test]
fn test_maven_proxy_matches_expected_payloads() {
    let records: Vec<Value> = load("repositories/maven-proxy.yaml");
    let expected: Vec<Value> = load("expected/maven-proxy.json");

    let normalized = normalize_repositories(&records, "proxy", "maven", &registry()).unwrap();

    assert_eq!(normalized, expected);
}

#[test]
fn test_batch_leaves_input_untouched() {
    let records: Vec<Value> = load("repositories/maven-proxy.yaml");
    let before = records.clone();

    normalize_repositories(&records, "proxy", "maven", &registry()).unwrap();

    assert_eq!(records, before);
}

#[test]
fn test_docker_per_type_mappings() {
    let registry = registry();
    let by_type: Map<String, Value> = load("repositories/docker.yaml");

    let normalize = |repo_type: &str| -> Value {
        let records = by_type[repo_type].as_array().unwrap();
        let normalizer = Normalizer::for_repository(&registry, repo_type, "docker").unwrap();
        normalizer.normalize_all(records).unwrap().remove(0)
    };

    let hosted = normalize("hosted");
    assert_eq!(hosted["docker"], json!({"v1Enabled": true, "forceBasicAuth": true, "httpPort": 8082}));
    assert_eq!(hosted["storage"]["writePolicy"], "ALLOW");
    assert_eq!(hosted["storage"]["blobStoreName"], "docker");
    assert_eq!(hosted["component"]["proprietaryComponents"], false);

    let proxy = normalize("proxy");
    assert_eq!(proxy["dockerProxy"]["indexType"], "HUB");
    assert_eq!(proxy["docker"]["httpPort"], 8083);
    assert_eq!(proxy["httpClient"]["authentication"], Value::Null);
    assert!(proxy.get("index_type").is_none());

    let group = normalize("group");
    assert_eq!(group["group"]["memberNames"], json!(["docker-hosted", "docker-hub"]));
    assert_eq!(group["docker"]["httpPort"], 8084);
    assert!(group.get("member_repos").is_none());
}

#[test]
fn test_pair_scoped_mapping_does_not_leak() {
    let records = vec![json!({"name": "docker-hosted", "index_type": "HUB"})];

    let normalized = normalize_repositories(&records, "hosted", "docker", &registry()).unwrap();

    // index_type is only a legacy key for docker proxies, so it stays as caller data.
    assert_eq!(normalized[0]["index_type"], "HUB");
    assert!(normalized[0].get("dockerProxy").is_none());
}

#[rstest]
#[case("proxy", "npm")]
#[case("hosted", "pypi")]
fn test_unregistered_pairs(#[case] repo_type: &str, #[case] repo_format: &str) {
    let err = normalize_repositories(&[], repo_type, repo_format, &registry()).unwrap_err();
    assert!(matches!(err, nexus_core::Error::SchemaNotFound { .. }));
}

#[test]
fn test_realms_follow_mapping_order() {
    let mappings: Map<String, Value> = load("filters/realm-mappings.yaml");
    let flags: Value = load("filters/realms.yaml");

    let realms = normalize_security_realms(&flags, &mappings).unwrap();

    assert_eq!(realms, vec!["NexusAuthenticatingRealm", "LdapRealm", "DockerToken", "rutauth-realm"]);
}

#[test]
fn test_users_mixed_dialects() {
    let users: Vec<Value> = load("filters/users.yaml");

    let normalized = normalize_local_users(&users).unwrap();

    assert_eq!(
        normalized[0],
        json!({
            "userId": "deployer",
            "firstName": "Deploy",
            "lastName": "Bot",
            "emailAddress": "deploy@example.com",
            "source": "default",
            "status": "active",
            "readOnly": false,
            "roles": ["nx-deploy"]
        })
    );
    assert_eq!(normalized[1], users[1]);
}

#[test]
fn test_selectors_mixed_dialects() {
    let selectors: Vec<Value> = load("filters/selectors.yaml");

    let normalized = normalize_content_selectors(&selectors).unwrap();

    assert_eq!(
        normalized[0],
        json!({
            "name": "docker-only",
            "type": "csel",
            "description": "Docker images only",
            "expression": "format == \"docker\""
        })
    );
    assert_eq!(normalized[1], selectors[1]);
}

#[test]
fn test_ldap_static_and_dynamic_groups() {
    let connections: Vec<Value> = load("filters/ldap.yaml");

    let normalized = normalize_ldap_connections(&connections).unwrap();

    assert_eq!(
        normalized[0],
        json!({
            "name": "corp-ldap",
            "protocol": "ldaps",
            "host": "ldap.corp.example",
            "port": 636,
            "searchBase": "dc=corp,dc=example",
            "authScheme": "SIMPLE",
            "authUsername": "cn=nexus,ou=services,dc=corp,dc=example",
            "authPassword": "bind-secret",
            "connectionTimeoutSeconds": 30,
            "connectionRetryDelaySeconds": 300,
            "maxIncidentsCount": 3,
            "useTrustStore": false,
            "userBaseDn": "ou=people",
            "userIdAttribute": "uid",
            "userRealNameAttribute": "cn",
            "userEmailAddressAttribute": "mail",
            "userObjectClass": "inetOrgPerson",
            "ldapGroupsAsRoles": true,
            "groupBaseDn": "ou=groups",
            "groupSubtree": false,
            "userSubtree": false,
            "groupType": "STATIC",
            "groupObjectClass": "groupOfNames",
            "groupIdAttribute": "cn",
            "groupMemberAttribute": "member",
            "groupMemberFormat": "uid=${username},ou=people,dc=corp,dc=example"
        })
    );

    let dynamic = &normalized[1];
    assert_eq!(dynamic["groupType"], "DYNAMIC");
    assert_eq!(dynamic["userMemberOfAttribute"], "memberOf");
    assert_eq!(dynamic["protocol"], "LDAP");
    assert_eq!(dynamic["authScheme"], "NONE");
    assert_eq!(dynamic["searchBase"], "dc=example,dc=com");
}

#[test]
fn test_cleanup_policies_flattened() {
    let policies: Vec<Value> = load("filters/cleanup.yaml");

    let normalized = normalize_cleanup_policies(&policies).unwrap();

    assert_eq!(
        normalized,
        vec![
            json!({
                "name": "snapshots-weekly",
                "format": "maven2",
                "notes": "Remove stale snapshots",
                "criteriaLastBlobUpdated": 7,
                "criteriaLastDownloaded": 14,
                "criteriaReleaseType": "PRERELEASES",
                "criteriaAssetRegex": ".*-SNAPSHOT.*"
            }),
            json!({
                "name": "docker-untagged",
                "format": "docker",
                "criteriaLastDownloaded": 30,
                "criteriaAssetRegex": ".*:<none>$"
            }),
        ]
    );
}
