//! Input fixtures: schema registries and a scratch directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// A registry covering maven, raw and docker repositories of every type.
///
/// Proxy defaults declare `httpClient.authentication: null`, so empty
/// authentication blocks are reverted to null.
pub fn schema_registry() -> Value {
    json!({
        "global_defaults": {
            "online": true,
            "storage": {"strictContentTypeValidation": true}
        },
        "type_defaults": {
            "hosted": {"storage": {"writePolicy": "ALLOW_ONCE"}},
            "proxy": {
                "proxy": {"contentMaxAge": 1440, "metadataMaxAge": 1440},
                "negativeCache": {"enabled": true, "timeToLive": 1440},
                "httpClient": {"blocked": false, "autoBlock": true, "authentication": null}
            },
            "group": {"group": {"memberNames": []}}
        },
        "format_defaults": {
            "maven": {"storage": {"blobStoreName": "default"}, "maven": {"versionPolicy": "RELEASE", "layoutPolicy": "STRICT"}},
            "raw": {"storage": {"blobStoreName": "default"}, "raw": {"contentDisposition": "ATTACHMENT"}},
            "docker": {"storage": {"blobStoreName": "default"}, "docker": {"v1Enabled": false, "forceBasicAuth": true}}
        },
        "legacy_field_map": {
            "blob_store": "storage.blobStoreName",
            "strict_content_validation": "storage.strictContentTypeValidation",
            "write_policy": "storage.writePolicy",
            "remote_url": "proxy.remoteUrl",
            "maximum_component_age": "proxy.contentMaxAge",
            "maximum_metadata_age": "proxy.metadataMaxAge",
            "remote_username": "httpClient.authentication.username",
            "remote_password": "httpClient.authentication.password",
            "remote_ntlm_host": "httpClient.authentication.ntlmHost",
            "remote_ntlm_domain": "httpClient.authentication.ntlmDomain",
            "member_repos": "group.memberNames",
            "version_policy": {"maven": {"hosted": "maven.versionPolicy", "proxy": "maven.versionPolicy"}},
            "http_port": {"docker": {"hosted": "docker.httpPort", "proxy": "docker.httpPort", "group": "docker.httpPort"}}
        },
        "schemas": {
            "hosted": {
                "maven": {"required_fields": ["name"]},
                "raw": {"required_fields": ["name"]},
                "docker": {"required_fields": ["name"]}
            },
            "proxy": {
                "maven": {"required_fields": ["name", "proxy.remoteUrl"]},
                "raw": {"required_fields": ["name", "proxy.remoteUrl"]},
                "docker": {"required_fields": ["name", "proxy.remoteUrl"]}
            },
            "group": {
                "maven": {"required_fields": ["name", "group.memberNames"]},
                "raw": {"required_fields": ["name", "group.memberNames"]},
                "docker": {"required_fields": ["name", "group.memberNames"]}
            }
        }
    })
}

/// A temporary directory for input files.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to a file relative to the root, creating parents.
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `value` as pretty JSON.
    pub fn write_json(&self, relative: &str, value: &Value) -> PathBuf {
        self.write(relative, serde_json::to_string_pretty(value).unwrap())
    }

    /// Write [`schema_registry`] as `schemas.json`.
    pub fn write_schema_registry(&self) -> PathBuf {
        self.write_json("schemas.json", &schema_registry())
    }

    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }
}
