use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nexus_core::filters::{normalize_ldap_connections, normalize_local_users};
use nexus_core::{Normalizer, SchemaRegistry, merge_values, path};
use serde_json::{Value, json};

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_value(json!({
        "global_defaults": {"online": true, "storage": {"strictContentTypeValidation": true}},
        "type_defaults": {
            "proxy": {
                "proxy": {"contentMaxAge": 1440, "metadataMaxAge": 1440},
                "negativeCache": {"enabled": true, "timeToLive": 1440},
                "httpClient": {"blocked": false, "autoBlock": true, "authentication": null}
            }
        },
        "format_defaults": {"maven": {"storage": {"blobStoreName": "default"}, "maven": {"versionPolicy": "RELEASE"}}},
        "legacy_field_map": {
            "remote_url": "proxy.remoteUrl",
            "blob_store": "storage.blobStoreName",
            "remote_username": "httpClient.authentication.username",
            "remote_password": "httpClient.authentication.password",
            "version_policy": {"maven": {"proxy": "maven.versionPolicy", "hosted": "maven.versionPolicy"}}
        },
        "schemas": {"proxy": {"maven": {"required_fields": ["name", "proxy.remoteUrl"]}}}
    }))
    .unwrap()
}

fn legacy_records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "name": format!("proxy-{i}"),
                "remote_url": format!("https://mirror-{i}.example.com/maven2/"),
                "blob_store": "fast",
                "version_policy": "MIXED",
                "remote_username": "svc",
                "remote_password": "secret"
            })
        })
        .collect()
}

fn normalize_benchmark(c: &mut Criterion) {
    let registry = registry();
    let normalizer = Normalizer::for_repository(&registry, "proxy", "maven").unwrap();

    c.bench_function("Normalizer::normalize (legacy)", |b| {
        let record = legacy_records(1).remove(0);
        b.iter(|| normalizer.normalize(black_box(&record)).unwrap())
    });

    c.bench_function("Normalizer::normalize_all (100 records)", |b| {
        let records = legacy_records(100);
        b.iter(|| normalizer.normalize_all(black_box(&records)).unwrap())
    });
}

fn path_benchmark(c: &mut Criterion) {
    c.bench_function("path::set (deep)", |b| {
        b.iter(|| {
            let mut data = json!({});
            path::set(&mut data, black_box("httpClient.authentication.ntlmDomain"), json!("corp"));
            data
        })
    });

    c.bench_function("merge_values (nested defaults)", |b| {
        let overlay = json!({"storage": {"blobStoreName": "fast"}, "proxy": {"remoteUrl": "https://x"}});
        b.iter(|| {
            let mut base = json!({"storage": {"strictContentTypeValidation": true}, "proxy": {"contentMaxAge": 1440}});
            merge_values(&mut base, black_box(&overlay));
            base
        })
    });
}

fn filters_benchmark(c: &mut Criterion) {
    let users: Vec<Value> = (0..50)
        .map(|i| json!({"username": format!("user{i}"), "first_name": "U", "roles": ["dev"]}))
        .collect();
    c.bench_function("filters::normalize_local_users (50)", |b| {
        b.iter(|| normalize_local_users(black_box(&users)).unwrap())
    });

    let connections = vec![json!({"ldap_name": "corp", "ldap_group_object_class": "groupOfNames"})];
    c.bench_function("filters::normalize_ldap_connections", |b| {
        b.iter(|| normalize_ldap_connections(black_box(&connections)).unwrap())
    });
}

criterion_group!(benches, normalize_benchmark, path_benchmark, filters_benchmark);
criterion_main!(benches);
