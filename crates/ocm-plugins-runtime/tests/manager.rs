//! End-to-end coverage of discovery: a fixture plugin is a shell script, not
//! a real `ocm-plugins-sdk` binary, since `register_plugins` only ever shells
//! out to `candidate capabilities` and never needs a long-running server for
//! registration itself.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use ocm_plugins_core::Type;
use ocm_plugins_runtime::config::{ConfigEntry, OcmConfig};
use ocm_plugins_runtime::{ManagerError, RegisterOptions, Registries, register_plugins};

fn write_fixture(dir: &Path, name: &str, manifest_json: &str) {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "#!/bin/sh\ncat <<'EOF'\n{manifest_json}\nEOF").unwrap();
    let mut perms = f.metadata().unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
}

fn component_version_manifest(id: &str, types: &[&str]) -> String {
    let types_json: Vec<String> = types.iter().map(|t| format!(r#"{{"type":"{t}"}}"#)).collect();
    format!(
        r#"{{
            "id": "{id}",
            "capabilitySpecs": [
                {{"type": "componentVersionRepository/v1", "supportedTypes": [{}]}}
            ],
            "supportedConfigTypes": []
        }}"#,
        types_json.join(",")
    )
}

#[tokio::test]
async fn registers_a_single_capability_plugin() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "oci-plugin", &component_version_manifest("oci-plugin", &["oci/v1"]));

    let registries = Registries::new();
    let config = OcmConfig::default();
    let ids = register_plugins(dir.path(), &RegisterOptions::default(), &config, &registries).await.unwrap();

    assert_eq!(ids, vec!["oci-plugin".to_string()]);
}

#[tokio::test]
async fn merges_multiple_capability_specs_of_the_same_kind_into_one_plugin_handle() {
    // A plugin whose manifest declares two separate `componentVersionRepository`
    // capability specs (as the SDK builder emits when `register()` is called
    // once per supported type) must still resolve to a single plugin process:
    // the manager groups specs by kind before calling `add_plugin`.
    let dir = tempfile::tempdir().unwrap();
    let manifest = r#"{
        "id": "multi-type-plugin",
        "capabilitySpecs": [
            {"type": "componentVersionRepository/v1", "supportedTypes": [{"type": "oci/v1"}]},
            {"type": "componentVersionRepository/v1", "supportedTypes": [{"type": "git/v1"}]}
        ],
        "supportedConfigTypes": []
    }"#;
    write_fixture(dir.path(), "multi-type-plugin", manifest);

    let registries = Registries::new();
    let config = OcmConfig::default();
    let ids = register_plugins(dir.path(), &RegisterOptions::default(), &config, &registries).await.unwrap();
    assert_eq!(ids, vec!["multi-type-plugin".to_string()]);

    // Both types must have landed in the same registry entry; registering a
    // third, unrelated plugin that claims one of them must fail as a true
    // duplicate, proving the first call actually reserved both types under
    // the one handle rather than silently dropping the second spec.
    write_fixture(dir.path(), "conflicting-plugin", &component_version_manifest("conflicting-plugin", &["git/v1"]));
    let err = register_plugins(dir.path(), &RegisterOptions { only: Some(vec!["conflicting-plugin".to_string()]) }, &config, &registries)
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::Registry(_)));
}

#[tokio::test]
async fn unknown_capability_kind_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = r#"{
        "id": "weird-plugin",
        "capabilitySpecs": [
            {"type": "somethingUnheardOf/v1", "supportedTypes": [{"type": "foo/v1"}]}
        ],
        "supportedConfigTypes": []
    }"#;
    write_fixture(dir.path(), "weird-plugin", manifest);

    let registries = Registries::new();
    let config = OcmConfig::default();
    let err = register_plugins(dir.path(), &RegisterOptions::default(), &config, &registries).await.unwrap_err();
    assert!(matches!(err, ManagerError::UnknownCapabilityKind { .. }));
}

#[tokio::test]
async fn missing_required_config_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = r#"{
        "id": "needs-creds",
        "capabilitySpecs": [
            {"type": "credentialRepository/v1", "supportedTypes": [{"type": "basic/v1"}]}
        ],
        "supportedConfigTypes": ["credentials/v1"]
    }"#;
    write_fixture(dir.path(), "needs-creds", manifest);

    let registries = Registries::new();
    let config = OcmConfig::default();
    let err = register_plugins(dir.path(), &RegisterOptions::default(), &config, &registries).await.unwrap_err();
    assert!(matches!(err, ManagerError::MissingRequiredConfig { .. }));

    let config_with_entry = OcmConfig {
        config_entries: vec![ConfigEntry { ty: Type::with_version("credentials", "v1"), value: serde_json::json!({}) }],
        ..OcmConfig::default()
    };
    let registries = Registries::new();
    let ids = register_plugins(dir.path(), &RegisterOptions::default(), &config_with_entry, &registries).await.unwrap();
    assert_eq!(ids, vec!["needs-creds".to_string()]);
}

#[tokio::test]
async fn files_with_extensions_are_skipped_during_discovery() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "real-plugin", &component_version_manifest("real-plugin", &["oci/v1"]));
    std::fs::write(dir.path().join("README.md"), b"not a plugin").unwrap();

    let registries = Registries::new();
    let config = OcmConfig::default();
    let ids = register_plugins(dir.path(), &RegisterOptions::default(), &config, &registries).await.unwrap();
    assert_eq!(ids, vec!["real-plugin".to_string()]);
}

#[tokio::test]
async fn only_option_restricts_discovery() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "plugin-a", &component_version_manifest("plugin-a", &["oci/v1"]));
    write_fixture(dir.path(), "plugin-b", &component_version_manifest("plugin-b", &["git/v1"]));

    let registries = Registries::new();
    let config = OcmConfig::default();
    let options = RegisterOptions { only: Some(vec!["plugin-a".to_string()]) };
    let ids = register_plugins(dir.path(), &options, &config, &registries).await.unwrap();
    assert_eq!(ids, vec!["plugin-a".to_string()]);
}
