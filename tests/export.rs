#![cfg(feature = "export")]

use latchkey::{Container, ContainerManifest, DefinitionKind};

#[test]
fn manifest_reflects_registration_state() {
    let container = Container::new();
    container.set_value("config", 1u8);
    container.set_factory("service", |_| "svc".to_string());
    container.bind("api", "service");
    container.tag("service", ["boot"]);
    container.transient("service");

    let manifest = ContainerManifest::from_container(&container);

    assert_eq!(manifest.entries.len(), 2);
    let config = manifest.entries.iter().find(|e| e.id == "config").unwrap();
    assert_eq!(config.kind, DefinitionKind::Value);
    assert!(!config.transient);

    let service = manifest.entries.iter().find(|e| e.id == "service").unwrap();
    assert_eq!(service.kind, DefinitionKind::Factory);
    assert!(service.transient);

    assert_eq!(manifest.bindings.get("api").map(String::as_str), Some("service"));
    assert_eq!(manifest.tags.get("boot").map(Vec::len), Some(1));
    assert_eq!(manifest.transients, vec!["service".to_string()]);
}

#[test]
fn manifest_serializes_to_stable_json() {
    let container = Container::new();
    container.set_value("b", 1u8);
    container.set_value("a", 2u8);

    let manifest = ContainerManifest::from_container(&container);
    let json = manifest.to_json().unwrap();

    // Entries are sorted by identifier for reproducible output.
    let a_pos = json.find("\"a\"").unwrap();
    let b_pos = json.find("\"b\"").unwrap();
    assert!(a_pos < b_pos);

    let parsed: ContainerManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.entries.len(), 2);
}
