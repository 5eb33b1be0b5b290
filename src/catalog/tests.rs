//! Catalog index tests

use super::*;
use crate::domain::{DEFAULT_CATEGORY, ResourceType};

fn sample_records() -> Vec<Resource> {
    vec![
        Resource::new("web-server", ResourceType::Server, "servers/web.json")
            .with_dependency("api-client"),
        Resource::new("api-client", ResourceType::Command, "commands/api.md")
            .with_dependency("auth"),
        Resource::new("auth", ResourceType::Hook, "hooks/auth.json"),
        Resource::new("dev/frontend/react-expert", ResourceType::Agent, "agents/react.md"),
        Resource::new("dev/frontend/vue-expert", ResourceType::Agent, "agents/vue.md"),
        Resource::new("dev/backend/go-expert", ResourceType::Agent, "agents/go.md"),
        Resource::new("security/audit", ResourceType::Command, "commands/audit.md"),
    ]
}

#[test]
fn test_lookup_exact() {
    let catalog = Catalog::build(sample_records());
    assert_eq!(catalog.len(), 7);
    assert_eq!(
        catalog.lookup_exact("auth").map(|r| r.resource_type),
        Some(ResourceType::Hook)
    );
    assert!(catalog.lookup_exact("missing").is_none());
    assert!(catalog.lookup_exact("").is_none());
}

#[test]
fn test_lookup_prefix_matches_starts_with_for_every_prefix() {
    let catalog = Catalog::build(sample_records());
    let prefixes = ["", "a", "au", "dev/", "dev/frontend/", "web-server", "web-server-x", "zzz"];

    for prefix in prefixes {
        let got: Vec<&str> = catalog
            .lookup_prefix(prefix)
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        let expected: Vec<&str> = catalog
            .all()
            .iter()
            .filter(|r| r.id.starts_with(prefix))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(got, expected, "prefix {prefix:?}");
    }
}

#[test]
fn test_empty_prefix_returns_all_in_insertion_order() {
    let catalog = Catalog::build(sample_records());
    let ids: Vec<&str> = catalog.lookup_prefix("").iter().map(|r| r.id.as_str()).collect();
    let all: Vec<&str> = catalog.all().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, all);
}

#[test]
fn test_category_tree() {
    let catalog = Catalog::build(sample_records());
    let tree = catalog.category_tree();

    let names: Vec<&str> = tree.primaries().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["dev", DEFAULT_CATEGORY, "security"]);

    let frontend: Vec<&str> = catalog
        .in_category("dev", Some("frontend"))
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(frontend, vec!["dev/frontend/react-expert", "dev/frontend/vue-expert"]);
    assert_eq!(catalog.in_category(DEFAULT_CATEGORY, None).len(), 3);
}

#[test]
fn test_every_resource_in_exactly_one_category() {
    let catalog = Catalog::build(sample_records());
    let total: usize = catalog.category_tree().primaries().map(CategoryNode::total).sum();
    assert_eq!(total, catalog.len());
}

#[test]
fn test_rebuild_is_idempotent() {
    let first = Catalog::build(sample_records());
    let second = Catalog::build(sample_records());

    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
    for prefix in ["", "d", "dev/frontend/", "q"] {
        assert_eq!(first.lookup_prefix(prefix), second.lookup_prefix(prefix));
    }
}

#[test]
fn test_duplicate_identifier_keeps_first() {
    let records = vec![
        Resource::new("a", ResourceType::Agent, "first.md"),
        Resource::new("a", ResourceType::Agent, "second.md"),
    ];
    let catalog = Catalog::build(records);
    assert_eq!(catalog.len(), 1);
    assert_eq!(
        catalog.lookup_exact("a").map(|r| r.source.location.as_str()),
        Some("first.md")
    );
    assert_eq!(catalog.lookup_prefix("a").len(), 1);
}

#[test]
fn test_fingerprint_tracks_content() {
    let base = fingerprint_records(&sample_records());
    let mut changed = sample_records();
    changed[2].description = "changed".to_string();
    assert_ne!(base, fingerprint_records(&changed));
    assert!(base.starts_with(HASH_PREFIX));
}

#[test]
fn test_empty_catalog() {
    let catalog = Catalog::default();
    assert!(catalog.is_empty());
    assert!(catalog.lookup_prefix("").is_empty());
    assert!(catalog.category_tree().is_empty());
}
