use super::common::*;
use crate::suppliers::domain::{ConfidenceLevel, SupplierDetails, SupplierId};
use crate::suppliers::identity::{IdentityResolver, Resolution};
use crate::suppliers::repository::SupplierRepository;
use crate::suppliers::store::InMemorySupplierStore;

fn details(name: &str, tax_id: Option<&str>) -> SupplierDetails {
    SupplierDetails {
        name: name.to_string(),
        trading_name: None,
        tax_id: tax_id.map(str::to_string),
        phone: None,
        email: Some("office@example.com".to_string()),
        address: None,
        last_seen_at: fixed_now(),
    }
}

fn id(value: &str) -> impl FnOnce() -> SupplierId + '_ {
    move || SupplierId(value.to_string())
}

#[test]
fn unknown_supplier_is_seeded_from_first_quote() {
    let store = InMemorySupplierStore::new();
    let resolution = IdentityResolver
        .resolve(&store, &details("Harbour Electrical", Some("111")), 640, id("sup-a"))
        .expect("resolves");

    let supplier = match resolution {
        Resolution::Created(supplier) => supplier,
        other => panic!("expected a new supplier, got {other:?}"),
    };
    assert_eq!(supplier.quote_count, 1);
    assert_eq!(supplier.reputation_score, 640);
    assert_eq!(supplier.confidence, ConfidenceLevel::Low);
    assert_eq!(supplier.first_seen_at, fixed_now());
    assert_eq!(supplier.last_seen_at, fixed_now());
    assert_eq!(supplier.email.as_deref(), Some("office@example.com"));
    assert_eq!(store.list().expect("list").len(), 1);
}

#[test]
fn tax_id_match_wins_over_differing_names() {
    let store = InMemorySupplierStore::new();
    IdentityResolver
        .resolve(&store, &details("Harbour Electrical", Some("111")), 640, id("sup-a"))
        .expect("resolves");

    let resolution = IdentityResolver
        .resolve(&store, &details("HE Group", Some("111")), 900, id("sup-b"))
        .expect("resolves");

    assert!(!resolution.is_created());
    assert_eq!(resolution.supplier().id, SupplierId("sup-a".to_string()));
    assert_eq!(resolution.supplier().name, "Harbour Electrical");
    assert_eq!(store.list().expect("list").len(), 1);
}

#[test]
fn names_match_case_insensitively_without_tax_id() {
    let store = InMemorySupplierStore::new();
    IdentityResolver
        .resolve(&store, &details("Northside Roofing", None), 430, id("sup-a"))
        .expect("resolves");

    let resolution = IdentityResolver
        .resolve(&store, &details("NORTHSIDE roofing", None), 500, id("sup-b"))
        .expect("resolves");

    assert!(matches!(resolution, Resolution::Existing(_)));
    assert_eq!(resolution.supplier().id, SupplierId("sup-a".to_string()));
}

#[test]
fn differing_names_without_tax_id_never_merge() {
    let store = InMemorySupplierStore::new();
    IdentityResolver
        .resolve(&store, &details("Northside Roofing", None), 430, id("sup-a"))
        .expect("resolves");

    let resolution = IdentityResolver
        .resolve(&store, &details("Northside Roofing Co", None), 430, id("sup-b"))
        .expect("resolves");

    assert!(resolution.is_created());
    assert_eq!(store.list().expect("list").len(), 2);
}

#[test]
fn unmatched_tax_id_creates_new_supplier_even_if_name_exists() {
    let store = InMemorySupplierStore::new();
    IdentityResolver
        .resolve(&store, &details("Northside Roofing", None), 430, id("sup-a"))
        .expect("resolves");

    let resolution = IdentityResolver
        .resolve(&store, &details("Northside Roofing", Some("222")), 600, id("sup-b"))
        .expect("resolves");

    assert!(resolution.is_created());
    assert_eq!(resolution.supplier().tax_id.as_deref(), Some("222"));
}

#[test]
fn find_does_not_create() {
    let store = InMemorySupplierStore::new();
    let found = IdentityResolver
        .find(&store, &details("Ghost Builders", None))
        .expect("lookup");

    assert!(found.is_none());
    assert!(store.list().expect("list").is_empty());
}
