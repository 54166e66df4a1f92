use super::*;

crate::define_id! {
    pub struct TestId("tst-");
}

#[test]
fn new_ids_carry_prefix_and_fit_the_buffer() {
    let id = TestId::new();
    assert!(id.as_str().starts_with(TestId::PREFIX));
    assert_eq!(id.as_str().len(), ID_MAX_LEN);
}

#[test]
fn new_ids_are_unique() {
    let a = TestId::new();
    let b = TestId::new();
    assert_ne!(a, b);
}

#[test]
fn from_string_round_trips() {
    let raw = "tst-abc123";
    let id = TestId::from_string(raw);
    assert_eq!(id.as_str(), raw);
    assert_eq!(id, *raw);
}

#[test]
fn suffix_strips_prefix() {
    let id = TestId::from_string("tst-abcdef");
    assert_eq!(id.suffix(), "abcdef");
}

#[test]
fn short_truncates_suffix() {
    let id = TestId::from_string("tst-abcdefghijk");
    assert_eq!(id.short(4), "abcd");
    assert_eq!(id.short(100), "abcdefghijk");
}

#[test]
fn equality_and_borrow_support_hashmap_lookup_by_str() {
    use std::collections::HashMap;

    let id = TestId::from_string("tst-lookup");
    let mut map: HashMap<TestId, u32> = HashMap::new();
    map.insert(id, 7);
    assert_eq!(map.get("tst-lookup"), Some(&7));
}

#[test]
fn serde_round_trip() {
    let id = TestId::from_string("tst-serde1");
    let json = serde_json::to_string(&id).expect("serialize");
    assert_eq!(json, "\"tst-serde1\"");
    let back: TestId = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, id);
}

#[test]
fn deserialize_rejects_oversized_ids() {
    let too_long = "\"tst-0123456789012345678901234\"";
    let result: Result<TestId, _> = serde_json::from_str(too_long);
    assert!(result.is_err());
}

#[test]
fn default_generates_fresh_id() {
    let id = TestId::default();
    assert!(!id.is_empty());
}

#[test]
fn has_valid_prefix_rejects_ids_of_another_type() {
    assert!(TestId::has_valid_prefix("tst-abc"));
    assert!(!TestId::has_valid_prefix("wkfl_abc"));
    assert!(!TestId::has_valid_prefix(""));
}
