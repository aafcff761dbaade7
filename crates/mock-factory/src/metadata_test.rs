use uuid::Uuid;

use crate::RealizationMetadata;

fn metadata(id: Uuid) -> RealizationMetadata {
    RealizationMetadata {
        id,
        lookup_table_version: 1,
        num_galaxies: 10,
    }
}

#[test]
fn test_seed_round_trips_through_id() {
    let meta = metadata(RealizationMetadata::id_from_seed(123_456_789));
    assert_eq!(meta.seed(), 123_456_789);
}

#[test]
fn test_name_derived_ids_are_deterministic() {
    let a = RealizationMetadata::id_from_name("box-250-run-3");
    let b = RealizationMetadata::id_from_name("box-250-run-3");
    let c = RealizationMetadata::id_from_name("box-250-run-4");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_label_format() {
    let label = metadata(Uuid::new_v4()).label();
    assert_eq!(label.len(), 13);
    assert!(label.starts_with("MOCK-"));
    assert!(label[5..].chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_serializes_camel_case() {
    let meta = metadata(RealizationMetadata::id_from_seed(1));
    let json = serde_json::to_string(&meta).unwrap();
    assert!(json.contains("\"lookupTableVersion\":1"));
    assert!(json.contains("\"numGalaxies\":10"));

    let back: RealizationMetadata = serde_json::from_str(&json).unwrap();
    assert_eq!(back, meta);
}
