//! Attribute set normalization and parsing properties

use callsite_enricher::attributes::{Attribute, AttributeSet};
use proptest::prelude::*;

fn set_from_bits(bits: u16) -> AttributeSet {
    let mut set = AttributeSet::NONE;
    for (i, attribute) in Attribute::ALL.iter().enumerate() {
        if bits & (1 << i) != 0 {
            set.insert(*attribute);
        }
    }
    set
}

/// Every one of the 512 sets normalizes to a closed superset of itself.
#[test]
fn test_normalization_closure_exhaustive() {
    for bits in 0u16..512 {
        let set = set_from_bits(bits);
        let normalized = set.normalized();

        for attribute in set.iter() {
            assert!(normalized.contains(attribute), "{} lost {}", set, attribute);
        }
        if normalized.column_number {
            assert!(normalized.line_number);
        }
        if normalized.line_number {
            assert!(normalized.file_name);
        }
        assert_eq!(normalized.normalized(), normalized);
        assert_eq!(normalized.needs_file_info(), normalized.file_name);
    }
}

proptest! {
    #[test]
    fn test_display_parses_back_normalized(bits in 0u16..512) {
        let set = set_from_bits(bits).normalized();
        let parsed: AttributeSet = set.to_string().parse().unwrap();
        prop_assert_eq!(parsed, set);
    }

    #[test]
    fn test_parse_list_matches_union(a in 0u16..512, b in 0u16..512) {
        let left = set_from_bits(a);
        let right = set_from_bits(b);
        let names = vec![left.to_string(), right.to_string()];
        let parsed = AttributeSet::parse_list(&names).unwrap();
        prop_assert_eq!(parsed, left.union(right).normalized());
    }
}
