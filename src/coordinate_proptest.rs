//! Property-based tests for coordinate parsing.
//!
//! These tests use proptest to generate random segment strings and verify
//! that parsing and formatting stay inverse to each other.

#[cfg(test)]
mod proptest_tests {
    use crate::coordinate::Coordinate;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9._-]{1,20}"
    }

    proptest! {
        /// Property: format(parse(s)) == s for every well-formed coordinate
        #[test]
        fn parse_then_format_is_identity(g in segment(), n in segment(), v in segment()) {
            let s = format!("{}:{}:{}", g, n, v);
            let parsed = Coordinate::parse(&s).unwrap();
            prop_assert_eq!(parsed.to_string(), s);
        }

        /// Property: segments survive parsing unchanged
        #[test]
        fn parse_preserves_segments(g in segment(), n in segment(), v in segment()) {
            let parsed = Coordinate::parse(&format!("{}:{}:{}", g, n, v)).unwrap();
            prop_assert_eq!(parsed.group(), g.as_str());
            prop_assert_eq!(parsed.name(), n.as_str());
            prop_assert_eq!(parsed.version(), v.as_str());
        }

        /// Property: any segment count other than three is rejected
        #[test]
        fn wrong_segment_count_is_rejected(parts in prop::collection::vec(segment(), 0..8)) {
            prop_assume!(parts.len() != 3);
            let s = parts.join(":");
            prop_assert!(Coordinate::parse(&s).is_err());
        }

        /// Property: a blank segment in any position is rejected
        #[test]
        fn blank_segment_is_rejected(
            g in segment(),
            n in segment(),
            blank in "[ \t]{0,3}",
            position in 0usize..3,
        ) {
            let mut parts = vec![g.clone(), n.clone(), g];
            parts[position] = blank;
            prop_assert!(Coordinate::parse(&parts.join(":")).is_err());
        }
    }
}
