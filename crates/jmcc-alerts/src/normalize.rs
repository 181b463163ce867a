//! Canonicalization of free-text classification fields.

use crate::types::{JourneyRecord, NormalizedRecord};

/// Lowercases and trims a free-text field; missing text becomes empty.
#[must_use]
pub fn canonical_text(value: Option<&str>) -> String {
    value.map_or_else(String::new, |v| v.trim().to_lowercase())
}

/// Normalizes a single record.
#[must_use]
pub fn normalize_record(record: &JourneyRecord) -> NormalizedRecord {
    NormalizedRecord {
        journey_plan_no: record.journey_plan_no.clone(),
        sjm: record.sjm.clone(),
        status: canonical_text(record.status.as_deref()),
        remarks: canonical_text(record.remarks.as_deref()),
        ivms_check_date: record.ivms_check_date.clone(),
        details: record.details.clone(),
    }
}

/// Normalizes a snapshot, one output per input in the same order.
#[must_use]
pub fn normalize(records: &[JourneyRecord]) -> Vec<NormalizedRecord> {
    records.iter().map(normalize_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(Some("In Transit"), "in transit" ; "mixed case")]
    #[test_case(Some("  DONE \t"), "done" ; "padded upper")]
    #[test_case(Some(""), "" ; "empty")]
    #[test_case(None, "" ; "missing")]
    fn canonical_text_cases(input: Option<&str>, expected: &str) {
        assert_eq!(canonical_text(input), expected);
    }

    #[test]
    fn normalize_preserves_order_and_length() {
        let records = vec![
            JourneyRecord::new("JP-1").with_status("Closed"),
            JourneyRecord::new("JP-2"),
            JourneyRecord::new("JP-3").with_remarks(" Done"),
        ];

        let normalized = normalize(&records);

        assert_eq!(normalized.len(), 3);
        let ids: Vec<_> = normalized.iter().map(|r| r.journey_plan_no.as_str()).collect();
        assert_eq!(ids, ["JP-1", "JP-2", "JP-3"]);
        assert_eq!(normalized[0].status, "closed");
        assert_eq!(normalized[1].status, "");
        assert_eq!(normalized[1].remarks, "");
        assert!(normalized[2].is_done());
    }

    #[test]
    fn normalize_keeps_check_date_verbatim() {
        let record = JourneyRecord::new("JP-1").with_ivms_check_date(" 2024-05-01 10:00:00 ");
        let normalized = normalize_record(&record);
        assert_eq!(
            normalized.ivms_check_date.as_deref(),
            Some(" 2024-05-01 10:00:00 ")
        );
    }

    #[test]
    fn empty_text_matches_no_canonical_value() {
        let normalized = normalize_record(&JourneyRecord::new("JP-1"));
        assert!(!normalized.is_done());
        assert!(!normalized.is_closed());
        assert!(!normalized.is_in_transit());
    }

    fn arb_record() -> impl Strategy<Value = JourneyRecord> {
        (
            "[A-Z0-9-]{1,8}",
            proptest::option::of("[ \tA-Za-z]{0,12}"),
            proptest::option::of("[ \tA-Za-z]{0,12}"),
        )
            .prop_map(|(id, status, remarks)| JourneyRecord {
                journey_plan_no: id,
                status,
                remarks,
                ..JourneyRecord::default()
            })
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(records in proptest::collection::vec(arb_record(), 0..20)) {
            let once = normalize(&records);
            let again: Vec<JourneyRecord> = once.iter().cloned().map(JourneyRecord::from).collect();
            let twice = normalize(&again);

            prop_assert_eq!(once.len(), twice.len());
            for (a, b) in once.iter().zip(&twice) {
                prop_assert_eq!(&a.status, &b.status);
                prop_assert_eq!(&a.remarks, &b.remarks);
            }
        }

        #[test]
        fn prop_normalize_is_length_preserving(
            records in proptest::collection::vec(arb_record(), 0..20)
        ) {
            prop_assert_eq!(normalize(&records).len(), records.len());
        }
    }
}
