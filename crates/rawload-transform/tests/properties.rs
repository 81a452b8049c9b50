//! Property tests for normalization and coercion.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use rawload_ingest::RawTable;
use rawload_model::{NormalizeRules, StringRules};
use rawload_transform::normalization::{NumericColumn, coerce_values};
use rawload_transform::{ColumnKind, coerce, normalize};

fn cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[ \\t]{0,2}[a-zß]{0,4}[ \\t]{0,2}".prop_map(Some),
        "[ ]?-?[0-9]{1,3}(,[0-9]{3})?(\\.[0-9]{1,2})?[ ]?".prop_map(Some),
    ]
}

fn numeric_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("n/a".to_string())),
        any::<i32>().prop_map(|v| Some(v.to_string())),
        (-1.0e6f64..1.0e6).prop_map(|v| Some(format!("{v}"))),
        "-?[0-9]{1,3},[0-9]{3}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn normalization_is_idempotent(values in prop::collection::vec(cell(), 0..16)) {
        let rename_map = BTreeMap::from([("raw".to_string(), "name".to_string())]);
        let string_columns = BTreeSet::from(["name".to_string()]);
        let normalize_rules = NormalizeRules {
            strip_whitespace: true,
            uppercase: vec!["name".to_string()],
        };
        let rules = StringRules {
            rename_map: &rename_map,
            string_columns: &string_columns,
            normalize: &normalize_rules,
        };
        let cells: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
        let table = RawTable::from_columns(&[("raw", cells)]).unwrap();

        let once = normalize(table, rules).unwrap();
        let twice = normalize(once.clone(), rules).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn coerced_column_has_one_representation(values in prop::collection::vec(numeric_text(), 0..24)) {
        let cells: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
        let table = RawTable::from_columns(&[("qty", cells.clone())]).unwrap();
        let columns = BTreeSet::from(["qty".to_string()]);

        let coerced = coerce(table, &columns, &BTreeSet::new()).unwrap();
        let kind = coerced.kinds["qty"];
        prop_assert_eq!(coerced.table.kind("qty"), Some(kind));
        match coerce_values(cells) {
            NumericColumn::Integer(expected) => {
                prop_assert_eq!(kind, ColumnKind::Integer);
                prop_assert_eq!(coerced.table.integers("qty"), Some(expected));
            }
            NumericColumn::Float(expected) => {
                prop_assert_eq!(kind, ColumnKind::Float);
                prop_assert_eq!(coerced.table.floats("qty"), Some(expected));
            }
        }
    }

    #[test]
    fn nulls_are_never_filled(values in prop::collection::vec(numeric_text(), 0..24)) {
        let cells: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
        let input_nulls = cells.iter().filter(|v| v.is_none()).count();
        let column = coerce_values(cells);
        prop_assert!(column.null_count() >= input_nulls);
    }
}
