//! Column renames plus whitespace and case normalization of text cells.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use rawload_ingest::RawTable;
use rawload_model::StringRules;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::plan::NormalizePlan;

/// Apply a contract's string rules to a raw table.
///
/// Renames are applied first and are simultaneous. Stripping applies to
/// `string_columns` when `strip_whitespace` is set; upper-casing applies to
/// every `uppercase` column. Columns a rule names but the table lacks are
/// skipped. Null cells are never touched.
pub fn normalize(table: RawTable, rules: StringRules<'_>) -> Result<RawTable> {
    let plan = NormalizePlan::resolve(rules, &table.headers())?;
    apply_normalize_plan(table, &plan)
}

/// Apply an already resolved plan.
pub fn apply_normalize_plan(table: RawTable, plan: &NormalizePlan) -> Result<RawTable> {
    if plan.columns.len() != table.width() {
        return Err(TransformError::PlanMismatch {
            expected: plan.columns.len(),
            found: table.width(),
        });
    }
    for rename in &plan.renames {
        debug!(from = %rename.from, to = %rename.to, "rename column");
    }

    let frame = table.into_frame();
    let mut columns: Vec<Column> = Vec::with_capacity(frame.width());
    for (column, name) in frame.get_columns().iter().zip(&plan.columns) {
        let strip = plan.strip_columns.contains(name);
        let upper = plan.uppercase_columns.contains(name);
        if !strip && !upper {
            columns.push(column.clone().with_name(name.as_str().into()));
            continue;
        }
        let values: Vec<Option<String>> = column
            .str()?
            .into_iter()
            .map(|cell| cell.map(|value| normalize_cell(value, strip, upper)))
            .collect();
        columns.push(Series::new(name.as_str().into(), values).into_column());
    }

    let frame = DataFrame::new(columns)?;
    Ok(RawTable::from_frame(frame)?)
}

fn normalize_cell(value: &str, strip: bool, upper: bool) -> String {
    let value = if strip { value.trim() } else { value };
    if upper {
        value.to_uppercase()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use rawload_model::NormalizeRules;

    use super::*;

    struct Rules {
        rename_map: BTreeMap<String, String>,
        string_columns: BTreeSet<String>,
        normalize: NormalizeRules,
    }

    impl Rules {
        fn new(strip: bool) -> Self {
            Self {
                rename_map: BTreeMap::new(),
                string_columns: BTreeSet::new(),
                normalize: NormalizeRules {
                    strip_whitespace: strip,
                    uppercase: Vec::new(),
                },
            }
        }

        fn as_rules(&self) -> StringRules<'_> {
            StringRules {
                rename_map: &self.rename_map,
                string_columns: &self.string_columns,
                normalize: &self.normalize,
            }
        }
    }

    fn text(table: &RawTable, name: &str) -> Vec<Option<String>> {
        table.column_values(name).unwrap()
    }

    #[test]
    fn renames_keep_column_order() {
        let mut rules = Rules::new(false);
        rules
            .rename_map
            .insert("Well Name".to_string(), "well_name".to_string());
        let table = RawTable::from_columns(&[
            ("API", vec![Some("1")]),
            ("Well Name", vec![Some("a")]),
        ])
        .unwrap();

        let out = normalize(table, rules.as_rules()).unwrap();
        assert_eq!(out.headers(), vec!["API", "well_name"]);
        assert_eq!(text(&out, "well_name"), vec![Some("a".to_string())]);
    }

    #[test]
    fn strips_only_when_enabled() {
        let table = RawTable::from_columns(&[("name", vec![Some("  Ada "), None])]).unwrap();

        let mut off = Rules::new(false);
        off.string_columns.insert("name".to_string());
        let untouched = normalize(table.clone(), off.as_rules()).unwrap();
        assert_eq!(text(&untouched, "name"), vec![Some("  Ada ".to_string()), None]);

        let mut on = Rules::new(true);
        on.string_columns.insert("name".to_string());
        let stripped = normalize(table, on.as_rules()).unwrap();
        assert_eq!(text(&stripped, "name"), vec![Some("Ada".to_string()), None]);
    }

    #[test]
    fn uppercases_listed_columns_after_rename() {
        let mut rules = Rules::new(true);
        rules
            .rename_map
            .insert("County".to_string(), "county".to_string());
        rules.string_columns.insert("county".to_string());
        rules.normalize.uppercase = vec!["county".to_string(), "absent".to_string()];
        let table = RawTable::from_columns(&[
            ("County", vec![Some(" straße "), Some("")]),
            ("other", vec![Some(" keep me "), None]),
        ])
        .unwrap();

        let out = normalize(table, rules.as_rules()).unwrap();
        assert_eq!(
            text(&out, "county"),
            vec![Some("STRASSE".to_string()), Some(String::new())]
        );
        assert_eq!(
            text(&out, "other"),
            vec![Some(" keep me ".to_string()), None]
        );
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let mut rules = Rules::new(true);
        rules.rename_map.insert("a".to_string(), "A".to_string());
        rules.string_columns.insert("A".to_string());
        rules.normalize.uppercase = vec!["A".to_string()];
        let table = RawTable::from_columns(&[("a", vec![Some(" x "), None, Some("y\t")])]).unwrap();

        let once = normalize(table, rules.as_rules()).unwrap();
        let twice = normalize(once.clone(), rules.as_rules()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn mismatched_plan_is_rejected() {
        let table = RawTable::from_columns(&[("a", vec![Some("1")])]).unwrap();
        let err = apply_normalize_plan(table, &NormalizePlan::default()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::PlanMismatch {
                expected: 0,
                found: 1
            }
        ));
    }
}
