//! Contract rules resolved against a concrete table schema.
//!
//! The contract names columns; the input file decides which of them exist.
//! Resolution happens once, before any row is touched, and produces an
//! [`ExecutionPlan`] listing exactly which columns each stage will act on.
//! References to columns that do not exist are not errors: they are
//! collected in [`ExecutionPlan::unresolved`] so they can be reported.

use std::collections::BTreeSet;

use rawload_model::{Contract, StringRules, ValidationRules};
use serde::Serialize;

use crate::error::PlanError;

/// Which contract rule referenced a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Rename,
    StringColumn,
    Uppercase,
    IntegerColumn,
    NumericColumn,
    NonNull,
    NonNegative,
    PrimaryKey,
}

/// A rule reference that matched no column of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedColumn {
    pub rule: RuleKind,
    pub column: String,
}

/// One applied rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// What the string normalizer will do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizePlan {
    /// New name for every input column, in input order.
    pub columns: Vec<String>,
    pub renames: Vec<Rename>,
    pub strip_columns: Vec<String>,
    pub uppercase_columns: Vec<String>,
}

/// Which columns the numeric coercer converts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoercePlan {
    pub columns: Vec<String>,
}

/// Which columns each validation inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationPlan {
    pub non_null: Vec<String>,
    /// Checked in contract order; the first violation stops validation.
    pub non_negative: Vec<String>,
    /// Present primary-key columns; empty disables the uniqueness check.
    pub key: Vec<String>,
    pub enforce_unique: bool,
}

/// The full resolved plan for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub table: String,
    pub input_columns: Vec<String>,
    pub normalize: NormalizePlan,
    pub coerce: CoercePlan,
    pub validate: ValidationPlan,
    pub unresolved: Vec<UnresolvedColumn>,
}

impl ExecutionPlan {
    /// Resolve every rule of `contract` against the input headers.
    pub fn resolve(contract: &Contract, input_columns: &[String]) -> Result<Self, PlanError> {
        let mut unresolved = Vec::new();
        let normalize =
            NormalizePlan::resolve_into(contract.string_rules(), input_columns, &mut unresolved)?;
        let coerce = CoercePlan::resolve_into(
            &contract.integer_columns,
            &contract.numeric_columns,
            &normalize.columns,
            &mut unresolved,
        );
        let validate = ValidationPlan::resolve_into(
            &contract.validations,
            &contract.pk_candidate,
            &normalize.columns,
            &mut unresolved,
        );
        Ok(Self {
            table: contract.target_table(),
            input_columns: input_columns.to_vec(),
            normalize,
            coerce,
            validate,
            unresolved,
        })
    }

    /// Column names after renaming, in table order.
    pub fn output_columns(&self) -> &[String] {
        &self.normalize.columns
    }
}

impl NormalizePlan {
    pub fn resolve(rules: StringRules<'_>, input_columns: &[String]) -> Result<Self, PlanError> {
        Self::resolve_into(rules, input_columns, &mut Vec::new())
    }

    fn resolve_into(
        rules: StringRules<'_>,
        input_columns: &[String],
        unresolved: &mut Vec<UnresolvedColumn>,
    ) -> Result<Self, PlanError> {
        let present: BTreeSet<&str> = input_columns.iter().map(String::as_str).collect();
        for source in rules.rename_map.keys() {
            if !present.contains(source.as_str()) {
                unresolved.push(UnresolvedColumn {
                    rule: RuleKind::Rename,
                    column: source.clone(),
                });
            }
        }

        // Renames are simultaneous, so a swap `a -> b, b -> a` is valid.
        let mut columns = Vec::with_capacity(input_columns.len());
        let mut renames = Vec::new();
        for name in input_columns {
            match rules.rename_map.get(name) {
                Some(target) if target != name => {
                    renames.push(Rename {
                        from: name.clone(),
                        to: target.clone(),
                    });
                    columns.push(target.clone());
                }
                _ => columns.push(name.clone()),
            }
        }
        let mut seen = BTreeSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(PlanError::DuplicateColumn {
                    column: name.clone(),
                });
            }
        }

        let strip_columns = if rules.normalize.strip_whitespace {
            present_in(&columns, rules.string_columns.iter(), RuleKind::StringColumn, unresolved)
        } else {
            note_missing(&columns, rules.string_columns.iter(), RuleKind::StringColumn, unresolved);
            Vec::new()
        };
        let uppercase_columns = present_in(
            &columns,
            rules.normalize.uppercase.iter(),
            RuleKind::Uppercase,
            unresolved,
        );

        Ok(Self {
            columns,
            renames,
            strip_columns,
            uppercase_columns,
        })
    }
}

impl CoercePlan {
    pub fn resolve(
        integer_columns: &BTreeSet<String>,
        numeric_columns: &BTreeSet<String>,
        columns: &[String],
    ) -> Self {
        Self::resolve_into(integer_columns, numeric_columns, columns, &mut Vec::new())
    }

    fn resolve_into(
        integer_columns: &BTreeSet<String>,
        numeric_columns: &BTreeSet<String>,
        columns: &[String],
        unresolved: &mut Vec<UnresolvedColumn>,
    ) -> Self {
        note_missing(columns, integer_columns.iter(), RuleKind::IntegerColumn, unresolved);
        note_missing(columns, numeric_columns.iter(), RuleKind::NumericColumn, unresolved);
        // Table order, each column once.
        let columns = columns
            .iter()
            .filter(|name| integer_columns.contains(*name) || numeric_columns.contains(*name))
            .cloned()
            .collect();
        Self { columns }
    }
}

impl ValidationPlan {
    pub fn resolve(rules: &ValidationRules, pk_candidate: &[String], columns: &[String]) -> Self {
        Self::resolve_into(rules, pk_candidate, columns, &mut Vec::new())
    }

    fn resolve_into(
        rules: &ValidationRules,
        pk_candidate: &[String],
        columns: &[String],
        unresolved: &mut Vec<UnresolvedColumn>,
    ) -> Self {
        Self {
            non_null: present_in(columns, rules.non_null.iter(), RuleKind::NonNull, unresolved),
            non_negative: present_in(
                columns,
                rules.non_negative_numeric.iter(),
                RuleKind::NonNegative,
                unresolved,
            ),
            key: present_in(columns, pk_candidate.iter(), RuleKind::PrimaryKey, unresolved),
            enforce_unique: rules.enforce_unique_in_raw,
        }
    }
}

/// Referenced names that exist, in reference order, without repeats.
fn present_in<'a>(
    columns: &[String],
    referenced: impl Iterator<Item = &'a String>,
    rule: RuleKind,
    unresolved: &mut Vec<UnresolvedColumn>,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in referenced {
        if !columns.contains(name) {
            unresolved.push(UnresolvedColumn {
                rule,
                column: name.clone(),
            });
        } else if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

fn note_missing<'a>(
    columns: &[String],
    referenced: impl Iterator<Item = &'a String>,
    rule: RuleKind,
    unresolved: &mut Vec<UnresolvedColumn>,
) {
    present_in(columns, referenced, rule, unresolved);
}
