//! Declarative ingestion contracts.
//!
//! A [`Contract`] describes how to interpret one delimited source file:
//! column renames, which columns carry text or numbers, normalization rules,
//! extra null tokens, and the validations that must pass before the data is
//! loaded. Contracts are pure data; the pipeline crates interpret them.
//!
//! Column names referenced by a rule that do not exist in the input are
//! ignored, so one contract can serve source files with slightly different
//! layouts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Delimiter used when the contract does not declare one.
pub const DEFAULT_DELIMITER: char = ',';

/// Whitespace and case rules for text columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeRules {
    /// Trim leading/trailing whitespace on every `string_columns` entry.
    pub strip_whitespace: bool,
    /// Columns upper-cased in declaration order.
    #[serde(deserialize_with = "null_as_default")]
    pub uppercase: Vec<String>,
}

/// Validations declared by a contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Columns that must not contain nulls.
    #[serde(deserialize_with = "null_as_default")]
    pub non_null: Vec<String>,
    /// Columns whose numeric values must be `>= 0`, checked in order.
    #[serde(deserialize_with = "null_as_default")]
    pub non_negative_numeric: Vec<String>,
    /// Fail on duplicate primary-key candidates instead of quarantining them.
    pub enforce_unique_in_raw: bool,
}

/// The slice of a contract the string normalizer needs.
#[derive(Debug, Clone, Copy)]
pub struct StringRules<'a> {
    pub rename_map: &'a BTreeMap<String, String>,
    pub string_columns: &'a BTreeSet<String>,
    pub normalize: &'a NormalizeRules,
}

/// A validated ingestion contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    /// Target table name as written in the contract.
    pub raw_table: String,
    /// Source file name, resolved by the caller against a data directory.
    pub source_file: String,
    pub delimiter: char,
    pub rename_map: BTreeMap<String, String>,
    pub string_columns: BTreeSet<String>,
    pub normalize: NormalizeRules,
    pub integer_columns: BTreeSet<String>,
    pub numeric_columns: BTreeSet<String>,
    /// Extra null tokens on top of the reader's defaults.
    pub na_like_values: Vec<String>,
    pub validations: ValidationRules,
    pub pk_candidate: Vec<String>,
}

impl Contract {
    /// Table name used by the sink (upper-cased).
    pub fn target_table(&self) -> String {
        self.raw_table.to_uppercase()
    }

    /// The delimiter as a byte for the CSV reader. Always ASCII once validated.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }

    pub fn string_rules(&self) -> StringRules<'_> {
        StringRules {
            rename_map: &self.rename_map,
            string_columns: &self.string_columns,
            normalize: &self.normalize,
        }
    }

    /// Union of integer and numeric columns; each is coerced exactly once.
    pub fn numeric_targets(&self) -> BTreeSet<String> {
        self.integer_columns
            .union(&self.numeric_columns)
            .cloned()
            .collect()
    }
}

/// On-disk shape of a contract before required fields are checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContractFile {
    pub raw_table: Option<String>,
    pub source_file: Option<String>,
    pub delimiter: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub rename_map: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub string_columns: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub normalize: NormalizeRules,
    #[serde(deserialize_with = "null_as_default")]
    pub integer_columns: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub numeric_columns: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub na_like_values: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub validations: ValidationRules,
    #[serde(deserialize_with = "null_as_default")]
    pub pk_candidate: Vec<String>,
}

impl TryFrom<ContractFile> for Contract {
    type Error = ConfigError;

    fn try_from(file: ContractFile) -> Result<Self, Self::Error> {
        let raw_table = required(file.raw_table, "raw_table")?;
        let source_file = required(file.source_file, "source_file")?;
        let delimiter = parse_delimiter(file.delimiter.as_deref())?;
        Ok(Self {
            raw_table,
            source_file,
            delimiter,
            rename_map: file.rename_map,
            string_columns: file.string_columns,
            normalize: file.normalize,
            integer_columns: file.integer_columns,
            numeric_columns: file.numeric_columns,
            na_like_values: file.na_like_values,
            validations: file.validations,
            pk_candidate: file.pk_candidate,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingField(field)),
    }
}

fn parse_delimiter(value: Option<&str>) -> Result<char, ConfigError> {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return Ok(DEFAULT_DELIMITER);
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() => Ok(ch),
        _ => Err(ConfigError::InvalidDelimiter(value.to_string())),
    }
}

/// YAML writes an empty section as `null`; treat it like an absent one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(raw_table: &str, source_file: &str) -> ContractFile {
        ContractFile {
            raw_table: Some(raw_table.to_string()),
            source_file: Some(source_file.to_string()),
            ..ContractFile::default()
        }
    }

    #[test]
    fn missing_table_name_is_config_error() {
        let mut raw = file("prod", "prod.csv");
        raw.raw_table = None;
        assert_eq!(
            Contract::try_from(raw),
            Err(ConfigError::MissingField("raw_table"))
        );
    }

    #[test]
    fn blank_source_file_is_config_error() {
        let raw = file("prod", "   ");
        assert_eq!(
            Contract::try_from(raw),
            Err(ConfigError::MissingField("source_file"))
        );
    }

    #[test]
    fn delimiter_defaults_to_comma() {
        let contract = Contract::try_from(file("prod", "prod.csv")).unwrap();
        assert_eq!(contract.delimiter, ',');
        assert_eq!(contract.delimiter_byte(), b',');
    }

    #[test]
    fn multi_char_delimiter_is_rejected() {
        let mut raw = file("prod", "prod.csv");
        raw.delimiter = Some("||".to_string());
        assert_eq!(
            Contract::try_from(raw),
            Err(ConfigError::InvalidDelimiter("||".to_string()))
        );
    }

    #[test]
    fn target_table_is_upper_case() {
        let contract = Contract::try_from(file("annual_production", "prod.csv")).unwrap();
        assert_eq!(contract.target_table(), "ANNUAL_PRODUCTION");
    }

    #[test]
    fn numeric_targets_union_both_sets() {
        let mut raw = file("prod", "prod.csv");
        raw.integer_columns = ["year".to_string(), "wells".to_string()].into();
        raw.numeric_columns = ["oil".to_string(), "year".to_string()].into();
        let contract = Contract::try_from(raw).unwrap();
        let targets: Vec<String> = contract.numeric_targets().into_iter().collect();
        assert_eq!(targets, vec!["oil", "wells", "year"]);
    }
}
