//! Reader configuration: delimiter and null tokens.

use std::collections::HashSet;

use rawload_model::{Contract, DEFAULT_DELIMITER};

/// Tokens read as null regardless of the contract, matching the common
/// dataframe-reader defaults. The empty string is one of them.
pub const DEFAULT_NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How to read one delimited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReadOptions {
    pub delimiter: u8,
    /// Extra null tokens, matched exactly (no trimming).
    pub na_values: Vec<String>,
    /// Also treat [`DEFAULT_NULL_TOKENS`] as null.
    pub keep_default_na: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
            na_values: Vec::new(),
            keep_default_na: true,
        }
    }
}

impl CsvReadOptions {
    /// Reader settings declared by a contract.
    pub fn for_contract(contract: &Contract) -> Self {
        Self {
            delimiter: contract.delimiter_byte(),
            na_values: contract.na_like_values.clone(),
            keep_default_na: true,
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_na_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn null_tokens(&self) -> HashSet<&str> {
        let mut tokens: HashSet<&str> = self.na_values.iter().map(String::as_str).collect();
        if self.keep_default_na {
            tokens.extend(DEFAULT_NULL_TOKENS.iter().copied());
        }
        tokens
    }
}
