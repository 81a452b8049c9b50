//! Load an ingestion contract from a YAML file.

use std::fs;
use std::path::Path;

use rawload_model::{Contract, ContractFile};
use tracing::debug;

use crate::error::{IngestError, Result, open_error};

/// Reads and validates a YAML contract.
pub fn load_contract(path: &Path) -> Result<Contract> {
    let text = fs::read_to_string(path).map_err(|e| open_error(path, e))?;
    let contract = parse_contract(&text, path)?;
    debug!(
        path = %path.display(),
        raw_table = %contract.raw_table,
        source_file = %contract.source_file,
        "loaded contract"
    );
    Ok(contract)
}

/// Parses contract YAML; `origin` is used in errors.
pub fn parse_contract(text: &str, origin: &Path) -> Result<Contract> {
    let file: ContractFile =
        serde_yaml::from_str(text).map_err(|source| IngestError::ContractParse {
            path: origin.to_path_buf(),
            source,
        })?;
    Contract::try_from(file).map_err(|source| IngestError::Config {
        path: origin.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use rawload_model::ConfigError;

    use super::*;

    #[test]
    fn parses_minimal_contract() {
        let contract = parse_contract(
            "raw_table: wells\nsource_file: wells.csv\n",
            Path::new("wells.yml"),
        )
        .unwrap();
        assert_eq!(contract.target_table(), "WELLS");
        assert!(contract.pk_candidate.is_empty());
    }

    #[test]
    fn missing_required_field_is_config_error() {
        let err = parse_contract("source_file: wells.csv\n", Path::new("wells.yml")).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Config {
                source: ConfigError::MissingField("raw_table"),
                ..
            }
        ));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = parse_contract("raw_table: [unclosed\n", Path::new("bad.yml")).unwrap_err();
        assert!(matches!(err, IngestError::ContractParse { .. }));
    }

    #[test]
    fn load_contract_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.yml");
        fs::write(&path, "raw_table: t\nsource_file: t.csv\ndelimiter: ';'\n").unwrap();
        let contract = load_contract(&path).unwrap();
        assert_eq!(contract.delimiter, ';');
    }
}
