//! Contract and error model for contract-driven CSV ingestion.
//!
//! This crate is pure data: the contract a run is driven by, the error
//! taxonomy raised by the pipeline, and the row samples attached as evidence.

pub mod contract;
pub mod error;
pub mod sample;

pub use contract::{
    Contract, ContractFile, DEFAULT_DELIMITER, NormalizeRules, StringRules, ValidationRules,
};
pub use error::{ConfigError, ValidationError};
pub use sample::RowSample;
