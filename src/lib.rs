//! Corpus-wide tRNA isotype and anticodon statistics.
pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod frequency;
pub mod persist;
pub mod report;
pub mod scan;
pub mod summary;

pub use aggregate::{aggregate, AggregateConfig, CorpusStats, FileFailure};
pub use catalog::AminoAcidCatalog;
pub use error::{Error, Result};
pub use frequency::CodonTally;
pub use persist::{load_missing_index, save_missing_index, MissingAminoAcidIndex};
pub use report::{parse_report, FileReport, PerFileStats};
pub use summary::RunSummary;

/// Name of the per-genome stats file written by the annotation tool.
pub const REPORT_FILE_NAME: &str = "tRNA.stats";
