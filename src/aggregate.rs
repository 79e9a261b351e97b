//! Corpus-wide accumulation over every report found under a root directory.
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::catalog::AminoAcidCatalog;
use crate::error::{Error, Result};
use crate::frequency::CodonTally;
use crate::persist::MissingAminoAcidIndex;
use crate::report::{parse_report, AminoAcidStats, FileReport};
use crate::summary::RunSummary;
use crate::REPORT_FILE_NAME;

#[derive(Debug, Clone)]
pub struct AggregateConfig {
    /// Directory to search for reports.
    pub root: PathBuf,
    /// Base name a file must have to be treated as a report.
    pub report_name: String,
    /// Number of parsing threads (0 = one per core).
    pub threads: usize,
    /// Number of reports parsed in parallel before merging.
    pub batch_size: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            report_name: REPORT_FILE_NAME.to_string(),
            threads: 0,
            batch_size: 4096,
        }
    }
}

/// A report that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Accumulators for a whole corpus. Only the thread that owns the value
/// mutates it; parsing workers hand back [`FileReport`]s instead.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    catalog: AminoAcidCatalog,
    amino_acids: Vec<AminoAcidStats>,
    pub codon_tally: CodonTally,
    pub missing_index: MissingAminoAcidIndex,
    /// Every discovered report, including the ones that failed.
    pub total_files: usize,
    /// Reports missing at least one catalog amino acid.
    pub missing_files: usize,
    /// Sum of the missing list lengths.
    pub total_missing: usize,
    pub failures: Vec<FileFailure>,
}

impl CorpusStats {
    pub fn new(catalog: &AminoAcidCatalog) -> Self {
        Self {
            catalog: catalog.clone(),
            amino_acids: vec![AminoAcidStats::default(); catalog.len()],
            codon_tally: CodonTally::new(),
            missing_index: MissingAminoAcidIndex::new(),
            total_files: 0,
            missing_files: 0,
            total_missing: 0,
            failures: vec![],
        }
    }

    pub fn catalog(&self) -> &AminoAcidCatalog {
        &self.catalog
    }

    /// Fold one parsed report into the accumulators.
    ///
    /// A report whose path is not valid UTF-8 cannot be keyed in the missing
    /// index, so it is counted as a failure instead.
    pub fn absorb(&mut self, path: &Path, report: FileReport) {
        if path.to_str().is_none() {
            let error = Error::NonUtf8Path(path.to_path_buf());
            log::warn!("{error}");
            self.record_failure(path, &error);
            return;
        }
        self.total_files += 1;
        for (code, stats) in report.stats.iter() {
            if let Some(idx) = self.catalog.position(code) {
                let slot = &mut self.amino_acids[idx];
                slot.total = slot.total.saturating_add(stats.total);
                slot.codon_counts.extend_from_slice(&stats.codon_counts);
            }
        }
        for (codon, count) in report.codons.iter() {
            self.codon_tally.add(codon, *count);
        }
        if !report.missing.is_empty() {
            self.missing_files += 1;
            self.total_missing += report.missing.len();
            self.missing_index.record(path, report.missing);
        }
    }

    /// Count a report that could not be parsed. It contributes nothing but
    /// its place in `total_files`.
    pub fn record_failure(&mut self, path: &Path, error: &Error) {
        self.total_files += 1;
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            message: error.to_string(),
        });
    }

    /// Combine with accumulators built from a disjoint set of reports.
    pub fn merge(&mut self, other: CorpusStats) {
        for (code, stats) in other.amino_acid_totals() {
            if let Some(idx) = self.catalog.position(code) {
                let slot = &mut self.amino_acids[idx];
                slot.total = slot.total.saturating_add(stats.total);
                slot.codon_counts.extend_from_slice(&stats.codon_counts);
            }
        }
        self.codon_tally.merge(&other.codon_tally);
        self.missing_index.merge(other.missing_index);
        self.total_files += other.total_files;
        self.missing_files += other.missing_files;
        self.total_missing += other.total_missing;
        self.failures.extend(other.failures);
    }

    /// Per-amino-acid totals in catalog order.
    pub fn amino_acid_totals(&self) -> impl Iterator<Item = (&str, &AminoAcidStats)> + '_ {
        self.catalog.iter().zip(self.amino_acids.iter())
    }

    pub fn amino_acid(&self, code: &str) -> Option<&AminoAcidStats> {
        self.catalog.position(code).map(|idx| &self.amino_acids[idx])
    }

    pub fn average_missing(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.total_missing as f64 / self.total_files as f64
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_files: self.total_files,
            missing_files: self.missing_files,
            average_missing: self.average_missing(),
            failed_files: self.failures.len(),
            frequencies: self.codon_tally.frequencies(),
        }
    }
}

/// Every file named `report_name` below `root`, sorted by path within each
/// directory. Unreadable subdirectories are logged and skipped.
pub fn discover_reports(root: &Path, report_name: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    let mut reports = vec![];
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(Error::Walk {
                    root: root.to_path_buf(),
                    source,
                })
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_dir() && entry.file_name() == report_name {
            reports.push(entry.into_path());
        }
    }
    Ok(reports)
}

/// Parse every report under `config.root` and accumulate the results.
///
/// Each report is logged as its worker picks it up. A report that cannot be
/// read is logged as it fails, counted in `total_files` and listed in
/// `failures`; the run carries on with the remaining files. The root itself
/// must be an existing directory.
pub fn aggregate(config: &AggregateConfig, catalog: &AminoAcidCatalog) -> Result<CorpusStats> {
    let reports = discover_reports(&config.root, &config.report_name)?;
    log::info!(
        "Found {} {} files under {}",
        reports.len(),
        config.report_name,
        config.root.display()
    );
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let mut corpus = CorpusStats::new(catalog);
    for batch in reports.chunks(config.batch_size.max(1)) {
        let parsed: Vec<_> = pool.install(|| {
            batch
                .par_iter()
                .map(|path| {
                    log::info!("Processing {}", path.display());
                    let result = parse_report(path, catalog);
                    if let Err(e) = &result {
                        log::warn!("{e}");
                    }
                    result
                })
                .collect()
        });
        for (path, result) in batch.iter().zip(parsed) {
            match result {
                Ok(report) => corpus.absorb(path, report),
                Err(e) => corpus.record_failure(path, &e),
            }
        }
    }
    Ok(corpus)
}
