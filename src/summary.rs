use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::Write;

use crate::aggregate::CorpusStats;

/// End-of-run figures shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total_files: usize,
    pub missing_files: usize,
    pub average_missing: f64,
    pub failed_files: usize,
    pub frequencies: BTreeMap<String, f64>,
}

impl RunSummary {
    /// Codons by descending frequency; ties go to the smaller codon.
    pub fn sorted_frequencies(&self) -> Vec<(&str, f64)> {
        let mut sorted: Vec<_> = self
            .frequencies
            .iter()
            .map(|(codon, &freq)| (codon.as_str(), freq))
            .collect();
        sorted.sort_by(|(c1, f1), (c2, f2)| {
            f2.partial_cmp(f1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| c1.cmp(c2))
        });
        sorted
    }
}

pub fn write_summary<W: Write>(summary: &RunSummary, wtr: &mut W) -> std::io::Result<()> {
    writeln!(wtr, "Total files processed: {}", summary.total_files)?;
    writeln!(
        wtr,
        "Files with missing amino acids: {}",
        summary.missing_files
    )?;
    writeln!(
        wtr,
        "Average missing amino acids per file: {:.2}",
        summary.average_missing
    )?;
    if 0 < summary.failed_files {
        writeln!(wtr, "Files that could not be read: {}", summary.failed_files)?;
    }
    writeln!(wtr)?;
    writeln!(wtr, "Codon frequencies across all files:")?;
    for (codon, freq) in summary.sorted_frequencies() {
        writeln!(wtr, "{codon}: {freq:.4}")?;
    }
    Ok(())
}

/// Tab-separated per-amino-acid totals, in catalog order.
pub fn write_amino_acid_totals<W: Write>(
    corpus: &CorpusStats,
    wtr: &mut W,
) -> std::io::Result<()> {
    writeln!(wtr, "AminoAcid\tTotal\tCodonObservations")?;
    for (code, stats) in corpus.amino_acid_totals() {
        writeln!(wtr, "{code}\t{}\t{}", stats.total, stats.codon_counts.len())?;
    }
    Ok(())
}
