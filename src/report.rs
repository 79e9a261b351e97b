//! Parser for per-genome isotype/anticodon count reports.
//!
//! A recognized line looks like
//!
//! ```text
//! Ala      : 5    AGC: 0   GGC: 3   CGC: 1   TGC: 1
//! ```
//!
//! Everything else is ignored.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::AminoAcidCatalog;
use crate::error::{Error, Result};

static LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)\s+:\s+([0-9]+)\s+(.*)$").unwrap());
static CODON_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+): ([0-9]+)").unwrap());

/// One recognized report line, borrowed from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine<'a> {
    pub name: &'a str,
    pub total: u64,
    pub codons: Vec<(&'a str, u64)>,
}

/// Split a line into name, total and the codon pairs found in the remainder.
/// Returns `None` for lines that do not carry a `<name> : <total> <rest>`
/// shape; a trimmed `Ala : 5` has no rest and is not a report line.
pub fn parse_line(line: &str) -> Option<ReportLine<'_>> {
    let caps = LINE.captures(line)?;
    let name = caps.get(1)?.as_str();
    let total = parse_count(caps.get(2)?.as_str());
    let codons = codon_pairs(caps.get(3)?.as_str());
    Some(ReportLine {
        name,
        total,
        codons,
    })
}

fn codon_pairs(rest: &str) -> Vec<(&str, u64)> {
    CODON_COUNT
        .captures_iter(rest)
        .filter_map(|caps| {
            let codon = caps.get(1)?.as_str();
            let count = parse_count(caps.get(2)?.as_str());
            Some((codon, count))
        })
        .collect()
}

/// Counts are ASCII digit runs, so the only parse failure is overflow, which
/// clamps to `u64::MAX`.
fn parse_count(digits: &str) -> u64 {
    digits.parse().unwrap_or_else(|_| {
        log::warn!("Count {digits} does not fit in 64 bits, clamped");
        u64::MAX
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AminoAcidStats {
    pub total: u64,
    /// Individual codon counts, in the order they were read.
    pub codon_counts: Vec<u64>,
}

/// Per-amino-acid statistics of a single report, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerFileStats {
    entries: Vec<(String, AminoAcidStats)>,
}

impl PerFileStats {
    pub fn new(catalog: &AminoAcidCatalog) -> Self {
        let entries = catalog
            .iter()
            .map(|code| (code.to_string(), AminoAcidStats::default()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, code: &str) -> Option<&AminoAcidStats> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, stats)| stats)
    }

    fn get_mut(&mut self, code: &str) -> Option<&mut AminoAcidStats> {
        self.entries
            .iter_mut()
            .find(|(c, _)| c == code)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AminoAcidStats)> + '_ {
        self.entries.iter().map(|(c, s)| (c.as_str(), s))
    }

    /// Catalog amino acids whose total is still zero.
    pub fn missing(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, stats)| stats.total == 0)
            .map(|(code, _)| code.clone())
            .collect()
    }
}

/// Everything extracted from one report file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub stats: PerFileStats,
    /// Every codon observation in the file, including those on lines whose
    /// name is outside the catalog.
    pub codons: Vec<(String, u64)>,
    pub missing: Vec<String>,
}

pub fn parse_report_reader<R: BufRead>(
    reader: R,
    catalog: &AminoAcidCatalog,
) -> std::io::Result<FileReport> {
    let mut stats = PerFileStats::new(catalog);
    let mut codons = vec![];
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(parsed) = parse_line(line) else {
            continue;
        };
        codons.extend(parsed.codons.iter().map(|&(c, n)| (c.to_string(), n)));
        if let Some(entry) = stats.get_mut(parsed.name) {
            entry.total = entry.total.saturating_add(parsed.total);
            entry.codon_counts.extend(parsed.codons.iter().map(|&(_, n)| n));
        }
    }
    let missing = stats.missing();
    Ok(FileReport {
        stats,
        codons,
        missing,
    })
}

pub fn parse_report_str(text: &str, catalog: &AminoAcidCatalog) -> FileReport {
    // Reading from a byte slice of valid UTF-8 cannot fail.
    match parse_report_reader(text.as_bytes(), catalog) {
        Ok(report) => report,
        Err(_) => unreachable!(),
    }
}

pub fn parse_report(path: &Path, catalog: &AminoAcidCatalog) -> Result<FileReport> {
    let read_error = |source| Error::ReadReport {
        path: path.to_path_buf(),
        source,
    };
    let reader = File::open(path).map(BufReader::new).map_err(read_error)?;
    parse_report_reader(reader, catalog).map_err(read_error)
}
