//! Runs the external tRNA annotation tool over every genome under a root.
//!
//! Each genome `<dir>/<name>.fna` produces `<dir>/tRNA.out`, `<dir>/rRNA.ss`
//! and `<dir>/tRNA.stats`. Genomes whose three outputs already exist are
//! skipped, so an interrupted run can simply be restarted.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use indicatif::ProgressBar;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::aggregate::FileFailure;
use crate::error::{Error, Result};
use crate::REPORT_FILE_NAME;

pub const OUTPUT_FILE_NAME: &str = "tRNA.out";
pub const STRUCTURE_FILE_NAME: &str = "rRNA.ss";

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub root: PathBuf,
    pub executable: PathBuf,
    /// Extension of genome files, without the dot.
    pub input_extension: String,
    /// Concurrent tool invocations (0 = one per core).
    pub threads: usize,
    /// Passed to the tool ahead of the output flags.
    pub extra_args: Vec<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            executable: PathBuf::from("tRNAscan-SE"),
            input_extension: "fna".to_string(),
            threads: 0,
            extra_args: vec![],
        }
    }
}

/// The three files the tool writes for one genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTargets {
    pub output: PathBuf,
    pub structure: PathBuf,
    pub stats: PathBuf,
}

impl ScanTargets {
    pub fn for_input(input: &Path) -> Self {
        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        Self {
            output: dir.join(OUTPUT_FILE_NAME),
            structure: dir.join(STRUCTURE_FILE_NAME),
            stats: dir.join(REPORT_FILE_NAME),
        }
    }

    pub fn all_exist(&self) -> bool {
        self.output.exists() && self.structure.exists() && self.stats.exists()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Skipped,
}

#[derive(Debug, Clone, Default)]
pub struct DriverReport {
    pub completed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

pub fn discover_inputs(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    let mut inputs = vec![];
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        let matches = entry.path().extension().map_or(false, |ext| ext == extension);
        if matches && !entry.file_type().is_dir() {
            inputs.push(entry.into_path());
        }
    }
    Ok(inputs)
}

/// Run the tool on a single genome unless its outputs are already there.
pub fn run_one(config: &DriverConfig, input: &Path) -> Result<Outcome> {
    let targets = ScanTargets::for_input(input);
    if targets.all_exist() {
        log::debug!("Outputs exist, skipping {}", input.display());
        return Ok(Outcome::Skipped);
    }
    let output = Command::new(&config.executable)
        .args(&config.extra_args)
        .arg("-o")
        .arg(&targets.output)
        .arg("-f")
        .arg(&targets.structure)
        .arg("-m")
        .arg(&targets.stats)
        .arg(input)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => Error::ToolNotFound {
                program: config.executable.clone(),
            },
            _ => Error::Launch {
                program: config.executable.clone(),
                source,
            },
        })?;
    if !output.status.success() {
        log::debug!(
            "{} stderr: {}",
            input.display(),
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
        return Err(Error::ToolFailed {
            program: config.executable.clone(),
            input: input.to_path_buf(),
            status: output.status,
        });
    }
    Ok(Outcome::Completed)
}

/// Run the tool on every input on a bounded pool, logging each genome's
/// outcome as soon as its task ends.
pub fn run_all(
    config: &DriverConfig,
    inputs: &[PathBuf],
    progress: &ProgressBar,
) -> Result<DriverReport> {
    run_all_with(config, inputs, |input, result| {
        progress.suspend(|| log_outcome(input, result));
        progress.inc(1);
    })
}

/// Like [`run_all`], but hands each outcome to `on_done` from the worker that
/// produced it. A failing genome is recorded and does not stop the others.
pub fn run_all_with<F>(config: &DriverConfig, inputs: &[PathBuf], on_done: F) -> Result<DriverReport>
where
    F: Fn(&Path, &Result<Outcome>) + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let results: Vec<_> = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let result = run_one(config, input);
                on_done(input, &result);
                result
            })
            .collect()
    });
    let mut report = DriverReport::default();
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(Outcome::Completed) => report.completed.push(input.clone()),
            Ok(Outcome::Skipped) => report.skipped.push(input.clone()),
            Err(e) => report.failures.push(FileFailure {
                path: input.clone(),
                message: e.to_string(),
            }),
        }
    }
    Ok(report)
}

fn log_outcome(input: &Path, result: &Result<Outcome>) {
    match result {
        Ok(Outcome::Completed) => log::info!("Finished {}", input.display()),
        Ok(Outcome::Skipped) => log::info!("Outputs exist, skipped {}", input.display()),
        Err(e) => log::warn!("Task failed: {e}"),
    }
}
