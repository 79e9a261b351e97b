use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use trna_census::scan::{discover_inputs, run_all, DriverConfig};

/// Run tRNAscan-SE on every genome below a directory, writing tRNA.out, rRNA.ss and tRNA.stats next to each genome.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory holding the genomes; it must exist.
    #[arg(short, long)]
    root: PathBuf,
    /// The tRNAscan-SE executable.
    #[arg(short, long, default_value = "tRNAscan-SE")]
    executable: PathBuf,
    /// Extension of genome files.
    #[arg(long, default_value = "fna")]
    extension: String,
    /// Concurrent tRNAscan-SE processes (0 = all cores).
    #[arg(short, long, default_value_t = 0)]
    threads: usize,
    /// Extra arguments passed to tRNAscan-SE, e.g. `-- -B`.
    #[arg(last = true)]
    extra_args: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = DriverConfig {
        root: args.root,
        executable: args.executable,
        input_extension: args.extension,
        threads: args.threads,
        extra_args: args.extra_args,
    };
    let inputs = discover_inputs(&config.root, &config.input_extension)
        .with_context(|| format!("searching {}", config.root.display()))?;
    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{msg} [{elapsed_precise}] {wide_bar} {pos}/{len}")?,
    );
    progress.set_message("Processing files");
    let report = run_all(&config, &inputs, &progress)?;
    progress.finish();
    log::info!(
        "{} finished, {} skipped, {} failed",
        report.completed.len(),
        report.skipped.len(),
        report.failures.len()
    );
    for failure in report.failures.iter() {
        eprintln!("{}\t{}", failure.path.display(), failure.message);
    }
    Ok(())
}
