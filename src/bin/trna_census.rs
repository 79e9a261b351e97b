use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use trna_census::{aggregate, save_missing_index, AggregateConfig, AminoAcidCatalog};

/// Summarize tRNA.stats files: missing amino acids per genome and codon frequencies over the whole corpus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory to search for reports. It must exist: a missing root
    /// is an error, not an empty corpus.
    #[arg(short, long)]
    root: PathBuf,
    /// Where to write the missing amino acid index (JSON).
    #[arg(short, long)]
    output: PathBuf,
    /// Base name of the report files.
    #[arg(long, default_value = trna_census::REPORT_FILE_NAME)]
    report_name: String,
    /// Parsing threads (0 = all cores).
    #[arg(short, long, default_value_t = 0)]
    threads: usize,
    /// Reports parsed per batch.
    #[arg(long, default_value_t = 4096)]
    batch_size: usize,
    /// Also print per-amino-acid totals.
    #[arg(long)]
    amino_acid_totals: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = AggregateConfig {
        root: args.root,
        report_name: args.report_name,
        threads: args.threads,
        batch_size: args.batch_size,
    };
    let catalog = AminoAcidCatalog::standard();
    let corpus = aggregate(&config, &catalog)
        .with_context(|| format!("aggregating reports under {}", config.root.display()))?;
    save_missing_index(&corpus.missing_index, &args.output)?;
    let stdout = std::io::stdout();
    let mut wtr = BufWriter::new(stdout.lock());
    trna_census::summary::write_summary(&corpus.summary(), &mut wtr)?;
    if args.amino_acid_totals {
        writeln!(&mut wtr)?;
        trna_census::summary::write_amino_acid_totals(&corpus, &mut wtr)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn root_help_says_it_must_exist() {
        let cmd = Args::command();
        let root = cmd.get_arguments().find(|a| a.get_id() == "root").unwrap();
        let help = root.get_help().unwrap().to_string();
        assert!(help.contains("must exist"), "{help}");
    }
}
