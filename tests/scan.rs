#![cfg(unix)]
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indicatif::ProgressBar;

use trna_census::scan::{discover_inputs, run_all, run_all_with, DriverConfig, Outcome, ScanTargets};

// Stand-in for tRNAscan-SE: creates the -o/-f/-m outputs, or fails when the
// genome name contains "broken".
const FAKE_TOOL: &str = r#"
for last; do :; done
case "$last" in
    *broken*) echo "cannot parse $last" >&2; exit 3 ;;
esac
while [ $# -gt 1 ]; do
    case "$1" in
        -o|-f|-m) printf 'Ala : 1 GGC: 1\n' > "$2"; shift 2 ;;
        *) shift ;;
    esac
done
"#;

fn genome(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{name}_genomic.fna"));
    std::fs::write(&path, ">contig_1\nACGTACGT\n").unwrap();
    path
}

fn fake_config(root: &Path, script: &Path) -> DriverConfig {
    DriverConfig {
        root: root.to_path_buf(),
        executable: PathBuf::from("sh"),
        threads: 2,
        extra_args: vec![script.to_string_lossy().into_owned()],
        ..DriverConfig::default()
    }
}

#[test]
fn runs_skips_and_survives_failures() {
    let work = tempfile::tempdir().unwrap();
    let script = work.path().join("fake_trnascan.sh");
    std::fs::write(&script, FAKE_TOOL).unwrap();
    let root = work.path().join("db");
    let fresh = genome(&root, "GB_GCA_1");
    let broken = genome(&root, "GB_GCA_broken");
    let done = genome(&root, "RS_GCF_3");
    let done_targets = ScanTargets::for_input(&done);
    for path in [&done_targets.output, &done_targets.structure, &done_targets.stats] {
        std::fs::write(path, "previous run").unwrap();
    }

    let config = fake_config(&root, &script);
    let inputs = discover_inputs(&root, &config.input_extension).unwrap();
    assert_eq!(inputs, vec![fresh.clone(), broken.clone(), done.clone()]);

    let progress = ProgressBar::hidden();
    let report = run_all(&config, &inputs, &progress).unwrap();
    assert_eq!(progress.position(), 3);
    assert_eq!(report.completed, vec![fresh.clone()]);
    assert_eq!(report.skipped, vec![done.clone()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, broken);

    assert!(ScanTargets::for_input(&fresh).all_exist());
    assert!(!ScanTargets::for_input(&broken).all_exist());
    let untouched = std::fs::read_to_string(&done_targets.stats).unwrap();
    assert_eq!(untouched, "previous run");
}

#[test]
fn second_pass_skips_everything() {
    let work = tempfile::tempdir().unwrap();
    let script = work.path().join("fake_trnascan.sh");
    std::fs::write(&script, FAKE_TOOL).unwrap();
    let root = work.path().join("db");
    genome(&root, "g1");
    genome(&root, "g2");
    let config = fake_config(&root, &script);
    let inputs = discover_inputs(&root, "fna").unwrap();

    let first = run_all(&config, &inputs, &ProgressBar::hidden()).unwrap();
    assert_eq!(first.completed.len(), 2);
    let second = run_all(&config, &inputs, &ProgressBar::hidden()).unwrap();
    assert!(second.completed.is_empty());
    assert_eq!(second.skipped.len(), 2);
    assert!(second.failures.is_empty());
}

#[test]
fn outcomes_are_reported_while_the_pool_is_still_running() {
    let work = tempfile::tempdir().unwrap();
    let script = work.path().join("fake_trnascan.sh");
    std::fs::write(&script, FAKE_TOOL).unwrap();
    let root = work.path().join("db");
    let first = genome(&root, "g1");
    let broken = genome(&root, "g2_broken");
    let last = genome(&root, "g3");
    let config = DriverConfig {
        threads: 1,
        ..fake_config(&root, &script)
    };
    let inputs = discover_inputs(&root, "fna").unwrap();
    assert_eq!(inputs, vec![first.clone(), broken.clone(), last.clone()]);

    // (input, completed, last genome already scanned when the outcome arrived)
    let seen: Mutex<Vec<(PathBuf, bool, bool)>> = Mutex::new(vec![]);
    let report = run_all_with(&config, &inputs, |input, result| {
        let last_done = ScanTargets::for_input(&last).all_exist();
        let completed = matches!(result, Ok(Outcome::Completed));
        seen.lock().unwrap().push((input.to_path_buf(), completed, last_done));
    })
    .unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 3);
    let first_event = seen.iter().find(|x| x.0 == first).unwrap();
    assert!(first_event.1);
    assert!(!first_event.2);
    let broken_event = seen.iter().find(|x| x.0 == broken).unwrap();
    assert!(!broken_event.1);
    assert!(!broken_event.2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.completed.len(), 2);
}
