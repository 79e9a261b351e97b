use std::path::PathBuf;
use std::process::ExitStatus;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read report {}: {source}", path.display())]
    ReadReport {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 and cannot be indexed", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },

    #[error("cannot write summary to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot decode summary {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{} was not found; is it installed and on PATH?", program.display())]
    ToolNotFound { program: PathBuf },

    #[error("cannot launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("{} exited with {status} on {}", program.display(), input.display())]
    ToolFailed {
        program: PathBuf,
        input: PathBuf,
        status: ExitStatus,
    },
}
