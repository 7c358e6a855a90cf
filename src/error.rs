use std::fmt;
use std::path::PathBuf;

/// The pipeline stage an I/O failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Store,
    Raster,
    Check,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Store => "store",
            Stage::Raster => "raster",
            Stage::Check => "check",
        };
        f.write_str(name)
    }
}

/// A hex stream that does not describe a valid grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("expected {expected} hex tokens, found {found}")]
    TokenCount { expected: usize, found: usize },
    /// `index` is the 0-based position of the token in the stream.
    #[error("token {index} ({token:?}) is not an unsigned hex byte")]
    InvalidToken { index: usize, token: String },
}

#[derive(Debug, thiserror::Error)]
pub enum GoldenError {
    #[error("{stage}: cannot access {}: {source}", path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage}: {source}")]
    Format {
        stage: Stage,
        #[source]
        source: FormatError,
    },
    #[error("invalid grid shape: {reason}")]
    Shape { reason: String },
    #[error("raster: cannot write {}: {source}", path.display())]
    Raster {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid mode {0:?}, expected 0 (unfiltered) or 1 (filtered)")]
    InvalidMode(String),
    #[error("parallel worker failed: {0}")]
    Worker(String),
}

impl GoldenError {
    pub(crate) fn io(stage: Stage, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GoldenError::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        GoldenError::Shape {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_count_message_names_stage_and_contract() {
        let err = GoldenError::Format {
            stage: Stage::Load,
            source: FormatError::TokenCount {
                expected: 262_144,
                found: 12,
            },
        };
        assert_eq!(err.to_string(), "load: expected 262144 hex tokens, found 12");
    }

    #[test]
    fn io_message_includes_path() {
        let err = GoldenError::io(
            Stage::Store,
            "out/golden_sobel.hex",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.starts_with("store: cannot access out/golden_sobel.hex"));
        assert!(message.ends_with("denied"));
    }
}
