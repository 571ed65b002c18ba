//! Trust decision for an archive already present at the destination path.

use std::fs::File;
use std::path::Path;

use crate::api::MediaSource;
use crate::error::{Error, Result};
use crate::media::TransferTarget;

/// Outcome of validating an existing archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The file can be kept as the finished archive.
    Trusted { bytes: u64 },
    /// The file must be discarded and downloaded again.
    Stale { reason: String },
}

/// Decide whether the archive at `target.dest` can be trusted.
///
/// The server's declared size wins when the HEAD probe reports one. Without
/// it the file must open as a zip with at least one entry. Any error while
/// checking makes the file stale.
pub async fn validate_existing(source: &dyn MediaSource, target: &TransferTarget) -> Validation {
    let local_size = match tokio::fs::metadata(&target.dest).await {
        Ok(meta) => meta.len(),
        Err(e) => {
            return Validation::Stale {
                reason: format!("could not read existing file: {}", e),
            }
        }
    };

    let probe = match source.probe_archive(&target.ids).await {
        Ok(probe) => probe,
        Err(e) => {
            return Validation::Stale {
                reason: format!("could not validate existing file: {}", e),
            }
        }
    };

    if let Some(expected) = probe.expected_size() {
        return if expected == local_size {
            Validation::Trusted { bytes: local_size }
        } else {
            Validation::Stale {
                reason: format!("incomplete: {}/{} bytes", local_size, expected),
            }
        };
    }

    tracing::debug!(
        "No declared size for page {}, checking archive contents",
        target.page
    );

    let path = target.dest.clone();
    let entries = tokio::task::spawn_blocking(move || count_zip_entries(&path))
        .await
        .map_err(|e| Error::InvalidArchive(format!("validation task failed: {}", e)))
        .and_then(|r| r);

    match entries {
        Ok(0) => Validation::Stale {
            reason: "existing archive is empty".to_string(),
        },
        Ok(_) => Validation::Trusted { bytes: local_size },
        Err(e) => Validation::Stale {
            reason: format!("existing archive is corrupted: {}", e),
        },
    }
}

/// Number of entries in the zip at `path`.
pub fn count_zip_entries(path: &Path) -> Result<usize> {
    let file = File::open(path)?;
    let archive = zip::ZipArchive::new(file)?;
    Ok(archive.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::testing::{write_zip, FakeSource, ProbeBehavior};
    use tempfile::TempDir;

    fn target_in(dir: &TempDir) -> TransferTarget {
        TransferTarget::for_page(1, vec!["a".into(), "b".into()], dir.path())
    }

    #[tokio::test]
    async fn test_matching_size_is_trusted() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        std::fs::write(&target.dest, vec![1u8; 64]).unwrap();

        let source = FakeSource::new().with_probe(ProbeBehavior::Size(Some(64)));
        assert_eq!(
            validate_existing(&source, &target).await,
            Validation::Trusted { bytes: 64 }
        );
    }

    #[tokio::test]
    async fn test_size_mismatch_is_stale() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        std::fs::write(&target.dest, vec![1u8; 10]).unwrap();

        let source = FakeSource::new().with_probe(ProbeBehavior::Size(Some(64)));
        match validate_existing(&source, &target).await {
            Validation::Stale { reason } => assert!(reason.contains("10/64")),
            other => panic!("expected stale, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_size_probe_wins_over_container_check() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        write_zip(&target.dest, &[("clip.mp4", "data")]);

        // A valid zip of the wrong size is still stale.
        let source = FakeSource::new().with_probe(ProbeBehavior::Size(Some(1)));
        assert!(matches!(
            validate_existing(&source, &target).await,
            Validation::Stale { .. }
        ));
    }

    #[tokio::test]
    async fn test_no_size_falls_back_to_zip_check() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        write_zip(&target.dest, &[("clip.mp4", "data")]);
        let size = std::fs::metadata(&target.dest).unwrap().len();

        let source = FakeSource::new().with_probe(ProbeBehavior::Size(None));
        assert_eq!(
            validate_existing(&source, &target).await,
            Validation::Trusted { bytes: size }
        );
    }

    #[tokio::test]
    async fn test_empty_zip_is_stale() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        write_zip(&target.dest, &[]);

        let source = FakeSource::new().with_probe(ProbeBehavior::Size(None));
        match validate_existing(&source, &target).await {
            Validation::Stale { reason } => assert!(reason.contains("empty")),
            other => panic!("expected stale, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_is_stale() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        std::fs::write(&target.dest, b"definitely not a zip").unwrap();

        let source = FakeSource::new().with_probe(ProbeBehavior::Size(None));
        match validate_existing(&source, &target).await {
            Validation::Stale { reason } => assert!(reason.contains("corrupted")),
            other => panic!("expected stale, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_probe_error_is_stale() {
        let dir = TempDir::new().unwrap();
        let target = target_in(&dir);
        write_zip(&target.dest, &[("clip.mp4", "data")]);

        let source = FakeSource::new().with_probe(ProbeBehavior::Fail);
        match validate_existing(&source, &target).await {
            Validation::Stale { reason } => assert!(reason.contains("could not validate")),
            other => panic!("expected stale, got {:?}", other),
        }
    }
}
