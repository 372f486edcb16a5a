//! Asset staging - copies an optional static directory into the build output

use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

/// Error types for staging operations
#[derive(Debug, Error)]
pub enum StageError {
    /// A file or directory could not be read, created or written
    #[error("failed to copy {}: {source}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a staging run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StageReport {
    /// The source directory does not exist; nothing was copied
    Skipped { source: PathBuf },

    /// The tree was copied
    Copied {
        files: usize,
        directories: usize,
        bytes: u64,
    },
}

/// Trait for staging assets - allows for different implementations
#[async_trait]
pub trait AssetStager: Send + Sync {
    /// Copy `source` into `destination` if `source` is a directory
    async fn stage(&self, source: &Path, destination: &Path) -> Result<StageReport, StageError>;
}

/// Stages assets on the local filesystem
///
/// Existing files at the destination are overwritten. A failure leaves
/// whatever was already copied in place.
#[derive(Debug, Clone, Default)]
pub struct FsAssetStager;

impl FsAssetStager {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Default)]
struct CopyStats {
    files: usize,
    directories: usize,
    bytes: u64,
}

fn copy_error(path: &Path) -> impl FnOnce(std::io::Error) -> StageError + '_ {
    move |source| StageError::Copy {
        path: path.to_path_buf(),
        source,
    }
}

/// Canonical form of a path that may not exist yet
///
/// The deepest existing ancestor is canonicalized and the missing tail is
/// appended unchanged.
async fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        match fs::canonicalize(current).await {
            Ok(resolved) => {
                return Ok(missing
                    .iter()
                    .rev()
                    .fold(resolved, |acc: PathBuf, name| acc.join(name)));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (current.parent(), current.file_name()) else {
                    return Err(e);
                };
                missing.push(name.to_os_string());
                current = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            Err(e) => return Err(e),
        }
    }
}

/// Refuse to copy a tree into itself or onto its own ancestor
async fn check_overlap(source: &Path, destination: &Path) -> Result<(), StageError> {
    let source_real = resolve(source).await.map_err(copy_error(source))?;
    let destination_real = resolve(destination)
        .await
        .map_err(copy_error(destination))?;

    if destination_real.starts_with(&source_real) || source_real.starts_with(&destination_real) {
        return Err(StageError::Copy {
            path: destination.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "destination overlaps assets directory {}",
                    source_real.display()
                ),
            ),
        });
    }

    Ok(())
}

/// Recursively copy directory contents
fn copy_tree<'a>(
    src: &'a Path,
    dst: &'a Path,
    stats: &'a mut CopyStats,
) -> Pin<Box<dyn Future<Output = Result<(), StageError>> + Send + 'a>> {
    Box::pin(async move {
        fs::create_dir_all(dst).await.map_err(copy_error(dst))?;
        stats.directories += 1;

        let mut entries = fs::read_dir(src).await.map_err(copy_error(src))?;
        while let Some(entry) = entries.next_entry().await.map_err(copy_error(src))? {
            let src_path = entry.path();
            let dst_path = dst.join(entry.file_name());
            let file_type = entry.file_type().await.map_err(copy_error(&src_path))?;

            if file_type.is_dir() {
                copy_tree(&src_path, &dst_path, stats).await?;
            } else {
                let bytes = fs::copy(&src_path, &dst_path)
                    .await
                    .map_err(copy_error(&src_path))?;
                debug!("Copied {} ({} bytes)", src_path.display(), bytes);
                stats.files += 1;
                stats.bytes += bytes;
            }
        }

        Ok(())
    })
}

#[async_trait]
impl AssetStager for FsAssetStager {
    async fn stage(&self, source: &Path, destination: &Path) -> Result<StageReport, StageError> {
        match fs::metadata(source).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                warn!(
                    "Assets path {} is not a directory, skipping",
                    source.display()
                );
                return Ok(StageReport::Skipped {
                    source: source.to_path_buf(),
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No assets at {}, skipping", source.display());
                return Ok(StageReport::Skipped {
                    source: source.to_path_buf(),
                });
            }
            Err(e) => return Err(copy_error(source)(e)),
        }

        check_overlap(source, destination).await?;

        let mut stats = CopyStats::default();
        copy_tree(source, destination, &mut stats).await?;

        info!(
            "Staged {} file(s) from {} into {}",
            stats.files,
            source.display(),
            destination.display()
        );

        Ok(StageReport::Copied {
            files: stats.files,
            directories: stats.directories,
            bytes: stats.bytes,
        })
    }
}
