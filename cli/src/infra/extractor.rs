//! Archive extraction — implements `ArchiveExtractor` with `tar` + `flate2`.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::ArchiveExtractor;
use crate::domain::ExtractError;

/// Unpacks `.tar.gz` archives on a blocking worker thread.
pub struct TarGzExtractor;

impl ArchiveExtractor for TarGzExtractor {
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let archive = archive.to_path_buf();
        let dest = dest.to_path_buf();
        let entries = tokio::task::spawn_blocking(move || unpack(&archive, &dest))
            .await
            .context("spawn_blocking for extract")??;
        tracing::debug!(entries, "archive extracted");
        Ok(())
    }
}

/// Unpack `archive` into `dest`, returning the number of entries written.
///
/// Entries whose path would land outside `dest` are skipped by `tar`.
fn unpack(archive: &Path, dest: &Path) -> Result<usize> {
    let invalid = |reason: String| ExtractError::InvalidArchive {
        path: archive.to_path_buf(),
        reason,
    };
    let destination = |reason: String| ExtractError::Destination {
        path: dest.to_path_buf(),
        reason,
    };

    std::fs::create_dir_all(dest).map_err(|e| destination(e.to_string()))?;
    let file = File::open(archive).map_err(|e| invalid(e.to_string()))?;
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
    tar.set_preserve_permissions(true);

    let mut count = 0;
    for entry in tar.entries().map_err(|e| invalid(e.to_string()))? {
        let mut entry = entry.map_err(|e| invalid(e.to_string()))?;
        entry.unpack_in(dest).map_err(|e| {
            // Decoder errors surface while reading entry data.
            if e.kind() == std::io::ErrorKind::InvalidData
                || e.kind() == std::io::ErrorKind::UnexpectedEof
                || e.kind() == std::io::ErrorKind::InvalidInput
            {
                invalid(e.to_string())
            } else {
                destination(e.to_string())
            }
        })?;
        count += 1;
    }
    if count == 0 {
        return Err(invalid("archive contains no entries".to_string()).into());
    }
    Ok(count)
}
