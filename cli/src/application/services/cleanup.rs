//! Application service — removal of run artifacts.

use std::path::Path;

use crate::application::ports::{LocalFs, ProgressReporter};

/// Remove the working directory and the archive file.
///
/// Both removals are attempted even if the first fails. Failures are
/// reported as warnings and never replace the error that triggered cleanup.
/// Paths that do not exist are skipped silently.
pub fn remove_run_artifacts(
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    working_dir: &Path,
    archive: &Path,
) {
    reporter.step("Cleaning up working directory and archive...");
    let results = [
        (working_dir, fs.remove_dir_all(working_dir)),
        (archive, fs.remove_file(archive)),
    ];
    for (path, result) in results {
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "cleanup failed");
            reporter.warn(&format!("could not remove {}: {e:#}", path.display()));
        }
    }
}
