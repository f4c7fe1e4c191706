use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use argus_protocol::SourceFile;
use ignore::WalkBuilder;
use tracing::debug;
use tracing::warn;

/// Reads every analyzable file under the given paths. Directories are
/// walked respecting `.gitignore`; binary (non-UTF-8) files are skipped
/// with a warning rather than failing the run.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if let Some(file) = read_source(path, path) {
                files.push(file);
            }
        } else if path.is_dir() {
            collect_dir(path, &mut files);
        } else {
            anyhow::bail!("path does not exist: {}", path.display());
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = files.len(), "collected source files");
    Ok(files)
}

fn collect_dir(root: &Path, files: &mut Vec<SourceFile>) {
    // Honor .gitignore even outside a git checkout.
    for entry in WalkBuilder::new(root).require_git(false).build().flatten() {
        let path = entry.path();
        if entry.file_type().is_some_and(|t| t.is_file())
            && let Some(file) = read_source(path, root)
        {
            files.push(file);
        }
    }
}

fn read_source(path: &Path, root: &Path) -> Option<SourceFile> {
    let name = path
        .strip_prefix(root)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned();
    match std::fs::read_to_string(path) {
        Ok(content) => Some(SourceFile::new(name, content)),
        Err(err) => {
            warn!(file = name.as_str(), %err, "skipping unreadable file");
            None
        }
    }
}
