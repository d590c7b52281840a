//! Removable-medium discovery - locating the candidate signature file
//!
//! The medium's mount layout is not under this system's control, so the
//! well-known filename is searched for under the mount point: a direct
//! probe first, then a bounded depth-first descent. First hit wins.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Well-known name of the signature file on the medium
pub const SIGNATURE_FILE_NAME: &str = "lastresort.sig";

/// Directory depth cap guarding against pathological mount trees
const MAX_DEPTH: usize = 32;

/// Find the candidate signature file under a mount point
///
/// Probes `mount_point/file_name` directly, then descends. Symbolic links
/// are never followed, so a link cannot escape the mount point or create a
/// cycle. Every failure - including a missing or untraversable mount point -
/// reports "not found", never an error.
pub fn find_signature_file(mount_point: &Path, file_name: &str) -> Option<PathBuf> {
    let direct = mount_point.join(file_name);
    if is_regular_file(&direct) {
        debug!(path = %direct.display(), "signature file found at mount root");
        return Some(direct);
    }

    let mut stack = vec![(mount_point.to_path_buf(), 0usize)];
    while let Some((dir, depth)) = stack.pop() {
        if depth >= MAX_DEPTH {
            continue;
        }
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            // file_type() on a dir entry does not traverse symlinks
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(_) => continue,
            };
            if !file_type.is_dir() {
                continue;
            }
            let candidate = entry.path().join(file_name);
            if is_regular_file(&candidate) {
                debug!(path = %candidate.display(), "signature file found");
                return Some(candidate);
            }
            stack.push((entry.path(), depth + 1));
        }
    }

    None
}

fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
