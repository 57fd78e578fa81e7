//! Read-before-edit tracking shared between the file tools.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Records which files have been read this session.
///
/// `edit_file` refuses to touch a file that has not passed through
/// `read_file` first, which keeps the model from editing blind.
#[derive(Clone, Default)]
pub struct ReadTracker {
    read_files: Arc<Mutex<HashSet<PathBuf>>>,
}

impl ReadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a file as read.
    pub fn mark_read(&self, path: &Path) {
        let abs = absolute(path);
        self.read_files.lock().expect("tracker poisoned").insert(abs);
    }

    /// Whether this file has been read this session.
    pub fn was_read(&self, path: &Path) -> bool {
        let abs = absolute(path);
        self.read_files.lock().expect("tracker poisoned").contains(&abs)
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_reads() {
        let tracker = ReadTracker::new();
        let path = Path::new("/tmp/helmsman_tracker_test.txt");
        assert!(!tracker.was_read(path));
        tracker.mark_read(path);
        assert!(tracker.was_read(path));
    }

    #[test]
    fn clones_share_state() {
        let tracker = ReadTracker::new();
        let clone = tracker.clone();
        tracker.mark_read(Path::new("/tmp/shared.txt"));
        assert!(clone.was_read(Path::new("/tmp/shared.txt")));
    }
}
