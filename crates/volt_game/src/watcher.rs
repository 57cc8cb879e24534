use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Polls a file's modification time. `should_reload` reports each change once.
#[derive(Debug)]
pub struct FileWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl FileWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&path);
        Self {
            path,
            last_seen_modified,
        }
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Forget pending changes, e.g. after a manual reload.
    pub fn mark_seen(&mut self) {
        self.last_seen_modified = modified_time(&self.path);
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "volt_watch_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn watcher_detects_newly_created_file() {
        let path = temp_file_path("create");
        let _ = fs::remove_file(&path);

        let mut watcher = FileWatcher::new(path.clone());
        assert!(!watcher.should_reload(), "missing file should not reload");

        fs::write(&path, "{}").expect("write watched file");
        assert!(
            watcher.should_reload(),
            "creating file should trigger reload once"
        );
        assert!(
            !watcher.should_reload(),
            "without changes, second poll should not reload"
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn existing_file_is_not_reported_until_it_changes() {
        let path = temp_file_path("existing");
        fs::write(&path, "{}").expect("write watched file");

        let mut watcher = FileWatcher::new(path.clone());
        assert!(!watcher.should_reload());
        watcher.mark_seen();
        assert!(!watcher.should_reload());

        let _ = fs::remove_file(path);
    }
}
