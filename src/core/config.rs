use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem locations the service depends on. The database lives at a
/// fixed path under the data directory; both directories are created
/// eagerly so SQLite can open its file on first run.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub db_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        Self::rooted_at(&discover_base_dir())
    }

    /// Builds the path set under an explicit base directory. Tests point
    /// this at a scratch directory instead of the real data dir.
    pub fn rooted_at(base: &Path) -> Self {
        let data_dir = base.join("sim").join("data");
        let log_dir = base.join("logs");
        let db_path = data_dir.join("data.sqlite");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            data_dir,
            log_dir,
            db_path,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_base_dir() -> PathBuf {
    if let Ok(dir) = env::var("SIM_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if cfg!(debug_assertions) {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        return env::current_dir().unwrap_or(manifest_dir);
    }

    if cfg!(target_os = "windows") {
        let base = env::var("LOCALAPPDATA")
            .unwrap_or_else(|_| env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string()));
        return PathBuf::from(base).join("SimBackend");
    }

    if cfg!(target_os = "macos") {
        return home_dir()
            .join("Library")
            .join("Application Support")
            .join("SimBackend");
    }

    let xdg = env::var("XDG_DATA_HOME").unwrap_or_else(|_| {
        home_dir()
            .join(".local/share")
            .to_string_lossy()
            .to_string()
    });
    PathBuf::from(xdg).join("sim-backend")
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rooted_paths_create_directories() {
        let dir = TempDir::new().expect("temp dir");
        let paths = AppPaths::rooted_at(dir.path());

        assert!(paths.data_dir.is_dir());
        assert!(paths.log_dir.is_dir());
        assert_eq!(paths.db_path, paths.data_dir.join("data.sqlite"));
    }
}
