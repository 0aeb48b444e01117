use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "keyforge")
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("keyforge");
            Some(state_dir.join("keyforge.log"))
        } else {
            Self::project().map(|dirs| dirs.data_local_dir().join("keyforge.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_use_expected_file_names() {
        if let Some(path) = AppDirs::config_path() {
            assert!(path.ends_with("config.json"));
        }
        if let Some(path) = AppDirs::log_path() {
            assert!(path.ends_with("keyforge.log"));
        }
    }
}
