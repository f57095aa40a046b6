//! Locations of the TOML files merged into the configuration.

use crate::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// A TOML file layer. Later layers override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Per-user defaults under the XDG config directory.
    User,
    /// `chaincheck.toml`, checked in next to the testbed.
    Project,
    /// `chaincheck.local.toml`, uncommitted overrides.
    Local,
}

impl ConfigLayer {
    /// All layers, lowest precedence first.
    pub const ALL: [ConfigLayer; 3] = [ConfigLayer::User, ConfigLayer::Project, ConfigLayer::Local];

    pub fn file_name(self) -> &'static str {
        match self {
            ConfigLayer::User => "config.toml",
            ConfigLayer::Project => "chaincheck.toml",
            ConfigLayer::Local => "chaincheck.local.toml",
        }
    }

    /// Where this layer lives for a run rooted at `project_dir`.
    pub fn locate(self, project_dir: &Path) -> Result<PathBuf, ConfigError> {
        let dir = match self {
            ConfigLayer::User => user_config_dir()?,
            ConfigLayer::Project | ConfigLayer::Local => project_dir.to_path_buf(),
        };
        Ok(dir.join(self.file_name()))
    }
}

/// `~/.config/chaincheck` on Linux, the platform equivalent elsewhere.
pub fn user_config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("org", "chaincheck", "chaincheck")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ConfigError::XdgError("no home directory for user config".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_layers_sit_in_project_dir() {
        let project = Path::new("/srv/testbed");

        assert_eq!(
            ConfigLayer::Project.locate(project).unwrap(),
            project.join("chaincheck.toml")
        );
        assert_eq!(
            ConfigLayer::Local.locate(project).unwrap(),
            project.join("chaincheck.local.toml")
        );
    }

    #[test]
    fn user_layer_ignores_project_dir() {
        // Hosts without a home directory have no user layer.
        if let Ok(path) = ConfigLayer::User.locate(Path::new("/srv/testbed")) {
            assert!(!path.starts_with("/srv/testbed"));
            assert!(path.ends_with("chaincheck/config.toml"));
        }
    }

    #[test]
    fn layers_are_ordered_by_precedence() {
        assert_eq!(
            ConfigLayer::ALL,
            [ConfigLayer::User, ConfigLayer::Project, ConfigLayer::Local]
        );
    }
}
