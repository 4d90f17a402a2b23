use directories::BaseDirs;
use std::path::{Path, PathBuf};

use crate::error::{AwsPsError, Result};

/// All computed paths used by aws-ps
#[derive(Debug, Clone)]
pub struct Paths {
    /// $HOME
    pub home: PathBuf,
    /// ~/.aws/config
    pub aws_config: PathBuf,
    /// ~/.aws-ps
    pub state_file: PathBuf,
}

impl Paths {
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or(AwsPsError::HomeDirUnavailable)?;
        Ok(Self::with_home(base_dirs.home_dir()))
    }

    /// Build the standard layout rooted at an arbitrary home directory
    pub fn with_home(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            aws_config: home.join(".aws").join("config"),
            state_file: home.join(".aws-ps"),
        }
    }

    /// Replace the config location, keeping the state file where it is
    pub fn with_config(mut self, config: Option<PathBuf>) -> Self {
        if let Some(config) = config {
            self.aws_config = config;
        }
        self
    }
}
