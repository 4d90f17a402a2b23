//! Test utilities shared across test modules

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::fs;
use std::io;
use tempfile::TempDir;

use crate::paths::Paths;
use crate::selector::KeySource;

/// Create a Paths struct rooted at a temporary home directory
pub fn setup_test_paths(temp_dir: &TempDir) -> Paths {
    Paths::with_home(temp_dir.path())
}

/// Write `contents` to the config file, creating `~/.aws` as needed
pub fn write_config(paths: &Paths, contents: &str) {
    if let Some(parent) = paths.aws_config.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&paths.aws_config, contents).unwrap();
}

/// Key presses replayed in order; running out is an EOF error
pub struct ScriptedKeys(VecDeque<KeyEvent>);

impl ScriptedKeys {
    pub fn new(codes: &[KeyCode]) -> Self {
        Self(
            codes
                .iter()
                .map(|c| KeyEvent::new(*c, KeyModifiers::NONE))
                .collect(),
        )
    }

    pub fn then(mut self, key: KeyEvent) -> Self {
        self.0.push_back(key);
        self
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        self.0
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more keys"))
    }
}
