use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{AwsPsError, Result};
use crate::profiles::DEFAULT_PROFILE;

/// The line a shell wrapper evaluates to export the chosen profile.
///
/// The default profile maps to an empty value. Embedded single quotes are
/// closed, escaped and reopened (`'\''`) so the line stays one shell word.
pub fn shell_assignment(name: &str) -> String {
    if name == DEFAULT_PROFILE {
        return "AWS_PROFILE=''".to_string();
    }
    format!("AWS_PROFILE='{}'", name.replace('\'', r"'\''"))
}

/// Print the assignment line, then overwrite the state file with `name`.
///
/// The line is written before the file is touched, so a wrapper still sees it
/// when persisting fails.
pub fn persist_selection(name: &str, out: &mut impl Write, state_file: &Path) -> Result<()> {
    writeln!(out, "{}", shell_assignment(name))
        .map_err(|e| AwsPsError::persist("<stdout>", e))?;
    out.flush().map_err(|e| AwsPsError::persist("<stdout>", e))?;

    write_state(state_file, name)
}

/// Overwrite the state file with the raw profile name.
///
/// The file is locked while it is truncated and rewritten. No temp file or
/// rename: the existing file is rewritten in place.
pub fn write_state(path: &Path, name: &str) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| AwsPsError::persist(path, e))?;

    let mut locked = LockedFile::lock(file).map_err(|e| AwsPsError::persist(path, e))?;
    overwrite(&mut locked.0, name.as_bytes()).map_err(|e| AwsPsError::persist(path, e))
}

/// An exclusively locked file, unlocked on drop
struct LockedFile(File);

impl LockedFile {
    fn lock(file: File) -> io::Result<Self> {
        file.lock_exclusive()?;
        Ok(Self(file))
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

fn overwrite(file: &mut File, contents: &[u8]) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(contents)?;
    file.sync_all()
}
