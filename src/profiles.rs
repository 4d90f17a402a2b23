//! Turning raw config entries into profile records.
//!
//! A section key is either `default` or `profile <name>`. Only `region` and
//! `output` are read from each section; everything else is ignored.

use crate::config::{ConfigSections, Setting, Settings};
use crate::error::{AwsPsError, Result};

/// The profile name that maps to an empty `AWS_PROFILE`
pub const DEFAULT_PROFILE: &str = "default";

/// A profile as shown in the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub region: String,
    pub output: String,
}

/// Derive a profile name from a section key.
///
/// `"profile foo bar"` becomes `"foo bar"`, a single-token key such as
/// `"default"` is used as-is.
pub fn profile_name(section_key: &str) -> Result<String> {
    let words: Vec<&str> = section_key.split_whitespace().collect();
    match words.as_slice() {
        [] => Err(AwsPsError::malformed(section_key, "empty section name")),
        [only] => Ok(only.to_string()),
        [_, rest @ ..] => Ok(rest.join(" ")),
    }
}

/// Build one profile per config entry, in config order
pub fn extract_profiles(sections: &ConfigSections) -> Result<Vec<Profile>> {
    sections
        .iter()
        .map(|(key, setting)| {
            let name = profile_name(key)?;
            let table = setting.as_table().ok_or_else(|| {
                AwsPsError::malformed(key, "expected a section of key/value settings")
            })?;

            Ok(Profile {
                name,
                region: string_setting(key, table, "region")?,
                output: string_setting(key, table, "output")?,
            })
        })
        .collect()
}

/// Index of the profile called `name`, if any
pub fn position_of(profiles: &[Profile], name: &str) -> Option<usize> {
    profiles.iter().position(|p| p.name == name)
}

fn string_setting(section: &str, table: &Settings, field: &str) -> Result<String> {
    match table.get(field) {
        None => Ok(String::new()),
        Some(Setting::Value(v)) => Ok(v.clone()),
        Some(Setting::Table(_)) => Err(AwsPsError::malformed(
            section,
            format!("'{}' must be a plain value", field),
        )),
    }
}
