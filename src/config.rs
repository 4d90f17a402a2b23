//! Reading `~/.aws/config`.
//!
//! The loader knows nothing about profiles. It turns the INI file into an
//! ordered list of `(section key, settings)` entries where settings are an
//! untyped tree: dotted keys such as `region.alt = x` become nested tables and
//! setting keys are case-insensitive. Interpreting those entries is the job of
//! [`crate::profiles`].

use ini::{Ini, ParseError, ParseOption};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{AwsPsError, Result};

pub type Settings = BTreeMap<String, Setting>;

/// An untyped settings value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Value(String),
    Table(Settings),
}

impl Setting {
    pub fn as_table(&self) -> Option<&Settings> {
        match self {
            Self::Table(table) => Some(table),
            Self::Value(_) => None,
        }
    }
}

/// Parsed config entries in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSections {
    entries: Vec<(String, Setting)>,
}

impl ConfigSections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, setting: Setting) {
        self.entries.push((key.into(), setting));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Setting)> {
        self.entries.iter().map(|(key, setting)| (key.as_str(), setting))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read and parse the config file at `path`
pub fn load_config(path: &Path) -> Result<ConfigSections> {
    let text = fs::read_to_string(path).map_err(|e| AwsPsError::ConfigUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    parse_config(&text).map_err(|e| AwsPsError::ConfigUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Parse INI text into config entries.
///
/// Values are taken verbatim: quote and backslash-escape processing is off.
/// Keys outside any section become top-level `Setting::Value` entries. A
/// section header seen twice yields one entry holding the settings of both.
pub fn parse_config(text: &str) -> std::result::Result<ConfigSections, ParseError> {
    let opt = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(text, opt)?;

    let mut sections = ConfigSections::new();
    let mut tables: Vec<(&str, Settings)> = Vec::new();
    for (name, props) in ini.iter() {
        match name {
            Some(name) => {
                // A repeated header extends the first one.
                let index = match tables.iter().position(|(seen, _)| *seen == name) {
                    Some(index) => index,
                    None => {
                        tables.push((name, Settings::new()));
                        tables.len() - 1
                    }
                };
                for (key, value) in props.iter() {
                    insert_setting(&mut tables[index].1, key, value);
                }
            }
            None => {
                for (key, value) in props.iter() {
                    sections.push(key.to_lowercase(), Setting::Value(value.to_string()));
                }
            }
        }
    }

    for (name, table) in tables {
        sections.push(name, Setting::Table(table));
    }
    Ok(sections)
}

fn insert_setting(table: &mut Settings, key: &str, value: &str) {
    let key = key.to_lowercase();
    let path: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    insert_path(table, &path, value);
}

// Last writer wins at each level, a value under a scalar replaces the scalar.
fn insert_path(table: &mut Settings, path: &[&str], value: &str) {
    match path {
        [] => {}
        [last] => {
            table.insert(last.to_string(), Setting::Value(value.to_string()));
        }
        [head, rest @ ..] => {
            let entry = table
                .entry(head.to_string())
                .or_insert_with(|| Setting::Table(Settings::new()));
            if matches!(entry, Setting::Value(_)) {
                *entry = Setting::Table(Settings::new());
            }
            if let Setting::Table(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}
