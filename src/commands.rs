//! The aws-ps flow: load config, pick a profile, persist the choice.
//!
//! Each step runs exactly once and any failure ends the run. The prompt and
//! the stdout sink are parameters so the whole flow can be driven from tests.

use anyhow::{Context, Result};
use std::io::Write;

use crate::config::load_config;
use crate::error::AwsPsError;
use crate::paths::Paths;
use crate::profiles::{DEFAULT_PROFILE, Profile, extract_profiles, position_of};
use crate::selector::{ProfilePrompt, TerminalPrompt};
use crate::state::persist_selection;
use crate::ui::Ui;

/// Profile named by `AWS_PROFILE`, falling back to `default`
pub fn current_profile() -> String {
    current_profile_from(std::env::var("AWS_PROFILE").ok())
}

fn current_profile_from(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

/// Load and extract every profile from the configured file
pub fn load_profiles(paths: &Paths, ui: &Ui) -> Result<Vec<Profile>> {
    ui.info(format!("Reading {}", paths.aws_config.display()));

    let sections = load_config(&paths.aws_config)?;
    let profiles = extract_profiles(&sections)?;
    if profiles.is_empty() {
        return Err(AwsPsError::NoProfiles {
            path: paths.aws_config.clone(),
        }
        .into());
    }

    ui.info(format!("Found {} profiles", profiles.len()));
    Ok(profiles)
}

/// Run the whole flow against the given prompt and stdout sink.
///
/// Returns the chosen profile name.
pub fn switch_profile(
    paths: &Paths,
    ui: &Ui,
    prompt: &mut impl ProfilePrompt,
    current: &str,
    out: &mut impl Write,
) -> Result<String> {
    let profiles = load_profiles(paths, ui)?;

    let start = position_of(&profiles, current).unwrap_or_else(|| {
        ui.info(format!("Profile '{}' not in config, starting at the top", current));
        0
    });

    let index = prompt.select(&profiles, start)?;
    let name = profiles
        .get(index)
        .map(|p| p.name.clone())
        .context("Selector returned an index outside the profile list")?;

    persist_selection(&name, out, &paths.state_file)?;
    ui.info(format!("Saved '{}' to {}", name, paths.state_file.display()));

    Ok(name)
}

/// Interactive entry point: terminal prompt on stderr, assignment on stdout
pub fn run(paths: &Paths, ui: &Ui) -> Result<()> {
    let mut prompt = TerminalPrompt::new(ui);
    let mut stdout = anstream::stdout();
    switch_profile(paths, ui, &mut prompt, &current_profile(), &mut stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;
    use crate::test_utils::{ScriptedKeys, setup_test_paths, write_config};
    use crate::ui::ColorMode;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = "\
[default]
region = us-east-1
output = json

[profile staging]
region = eu-west-1
output = text
";

    fn test_ui() -> Ui {
        Ui::new(ColorMode::Never, false)
    }

    /// Prompt that must never be reached
    struct Unreachable;

    impl ProfilePrompt for Unreachable {
        fn select(&mut self, _: &[Profile], _: usize) -> crate::error::Result<usize> {
            panic!("prompt should not be shown");
        }
    }

    fn aws_error(err: &anyhow::Error) -> &AwsPsError {
        err.downcast_ref::<AwsPsError>().expect("typed error")
    }

    #[test]
    fn test_current_profile_from() {
        assert_eq!(current_profile_from(None), "default");
        assert_eq!(current_profile_from(Some(String::new())), "default");
        assert_eq!(current_profile_from(Some("work".to_string())), "work");
    }

    #[test]
    #[serial]
    fn test_current_profile_reads_env() {
        // SAFETY: serialized with the other env-touching tests
        unsafe { std::env::set_var("AWS_PROFILE", "staging") };
        assert_eq!(current_profile(), "staging");
        unsafe { std::env::remove_var("AWS_PROFILE") };
        assert_eq!(current_profile(), "default");
    }

    #[test]
    fn test_select_second_entry_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        write_config(&paths, CONFIG);
        let ui = test_ui();

        let keys = ScriptedKeys::new(&[KeyCode::Down, KeyCode::Enter]);
        let mut selector = Selector::new(&ui, keys, Vec::new());
        let mut out = Vec::new();

        let name = switch_profile(&paths, &ui, &mut selector, "default", &mut out).unwrap();
        assert_eq!(name, "staging");
        assert_eq!(String::from_utf8(out).unwrap(), "AWS_PROFILE='staging'\n");
        assert_eq!(fs::read_to_string(&paths.state_file).unwrap(), "staging");
    }

    #[test]
    fn test_select_default_prints_empty_assignment() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        write_config(&paths, CONFIG);
        let ui = test_ui();

        // Starts on staging, one step up is default
        let keys = ScriptedKeys::new(&[KeyCode::Up, KeyCode::Enter]);
        let mut selector = Selector::new(&ui, keys, Vec::new());
        let mut out = Vec::new();

        let name = switch_profile(&paths, &ui, &mut selector, "staging", &mut out).unwrap();
        assert_eq!(name, "default");
        assert_eq!(String::from_utf8(out).unwrap(), "AWS_PROFILE=''\n");
        assert_eq!(fs::read_to_string(&paths.state_file).unwrap(), "default");
    }

    #[test]
    fn test_missing_config_never_prompts() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let mut out = Vec::new();

        let err = switch_profile(&paths, &test_ui(), &mut Unreachable, "default", &mut out)
            .unwrap_err();
        assert!(matches!(aws_error(&err), AwsPsError::ConfigUnavailable { .. }));
        assert!(out.is_empty());
        assert!(!paths.state_file.exists());
    }

    #[test]
    fn test_malformed_config_never_prompts() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        write_config(&paths, "stray = 1\n[default]\nregion = us-east-1\n");
        let mut out = Vec::new();

        let err = switch_profile(&paths, &test_ui(), &mut Unreachable, "default", &mut out)
            .unwrap_err();
        assert!(matches!(aws_error(&err), AwsPsError::ConfigMalformed { .. }));
        assert!(!paths.state_file.exists());
    }

    #[test]
    fn test_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        write_config(&paths, "# nothing here\n");

        let err = load_profiles(&paths, &test_ui()).unwrap_err();
        assert!(matches!(aws_error(&err), AwsPsError::NoProfiles { .. }));
    }

    #[test]
    fn test_cancel_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        write_config(&paths, CONFIG);
        let ui = test_ui();

        let keys =
            ScriptedKeys::new(&[]).then(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let mut selector = Selector::new(&ui, keys, Vec::new());
        let mut out = Vec::new();

        let err = switch_profile(&paths, &ui, &mut selector, "default", &mut out).unwrap_err();
        assert!(matches!(aws_error(&err), AwsPsError::SelectionCancelled));
        assert!(out.is_empty());
        assert!(!paths.state_file.exists());
    }

    #[test]
    fn test_load_profiles_counts_sections() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        write_config(&paths, "[default]\n[profile a]\n[profile b c]\n[sso-session corp]\n");

        let profiles = load_profiles(&paths, &test_ui()).unwrap();
        assert_eq!(profiles.len(), 4);
        for name in ["default", "a", "b c", "corp"] {
            assert!(position_of(&profiles, name).is_some(), "missing {name}");
        }
    }
}
