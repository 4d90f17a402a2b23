pub mod bell;
pub mod commands;
pub mod config;
pub mod error;
pub mod paths;
pub mod profiles;
pub mod selector;
pub mod state;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
