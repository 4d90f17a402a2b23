use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use aws_ps::{
    commands,
    paths::Paths,
    ui::{ColorMode, Ui},
};

const LONG_ABOUT: &str = "\
AWS CLI profile switcher.

Pick a profile from ~/.aws/config. The prompt is drawn on stderr; stdout gets a
single AWS_PROFILE='<name>' line (empty for the default profile) and the name
is saved to ~/.aws-ps. Wrap it in a shell function to export the choice:

    awsp() { eval \"$(aws-ps \"$@\")\" && export AWS_PROFILE; }";

#[derive(Parser)]
#[command(name = "aws-ps")]
#[command(about = "AWS CLI profile switcher")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
struct Cli {
    /// Read profiles from this file instead of ~/.aws/config
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print diagnostic INFO lines to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

fn run(cli: Cli, ui: &Ui) -> Result<()> {
    let paths = Paths::new()?.with_config(cli.config);
    commands::run(&paths, ui)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ui = Ui::new(cli.color, cli.no_color).with_verbose(cli.verbose);

    match run(cli, &ui) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui.err(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
