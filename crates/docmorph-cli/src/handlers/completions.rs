//! `docmorph completions <SHELL>`

use crate::cli::{Cli, CompletionsArgs, Shell};
use crate::error::Result;
use clap::CommandFactory;
use std::io::{self, Write};
use tracing::debug;

/// Print the completion script for the requested shell
pub fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let script = completion_script(args.shell);
    debug!(shell = ?args.shell, bytes = script.len(), "Generated completion script");

    let mut stdout = io::stdout().lock();
    stdout.write_all(&script)?;
    stdout.flush()?;
    Ok(())
}

fn completion_script(shell: Shell) -> Vec<u8> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    let mut script = Vec::new();
    clap_complete::generate(shell.to_clap_shell(), &mut command, bin_name, &mut script);
    script
}
