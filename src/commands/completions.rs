//! Shell completion script generation.

use std::io;

use clap::CommandFactory;
use clap_complete::{Shell as CompletionShell, generate};

use crate::cli::{Cli, Shell};

impl From<Shell> for CompletionShell {
  fn from(shell: Shell) -> Self {
    match shell {
      Shell::Bash => CompletionShell::Bash,
      Shell::Zsh => CompletionShell::Zsh,
      Shell::Fish => CompletionShell::Fish,
      Shell::Powershell => CompletionShell::PowerShell,
      Shell::Elvish => CompletionShell::Elvish,
    }
  }
}

/// Write a completion script for `shell` to stdout.
pub(crate) fn handle_completions_command(shell: Shell) {
  let mut cmd = Cli::command();
  let bin_name = cmd.get_name().to_string();
  generate(CompletionShell::from(shell), &mut cmd, bin_name, &mut io::stdout());
}
