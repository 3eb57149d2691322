//! `walletvault completions <SHELL>` — print a completion script to stdout.
//!
//! ```text
//! walletvault completions bash > /etc/bash_completion.d/walletvault
//! walletvault completions zsh > "${fpath[1]}/_walletvault"
//! ```

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    render(shell, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write the script for `shell` into `out`.
fn render(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin, out);
    Ok(())
}
