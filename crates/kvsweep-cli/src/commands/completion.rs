// Dweve KVSweep - Key-Value Server Benchmark Comparison
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shell completion generation

use crate::error::CliError;
use clap::Command;
use clap_complete::{generate, Generator};
use std::io;

/// Generate shell completion script to stdout for a given command.
///
/// # Examples
///
/// ```no_run
/// use clap::Command;
/// use clap_complete::shells::Bash;
/// use kvsweep_cli::commands::generate_completion_for_command;
///
/// # fn main() -> Result<(), kvsweep_cli::CliError> {
/// let mut cmd = Command::new("kvsweep");
/// generate_completion_for_command(Bash, &mut cmd)?;
/// # Ok(())
/// # }
/// ```
pub fn generate_completion_for_command<G: Generator>(
    generator: G,
    cmd: &mut Command,
) -> Result<(), CliError> {
    generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
    Ok(())
}

/// Installation hint for a shell's completion script.
///
/// ```
/// use kvsweep_cli::commands::print_installation_instructions;
///
/// assert!(print_installation_instructions("bash").contains("~/.bashrc"));
/// assert_eq!(print_installation_instructions("unknown"), "Unsupported shell");
/// ```
pub fn print_installation_instructions(shell: &str) -> String {
    let shell = shell.to_lowercase();
    let (target, hint) = match shell.as_str() {
        "bash" => ("~/.bashrc", r#"echo 'eval "$(kvsweep completion bash)"' >> ~/.bashrc"#),
        "zsh" => ("$fpath", "kvsweep completion zsh > ~/.zsh/completions/_kvsweep"),
        "fish" => (
            "~/.config/fish/completions",
            "kvsweep completion fish > ~/.config/fish/completions/kvsweep.fish",
        ),
        "powershell" | "pwsh" => (
            "your PowerShell profile",
            "kvsweep completion powershell | Out-String | Invoke-Expression",
        ),
        "elvish" => ("~/.config/elvish/rc.elv", "eval (kvsweep completion elvish)"),
        _ => return "Unsupported shell".to_string(),
    };

    format!("# {} completions, installed via {}:\n{}\n", shell, target, hint)
}
