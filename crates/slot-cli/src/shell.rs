//! Static shell assets printed by `slot init` and `slot completions`.

use slot_core::SlotError;
use std::str::FromStr;

const BASH_INTEGRATION: &str = include_str!("../shell/bash.sh");
const ZSH_INTEGRATION: &str = include_str!("../shell/zsh.sh");
const BASH_FZF: &str = include_str!("../shell/bash-fzf.sh");
const ZSH_FZF: &str = include_str!("../shell/zsh-fzf.sh");
const BASH_COMPLETIONS: &str = include_str!("../shell/completions.bash");
const ZSH_COMPLETIONS: &str = include_str!("../shell/completions.zsh");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
}

impl FromStr for Shell {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            _ => Err(SlotError::UnsupportedShell(s.to_string())),
        }
    }
}

impl Shell {
    /// Integration snippet, with the fzf picker appended when asked.
    pub fn integration(self, fzf: bool) -> String {
        let (base, picker) = match self {
            Shell::Bash => (BASH_INTEGRATION, BASH_FZF),
            Shell::Zsh => (ZSH_INTEGRATION, ZSH_FZF),
        };
        if fzf {
            format!("{base}{picker}")
        } else {
            base.to_string()
        }
    }

    pub fn completions(self) -> &'static str {
        match self {
            Shell::Bash => BASH_COMPLETIONS,
            Shell::Zsh => ZSH_COMPLETIONS,
        }
    }
}
