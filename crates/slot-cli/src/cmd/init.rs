use crate::shell::Shell;

pub fn integration(shell: &str, fzf: bool) -> anyhow::Result<()> {
    let shell: Shell = shell.parse()?;
    print!("{}", shell.integration(fzf));
    Ok(())
}

pub fn completions(shell: &str) -> anyhow::Result<()> {
    let shell: Shell = shell.parse()?;
    print!("{}", shell.completions());
    Ok(())
}
