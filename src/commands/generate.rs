//! `generate` subcommand.
use anyhow::{Context, Result};
use clap_complete::Shell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the completion script of `cmd` for `shell` to `out`.
pub fn generate_completions<W: Write>(
    shell: Shell,
    cmd: &mut clap::Command,
    out: &mut W,
) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, out);
}

/// Writes a man page for `cmd` and one for each nested subcommand into
/// `output_dir` (the current directory if `None`). Subcommand pages are named
/// after their full invocation, e.g. `jp-generate-man.1`.
///
/// Returns the paths of the written pages.
///
/// # Errors
///
/// Returns an [`anyhow::Error`] if the output directory or a page could not
/// be created.
pub fn generate_man_pages(
    cmd: &clap::Command,
    output_dir: Option<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Opening current directory")?,
    };
    std::fs::create_dir_all(&output_dir)
        .context("create output Man directories")?;

    let mut written = Vec::new();
    let mut pending = vec![(cmd.get_name().to_string(), cmd.clone())];

    while let Some((name, command)) = pending.pop() {
        for sub in command.get_subcommands() {
            pending.push((format!("{name}-{}", sub.get_name()), sub.clone()));
        }
        // The page title is taken from the command name, so rename nested
        // commands to their full invocation. Leaked once per page.
        let title: &'static str = Box::leak(name.clone().into_boxed_str());
        let command = command.name(title).disable_help_subcommand(true);
        written.push(render_page(command, &output_dir, &name)?);
    }

    Ok(written)
}

/// Renders one man page to `<dir>/<name>.1`.
fn render_page(
    command: clap::Command,
    dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.1"));
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    clap_mangen::Man::new(command)
        .render(&mut file)
        .with_context(|| format!("failed to render {}", path.display()))?;
    log::info!("Generated: {}", path.display());
    Ok(path)
}
