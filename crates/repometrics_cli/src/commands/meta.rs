//! Shell completions and man pages for the `repometrics` binary.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::Cli;

const BIN_NAME: &str = "repometrics";

/// Write the completion script for `shell` into `dir`, returning its path.
fn write_completions(shell: Shell, dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    clap_complete::generate_to(shell, &mut Cli::command(), BIN_NAME, dir)
}

/// Render the top-level page (`repometrics.1`).
fn render_man_page(out: &mut impl Write) -> io::Result<()> {
    clap_mangen::Man::new(Cli::command()).render(out)
}

/// Write `repometrics.1` and one page per subcommand into `dir`.
///
/// Returns the pages found in `dir` afterwards, sorted.
fn write_man_pages(dir: &Path) -> io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    clap_mangen::generate_to(Cli::command(), dir)?;

    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "1") {
            pages.push(path);
        }
    }
    pages.sort();
    Ok(pages)
}

pub(crate) fn handle_completions(
    shell: Shell,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(dir) => {
            let path = write_completions(shell, &dir)?;
            println!("Wrote {} completions to {}", shell, path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, &mut stdout);
            stdout.flush()?;
        }
    }
    Ok(())
}

pub(crate) fn handle_man(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(dir) => {
            let pages = write_man_pages(&dir)?;
            println!("Generated {} man pages in {}:", pages.len(), dir.display());
            for page in pages {
                if let Some(name) = page.file_name() {
                    println!("  {}", name.to_string_lossy());
                }
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            render_man_page(&mut stdout)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
