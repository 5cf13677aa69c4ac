//! Build script rendering the `cinder-volumes` man pages.
//!
//! One page is written for the top-level command and one per subcommand
//! (`cinder-volumes-list.1`, ...) into the build output directory.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Command, CommandFactory};
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

use cli::Cli;

fn render(command: Command, out_dir: &Path, file_name: &str) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    Man::new(command).render(&mut buffer)?;
    fs::write(out_dir.join(file_name), buffer)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "cargo:rerun-if-changed=build.rs")?;
    writeln!(stdout, "cargo:rerun-if-changed=src/cli/mod.rs")?;

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").ok_or("OUT_DIR was not set")?);

    let root = Cli::command();
    let name = root.get_name().to_owned();
    for sub in root.get_subcommands() {
        let page = format!("{name}-{}.1", sub.get_name());
        render(sub.clone(), &out_dir, &page)?;
    }
    render(root, &out_dir, &format!("{name}.1"))?;

    Ok(())
}
