use std::process::ExitCode;

use crate::util::load_value;

#[derive(clap::Args)]
pub struct Args {
    /// Response body to inspect (use - or nothing for stdin)
    pub file: Option<String>,
}

pub fn run(args: Args) -> anyhow::Result<ExitCode> {
    let value = load_value(args.file.as_deref())?;
    value.walk_leaves(|path, leaf| println!("{path}\t{leaf}"));
    Ok(ExitCode::SUCCESS)
}
