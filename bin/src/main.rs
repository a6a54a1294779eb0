use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use log::debug;

use lox_ast::{run_source, Options, RunError};

/// Prints the syntax tree of a lox expression.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// Script to parse. Starts an interactive prompt if omitted.
    script: Option<PathBuf>,

    /// Print the scanned tokens before the tree
    #[arg(long)]
    tokens: bool,

    /// Also print the tree in reverse polish notation
    #[arg(long)]
    rpn: bool,
}

impl From<&Args> for Options {
    fn from(args: &Args) -> Self {
        Options { tokens: args.tokens, rpn: args.rpn }
    }
}

fn run_file(path: PathBuf, options: Options) -> anyhow::Result<ExitCode> {
    debug!("Running {} with {options:?}", path.display());
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Could not read {}: {e}", path.display());
            return Ok(ExitCode::from(RunError::from(e).exit_code()));
        }
    };

    match run_source(&source, options, &mut stdout()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{e}");
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}

fn run_prompt(options: Options) -> anyhow::Result<ExitCode> {
    debug!("Starting prompt with {options:?}");
    loop {
        print!("> ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line).context("failed to read from stdin")? == 0 {
            return Ok(ExitCode::SUCCESS);
        }
        if line.trim().is_empty() {
            continue;
        }
        match run_source(&line, options, &mut stdout()) {
            Ok(()) => (),
            Err(e) => println!("{e}"),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();
    let options = Options::from(&args);

    match args.script {
        Some(script) => run_file(script, options),
        None => run_prompt(options),
    }
}
