//! Line-driven front end for the annotation engine.
//!
//! Reads commands from a script file or stdin, one per line, and prints the
//! resulting status message for each. `show` prints the current render
//! snapshot as JSON. Failing commands are reported and the session carries
//! on.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use feaprep::input::parse_command;
use feaprep::options::Options;
use feaprep::{PrepError, Preprocessor};

#[derive(Parser)]
#[command(version, about = "Annotate a mesh with fixed nodes and point loads")]
struct Cli {
    /// Options TOML file (picking tolerance, force epsilon).
    #[arg(long)]
    options: Option<PathBuf>,
    /// JSON mesh to open before reading commands.
    #[arg(long)]
    mesh: Option<PathBuf>,
    /// Command script; reads stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<(), PrepError> {
    let options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let mut engine = Preprocessor::new(&options);

    if let Some(path) = &cli.mesh {
        println!("{}", engine.open_mesh(path)?);
    }

    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut out = io::stdout().lock();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        match line.trim() {
            "quit" | "exit" => break,
            "show" => {
                let json = serde_json::to_string_pretty(&engine.render_snapshot())
                    .map_err(|e| PrepError::CommandParse(e.to_string()))?;
                writeln!(out, "{json}")?;
                engine.mark_rendered();
                continue;
            }
            _ => {}
        }

        let result = parse_command(&line).and_then(|command| {
            command.map(|c| engine.execute(c)).transpose()
        });
        match result {
            Ok(Some(status)) => writeln!(out, "{status}")?,
            Ok(None) => {}
            Err(e) => {
                log::warn!("line {}: {e}", n + 1);
                writeln!(out, "error: {e}")?;
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("feaprep: {e}");
            ExitCode::FAILURE
        }
    }
}
