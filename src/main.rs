use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use deck_shell::config::{Cli, ShellConfig};
use deck_shell::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use deck_shell::{ShellError, ShellResult, log_buffer, run_shell, tracing_sub};

fn run(config: &ShellConfig) -> Result<Vec<ShellResult>, ShellError> {
    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let (cols, rows) = output.size()?;
    let mut ctx = config.context(
        cols,
        rows,
        Box::new(ConsoleInputDriver::default()),
        Box::new(output),
    );
    // the output driver restores the terminal when ctx drops
    run_shell(&mut ctx, config.seed())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = tracing_sub::init(&cli.log_level, cli.log_file.as_deref()) {
        eprintln!("cannot open log file: {err}");
        return ExitCode::FAILURE;
    }
    let config = ShellConfig::from(&cli);
    let outcome = run(&config);
    if let Err(err) = &outcome {
        error!(%err, "shell failed");
    }
    if let Some(ring) = log_buffer::global() {
        let _ = ring.flush_to(&mut io::stderr());
    }
    match outcome {
        Ok(results) => {
            for result in results {
                println!("{result}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("deck-shell: {err}");
            ExitCode::FAILURE
        }
    }
}
