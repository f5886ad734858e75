/*!
 * Command-line interface for llmprint
 */

use std::io::{self, BufWriter};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use llmprint::app;
use llmprint::clipboard::SystemClipboard;
use llmprint::config::{Args, Config};
use llmprint::logger::initialize_logger;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();
    initialize_logger();

    // Shell completions short-circuit everything else
    if let Some(shell) = args.generate {
        let mut command = Args::command();
        clap_complete::generate(shell, &mut command, "llmprint", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let result = Config::from_args(args).and_then(|config| {
        config.validate()?;
        let stdout = io::stdout();
        app::run(&config, &SystemClipboard, BufWriter::new(stdout.lock()))
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
