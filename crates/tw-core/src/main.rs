//! taskwrap - run a command and turn its output into a structured event log.

use clap::Parser;
use tw_core::cli::Cli;
use tw_core::logging::{init_diagnostics, EventLogger};
use tw_core::supervisor::Supervisor;

fn main() {
    let cli = Cli::parse();
    init_diagnostics();

    let config = cli.log_config();
    let logger = EventLogger::stdout(&config);
    let mut supervisor = Supervisor::new(logger);

    let code = supervisor.run(&cli.task());
    std::process::exit(code);
}
