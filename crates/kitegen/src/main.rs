//! kitegen CLI Application
//!
//! Compiles pipeline definition files into Buildkite pipeline YAML.

// CLI binary needs to output to stderr before tracing is available
#![allow(clippy::print_stderr)]

use kitegen::cli::{self, EXIT_OTHER};
use kitegen::tracing::{TracingConfig, init_tracing};

fn main() {
    let cli = cli::parse();

    let config = TracingConfig {
        format: cli.log_format,
        level: cli.log_level.into(),
    };
    if let Err(e) = init_tracing(&config) {
        eprintln!("Fatal error: {e}");
        std::process::exit(EXIT_OTHER);
    }

    let stdout = std::io::stdout();
    let exit_code = kitegen::run(&cli, &mut stdout.lock());
    std::process::exit(exit_code);
}
