//! ctgate configuration entrypoint.
//!
//! Resolves the layered gateway configuration (file, `CT_*` environment,
//! defaults) and reports the outcome: exit 0 when it resolves, 1 when any
//! stage fails. `--print` renders the resolved document as YAML with the
//! egress password masked. Serving subsystems consume the same resolver
//! through the library crate; this binary is the standalone checker.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ctgate_config::load;
use ctgate_config::observability::logging;

#[derive(Parser)]
#[command(
    name = "ctgate-config",
    about = "Resolve and check the ctgate gateway configuration"
)]
struct Cli {
    /// Config file; omit to resolve from environment and defaults alone.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the resolved configuration as YAML, egress password masked.
    #[arg(long)]
    print: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ctgate-config: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logging::init(&config.logging) {
        eprintln!("ctgate-config: {err}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        listen = %config.network.listen,
        target = %config.target.endpoint,
        tenant_label = %config.tenant.label,
        "configuration resolved"
    );

    if cli.print {
        match serde_yaml::to_string(&config.redacted()) {
            Ok(document) => print!("{document}"),
            Err(err) => {
                eprintln!("ctgate-config: unable to render configuration: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
