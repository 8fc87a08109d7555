use std::process::ExitCode;

use clap::Parser;

use service_bootstrap::lifecycle::shutdown::block_until_ctrl_c;
use service_bootstrap::modules::default_builder;
use service_bootstrap::observability::{init_logging, logging::error_chain};
use service_bootstrap::{Bootstrap, StartupArgs};

fn main() -> ExitCode {
    let args = StartupArgs::parse();

    if let Err(e) = init_logging(&args.logging()) {
        eprintln!("{}", error_chain(&e));
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?args.mode,
        profile = %args.profile,
        service = %args.service,
        "service-bootstrap starting"
    );

    let bootstrap = Bootstrap::new(default_builder(Vec::new()));
    if let Err(failure) = bootstrap.start_service(&args) {
        eprintln!("{}", error_chain(&failure));
        return ExitCode::FAILURE;
    }

    if !args.serving() && args.wait {
        if let Err(e) = block_until_ctrl_c() {
            tracing::error!(error = %e, "Failed to wait for shutdown signal");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
