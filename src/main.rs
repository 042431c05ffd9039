use clap::Parser;
use printer_certs::cli::commands::{
    cmd_activate, cmd_current, cmd_delete, cmd_list, cmd_upload, open_printer,
};
use printer_certs::cli::config::{Cli, Commands, load_config, resolve_settings};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref());

    // Resolve printer settings: CLI > config > defaults
    let settings = resolve_settings(&cli, &config);
    let printer = open_printer(&settings)?;

    match cli.command {
        Commands::List => cmd_list(&printer)?,
        Commands::Current => cmd_current(&printer)?,
        Commands::Upload {
            key,
            cert,
            activate,
        } => cmd_upload(&printer, &key, &cert, activate)?,
        Commands::Activate { id } => cmd_activate(&printer, &id)?,
        Commands::Delete { id } => cmd_delete(&printer, &id)?,
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise -v / -vv / -vvv raise the level from warn.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}
