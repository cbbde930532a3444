mod cli;
mod commands;

use tracing_subscriber::EnvFilter;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    init_logging();
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::User(args) => commands::user(args).await,
        cli::Command::Reservations(args) => commands::reservations(args).await,
        cli::Command::Search(args) => commands::search(args).await,
    }
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides the `info` default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
