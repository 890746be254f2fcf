use std::process;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jira_comments::cli::Args;
use jira_comments::{app, Error};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match app::run(args) {
        Ok(()) => {}
        Err(Error::Cancelled) => process::exit(130),
        Err(Error::Reported) => process::exit(1),
        Err(err) => {
            eprintln!("{} {}", "x".red(), err);
            process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jira_comments={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
