use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use throwback::{cli, config, error, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Sync once and exit instead of waiting for the daily run at RUN_AT
    #[clap(long)]
    run: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let tz = config::timezone();

    if cli.run {
        tokio::select! {
            result = cli::run(tz) => {
                if let Err(e) = result {
                    error!("Run failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => error!("Interrupted"),
        }
    } else {
        let at = config::run_at();
        tokio::select! {
            result = cli::schedule(tz, at) => {
                if let Err(e) = result {
                    error!("Scheduler failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => warning!("Scheduler stopped"),
        }
    }
}
