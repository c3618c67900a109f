mod commands;
mod terminal;

use commands::{CommandLine, Commands, scan};
use rgscan_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands: CommandLine = CommandLine::parse_args();
    let cfg: Config = commands.to_config();

    logging::init_logging(cfg.quiet);
    print::banner(cfg.no_banner, cfg.quiet);

    let title: &str = match &commands.command {
        Commands::Inventory { .. } => "resource inventory",
        Commands::Deployments { .. } => "deployment history",
        Commands::Activity { .. } => "activity log",
        Commands::Scan { .. } => "getting ready to scan",
    };
    print::header(title, cfg.quiet);

    scan::scan(&cfg).await
}
