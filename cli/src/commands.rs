pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use rgscan_common::config::{self, Config};
use rgscan_common::scan::CheckKind;

#[derive(Parser)]
#[command(name = "rgscan", version)]
#[command(about = "Scan Azure resource groups for resources, deployments and activity.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Less output: -q hides decoration, -qq also hides per-group progress
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Skip the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Do not listen for 'q' on the terminal
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count resources per group and list empty groups
    #[command(alias = "i")]
    Inventory {
        #[command(flatten)]
        args: ScanArgs,
    },
    /// List template deployments since the window start
    #[command(alias = "d")]
    Deployments {
        #[command(flatten)]
        args: ScanArgs,
    },
    /// Deployments plus write/delete/action operations from the activity log
    #[command(alias = "a")]
    Activity {
        #[command(flatten)]
        args: ScanArgs,
    },
    /// Run an explicit set of checks
    #[command(alias = "s")]
    Scan {
        /// Comma separated: resources, deployments, activity
        #[arg(short, long, value_delimiter = ',', required = true)]
        checks: Vec<CheckKind>,

        #[command(flatten)]
        args: ScanArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// File with one resource group name per line
    #[arg(short, long, default_value = config::DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Look-back window in days
    #[arg(long, default_value_t = config::DEFAULT_DAYS)]
    pub days: u32,

    /// Hours subtracted from the window start to absorb clock skew (0 disables)
    #[arg(long, default_value_t = config::DEFAULT_BUFFER_HOURS)]
    pub buffer_hours: u32,

    /// CSV report path [default: rg-scan-<timestamp>.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip writing the CSV report
    #[arg(long, conflicts_with = "output")]
    pub no_export: bool,

    /// Print every record behind the counts
    #[arg(long)]
    pub details: bool,

    /// Subscription name or id passed to every az call
    #[arg(long)]
    pub subscription: Option<String>,

    /// Resource groups scanned at once
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub parallel: u16,

    /// Stop starting new groups after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Give up on a single az call after this many seconds
    #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_COMMAND_TIMEOUT.as_secs())]
    pub command_timeout: u64,

    /// Scan repeated names only once
    #[arg(long)]
    pub dedupe: bool,

    /// Count template deployment operations in the activity log as well
    #[arg(long)]
    pub keep_deployment_ops: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        let (checks, args): (Vec<CheckKind>, &ScanArgs) = match &self.command {
            Commands::Inventory { args } => (vec![CheckKind::ResourceCount], args),
            Commands::Deployments { args } => (vec![CheckKind::DeploymentsSince], args),
            Commands::Activity { args } => (
                vec![CheckKind::DeploymentsSince, CheckKind::ActivityLogSince],
                args,
            ),
            Commands::Scan { checks, args } => (checks.clone(), args),
        };

        Config {
            input: args.input.clone(),
            checks,
            days: args.days,
            buffer_hours: args.buffer_hours,
            output: args.output.clone(),
            no_export: args.no_export,
            details: args.details,
            subscription: args.subscription.clone(),
            parallelism: usize::from(args.parallel),
            timeout: args.timeout.map(Duration::from_secs),
            command_timeout: Duration::from_secs(args.command_timeout),
            dedupe: args.dedupe,
            keep_deployment_ops: args.keep_deployment_ops,
            no_banner: self.no_banner,
            quiet: self.quiet,
            disable_input: self.no_input,
        }
    }
}
