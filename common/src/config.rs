use std::path::PathBuf;
use std::time::Duration;

use crate::scan::check::CheckKind;

pub const DEFAULT_INPUT: &str = "resource-groups.txt";
pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_BUFFER_HOURS: u32 = 24;
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for a single scan run, assembled from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// File holding one resource group name per line.
    pub input: PathBuf,
    /// Checks to run against every group that exists.
    pub checks: Vec<CheckKind>,
    /// Size of the look-back window for time-bounded checks.
    pub days: u32,
    /// Extra hours subtracted from the window start to absorb clock or
    /// timezone skew between this machine and the provider.
    pub buffer_hours: u32,
    /// Where the CSV report goes. `None` picks a timestamped name.
    pub output: Option<PathBuf>,
    pub no_export: bool,
    /// Print individual detail records under each group.
    pub details: bool,
    pub subscription: Option<String>,
    /// Number of groups scanned at once. 1 keeps the scan sequential.
    pub parallelism: usize,
    /// Overall deadline for the scan. Checked between groups.
    pub timeout: Option<Duration>,
    /// Upper bound for a single provider call.
    pub command_timeout: Duration,
    /// Drop repeated group names from the input list.
    pub dedupe: bool,
    /// Leave template deployment operations in the activity log count.
    pub keep_deployment_ops: bool,
    pub no_banner: bool,
    pub quiet: u8,
    /// Disables the keyboard listener that stops a scan early.
    pub disable_input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            checks: vec![CheckKind::ResourceCount],
            days: DEFAULT_DAYS,
            buffer_hours: DEFAULT_BUFFER_HOURS,
            output: None,
            no_export: false,
            details: false,
            subscription: None,
            parallelism: 1,
            timeout: None,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            dedupe: false,
            keep_deployment_ops: false,
            no_banner: false,
            quiet: 0,
            disable_input: false,
        }
    }
}

impl Config {
    pub fn runs(&self, kind: CheckKind) -> bool {
        self.checks.contains(&kind)
    }

    /// Whether any requested check needs the `since` boundary.
    pub fn is_time_bounded(&self) -> bool {
        self.checks.iter().any(|kind| kind.takes_since())
    }
}
