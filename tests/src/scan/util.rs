use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rgscan_common::error::{Result, ScanError};
use rgscan_core::azure::{AzureClient, CommandRunner};

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

/// Replays canned `az` output keyed on the leading command words and the
/// resource group. Anything unscripted fails like a missing command would.
#[derive(Default)]
pub struct ScriptedAz {
    replies: HashMap<(String, String), std::result::Result<String, String>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedAz {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, command: &str, group: &str, stdout: &str) -> Self {
        self.replies
            .insert((command.to_string(), group.to_string()), Ok(stdout.to_string()));
        self
    }

    pub fn fail(mut self, command: &str, group: &str, stderr: &str) -> Self {
        self.replies
            .insert((command.to_string(), group.to_string()), Err(stderr.to_string()));
        self
    }

    /// Groups listed here answer `true` to `group exists`, everything else `false`.
    pub fn existing(mut self, groups: &[&str]) -> Self {
        for group in groups {
            self = self.reply("group exists", group, "true");
        }
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn client(self: &Arc<Self>) -> AzureClient {
        AzureClient::new(self.clone())
    }
}

fn command_key(args: &[String]) -> (String, String) {
    let words: Vec<&str> = args
        .iter()
        .take_while(|arg| !arg.starts_with("--"))
        .map(String::as_str)
        .collect();
    let group = args
        .iter()
        .position(|arg| arg == "--name" || arg == "--resource-group")
        .and_then(|idx| args.get(idx + 1))
        .cloned()
        .unwrap_or_default();
    (words.join(" "), group)
}

#[async_trait]
impl CommandRunner for ScriptedAz {
    async fn run(&self, args: &[String]) -> Result<String> {
        self.calls.lock().unwrap().push(args.to_vec());
        let key = command_key(args);
        match self.replies.get(&key) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(stderr)) => Err(ScanError::Command {
                program: "az".to_string(),
                message: stderr.clone(),
            }),
            None if key.0 == "group exists" => Ok("false".to_string()),
            None if key.0 == "account show" => Ok("{}".to_string()),
            None => Err(ScanError::Command {
                program: "az".to_string(),
                message: format!("no canned reply for '{}'", args.join(" ")),
            }),
        }
    }
}
