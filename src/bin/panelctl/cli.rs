use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;
use panelkit::types::Urgency;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(author, version, about = "Send a desktop notification", long_about = None)]
pub struct Cli {
    /// Notification summary (title).
    pub summary: String,

    /// Notification body.
    pub body: Option<String>,

    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Explicit log filter (e.g. "panelkit=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Emit logs as JSON (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Icon name or path.
    #[arg(long, short = 'i')]
    pub icon: Option<String>,

    /// Application name reported to the daemon.
    #[arg(long, short = 'a')]
    pub app_name: Option<String>,

    /// low, normal or critical.
    #[arg(long, short = 'u')]
    pub urgency: Option<Urgency>,

    /// Expiration timeout (e.g. "5s").
    #[arg(long, short = 't', value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Id of a notification to replace.
    #[arg(long)]
    pub id: Option<u32>,

    /// Add an action button; repeat for more. Order is kept.
    #[arg(long = "action", value_name = "LABEL")]
    pub actions: Vec<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub desktop_entry: Option<String>,

    /// Image shown instead of the icon.
    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub sound_file: Option<String>,

    #[arg(long)]
    pub sound_name: Option<String>,

    #[arg(long, action = ArgAction::SetTrue)]
    pub suppress_sound: bool,

    /// Skip the daemon's persistence/history.
    #[arg(long, action = ArgAction::SetTrue)]
    pub transient: bool,

    /// Keep the notification after an action is invoked.
    #[arg(long, action = ArgAction::SetTrue)]
    pub resident: bool,

    /// Interpret action labels as icon names.
    #[arg(long, action = ArgAction::SetTrue)]
    pub action_icons: bool,

    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<i32>,

    /// Wait for an action or the close event and print it.
    #[arg(long, short = 'w', action = ArgAction::SetTrue)]
    pub wait: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
