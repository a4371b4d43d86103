use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vigil",
    version,
    about = "Watch one announcement page and alert only on genuine state transitions"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
    #[arg(
        long,
        global = true,
        env = "VIGIL_CONFIG",
        help = "Optional TOML settings file (flags and env override it)"
    )]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub check: CheckArgs,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the fetch-verify-diff pipeline once (default).
    Check,
    /// Print the normalized variant set for a reference phrase.
    Variants { phrase: String },
    /// Print the persisted state record.
    State,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// HTML page: status, canonical and content pillars.
    Page,
    /// JSON listing endpoint: status pillar plus record title matching.
    Api,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[arg(long, global = true, env = "TARGET_URL", help = "Address to monitor")]
    pub target_url: Option<String>,
    #[arg(
        long = "text",
        global = true,
        env = "TEXT_TO_CHECK",
        help = "Reference phrase expected on the page"
    )]
    pub text_to_check: Option<String>,
    #[arg(long, global = true, env = "PREV_STATUS_PATH")]
    pub state_path: Option<PathBuf>,
    #[arg(long, global = true, env = "FLAG_PATH")]
    pub flag_path: Option<PathBuf>,
    #[arg(long, global = true, value_enum, env = "CHECK_PROFILE")]
    pub profile: Option<Profile>,
    #[arg(long, global = true, env = "CHECK_CANONICAL")]
    pub check_canonical: Option<bool>,
    #[arg(long, global = true, env = "CHECK_CONTENT")]
    pub check_content: Option<bool>,
    #[arg(long, global = true, env = "FOLLOW_REDIRECTS")]
    pub follow_redirects: Option<bool>,
    #[arg(long, global = true, env = "MAX_HOPS")]
    pub max_hops: Option<u32>,
    #[arg(long, global = true, env = "REQUEST_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
    #[arg(long, global = true, env = "RETRY_ATTEMPTS")]
    pub retry_attempts: Option<u32>,
    #[arg(long, global = true, env = "RETRY_DELAY_MS")]
    pub retry_delay_ms: Option<u64>,
    #[arg(
        long = "fallback-url",
        global = true,
        env = "FALLBACK_URLS",
        value_delimiter = ',',
        help = "Extra addresses checked with the same policy"
    )]
    pub fallback_urls: Vec<String>,
    #[arg(
        long,
        global = true,
        env = "TRACK_STATE",
        help = "Diff against the persisted state and exit 10 on a transition"
    )]
    pub track_state: Option<bool>,
    #[arg(long = "sign", global = true, env = "TEXT_SIGN")]
    pub variant_sign: Option<char>,
    #[arg(long = "abbreviation", global = true, env = "TEXT_ABBREVIATION")]
    pub abbreviation: Option<String>,
}
