pub const DEFAULT_STATE_PATH: &str = "prev_status.json";
pub const DEFAULT_FLAG_PATH: &str = "status_changed.flag";

pub const DEFAULT_MAX_HOPS: u32 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 5000;

pub const DEFAULT_VARIANT_SIGN: char = '+';
pub const DEFAULT_ABBREVIATION: &str = "dot.";

/// A browser-like UA lowers the odds of being served a bot wall.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "pl-PL,pl;q=0.9,en-US;q=0.8,en;q=0.7";

pub const EXIT_OK: u8 = 0;
pub const EXIT_ALERT: u8 = 1;
pub const EXIT_INDETERMINATE: u8 = 2;
pub const EXIT_CHANGED: u8 = 10;
