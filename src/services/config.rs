use crate::cli::{CheckArgs, Profile};
use crate::domain::constants::{
    DEFAULT_FLAG_PATH, DEFAULT_MAX_HOPS, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY_MS,
    DEFAULT_STATE_PATH, DEFAULT_TIMEOUT_SECS,
};
use crate::domain::errors::CheckError;
use crate::services::text_match::VariantRules;
use crate::services::transport::RetryPolicy;
use crate::services::verifier::PillarPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub target_url: Option<String>,
    pub text_to_check: Option<String>,
    pub profile: Option<Profile>,
    pub state_path: Option<PathBuf>,
    pub flag_path: Option<PathBuf>,
    #[serde(default)]
    pub fallback_urls: Vec<String>,
    pub track_state: Option<bool>,
    #[serde(default)]
    pub pillars: FilePillars,
    #[serde(default)]
    pub http: FileHttp,
    #[serde(default)]
    pub variants: FileVariants,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FilePillars {
    pub canonical: Option<bool>,
    pub content: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileHttp {
    pub timeout_secs: Option<u64>,
    pub max_hops: Option<u32>,
    pub follow_redirects: Option<bool>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileVariants {
    pub sign: Option<char>,
    pub abbreviation: Option<String>,
}

/// Immutable run configuration, built once in `main` and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub target_url: String,
    pub fallback_urls: Vec<String>,
    pub profile: Profile,
    pub text_to_check: Option<String>,
    pub pillars: PillarPolicy,
    pub follow_redirects: bool,
    pub max_hops: u32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub track_state: bool,
    pub state_path: PathBuf,
    pub flag_path: PathBuf,
    pub variant_rules: VariantRules,
}

impl Settings {
    /// Every address checked this run, primary first.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.target_url.as_str())
            .chain(self.fallback_urls.iter().map(String::as_str))
    }
}

pub fn load_file(path: Option<&Path>) -> Result<FileConfig, CheckError> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CheckError::Config(format!("reading {}: {e}", path.display())))?;
    toml::from_str(&raw).map_err(|e| CheckError::Config(format!("parsing {}: {e}", path.display())))
}

pub fn variant_rules(args: &CheckArgs, file: &FileConfig) -> VariantRules {
    let defaults = VariantRules::default();
    let abbreviation = args
        .abbreviation
        .clone()
        .or_else(|| file.variants.abbreviation.clone())
        .or(defaults.abbreviation);
    VariantRules {
        sign: args.variant_sign.or(file.variants.sign).unwrap_or(defaults.sign),
        abbreviation: abbreviation.filter(|a| !a.trim().is_empty()),
    }
}

pub fn state_path(args: &CheckArgs, file: &FileConfig) -> PathBuf {
    args.state_path
        .clone()
        .or_else(|| file.state_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH))
}

/// Flags/env win over the file, the file wins over built-in defaults.
pub fn resolve(args: &CheckArgs, file: &FileConfig) -> Result<Settings, CheckError> {
    let target_url = non_blank(args.target_url.clone().or_else(|| file.target_url.clone()))
        .ok_or_else(|| CheckError::Config("TARGET_URL is not set".to_string()))?;
    validate_address("TARGET_URL", &target_url)?;

    let fallback_urls: Vec<String> = if args.fallback_urls.is_empty() {
        file.fallback_urls.clone()
    } else {
        args.fallback_urls.clone()
    }
    .into_iter()
    .map(|u| u.trim().to_string())
    .filter(|u| !u.is_empty())
    .collect();
    for url in &fallback_urls {
        validate_address("FALLBACK_URLS", url)?;
    }

    let profile = args.profile.or(file.profile).unwrap_or(Profile::Page);
    let text_to_check = non_blank(
        args.text_to_check
            .clone()
            .or_else(|| file.text_to_check.clone()),
    );

    let pillars = PillarPolicy {
        canonical: args
            .check_canonical
            .or(file.pillars.canonical)
            .unwrap_or(true),
        content: args
            .check_content
            .or(file.pillars.content)
            .unwrap_or(text_to_check.is_some()),
    };
    if text_to_check.is_none() && (pillars.content || profile == Profile::Api) {
        return Err(CheckError::Config(
            "TEXT_TO_CHECK is required for the content pillar and the api profile".to_string(),
        ));
    }

    let max_hops = args
        .max_hops
        .or(file.http.max_hops)
        .unwrap_or(DEFAULT_MAX_HOPS);
    let timeout_secs = args
        .timeout_secs
        .or(file.http.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let retry_attempts = args
        .retry_attempts
        .or(file.http.retry_attempts)
        .unwrap_or(DEFAULT_RETRY_ATTEMPTS);
    if max_hops == 0 {
        return Err(CheckError::Config("MAX_HOPS must be at least 1".to_string()));
    }
    if timeout_secs == 0 {
        return Err(CheckError::Config(
            "REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
        ));
    }
    if retry_attempts == 0 {
        return Err(CheckError::Config(
            "RETRY_ATTEMPTS must be at least 1".to_string(),
        ));
    }

    Ok(Settings {
        target_url,
        fallback_urls,
        profile,
        text_to_check,
        pillars,
        follow_redirects: args
            .follow_redirects
            .or(file.http.follow_redirects)
            .unwrap_or(false),
        max_hops,
        timeout: Duration::from_secs(timeout_secs),
        retry: RetryPolicy {
            max_attempts: retry_attempts,
            delay: Duration::from_millis(
                args.retry_delay_ms
                    .or(file.http.retry_delay_ms)
                    .unwrap_or(DEFAULT_RETRY_DELAY_MS),
            ),
        },
        track_state: args
            .track_state
            .or(file.track_state)
            .unwrap_or(profile == Profile::Api),
        state_path: state_path(args, file),
        flag_path: args
            .flag_path
            .clone()
            .or_else(|| file.flag_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FLAG_PATH)),
        variant_rules: variant_rules(args, file),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_address(name: &str, raw: &str) -> Result<(), CheckError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| CheckError::Config(format!("{name} {raw:?} is not a valid address: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CheckError::Config(format!(
            "{name} {raw:?} must use http or https"
        )));
    }
    Ok(())
}
