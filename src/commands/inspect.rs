use crate::cli::Cli;
use crate::domain::constants::EXIT_OK;
use crate::services::config::{self, FileConfig};
use crate::services::output::print_one;
use crate::services::storage::{PreviousState, StateStore};
use crate::services::text_match;

pub fn handle_variants(cli: &Cli, file: &FileConfig, phrase: &str) -> anyhow::Result<u8> {
    let rules = config::variant_rules(&cli.check, file);
    let set = text_match::variants(phrase, &rules);
    print_one(cli.json, true, &set, |s| {
        s.iter().collect::<Vec<_>>().join("\n")
    })?;
    Ok(EXIT_OK)
}

pub fn handle_state(cli: &Cli, file: &FileConfig) -> anyhow::Result<u8> {
    let store = StateStore::new(config::state_path(&cli.check, file));
    let state = match store.load() {
        PreviousState::Known(state) => Some(state),
        PreviousState::NoHistory => None,
    };
    print_one(cli.json, true, &state, |s| match s {
        Some(s) => {
            let title = s.evidence.as_ref().map(|e| e.title.as_str()).unwrap_or("-");
            format!("found: {}\tchecked_at: {}\ttitle: {}", s.found, s.checked_at, title)
        }
        None => format!("no history at {}", store.path().display()),
    })?;
    Ok(EXIT_OK)
}
