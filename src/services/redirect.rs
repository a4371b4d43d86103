use crate::domain::errors::CheckError;
use crate::domain::models::{FetchResult, RedirectHop};
use crate::services::transport::Transport;
use url::Url;

/// Follow a 3xx chain by hand so every hop is observable.
///
/// Issues at most `max_hops` requests. A chain that is still redirecting after
/// that many requests is reported as [`CheckError::RedirectLoop`]; it is never
/// truncated into a result.
pub fn resolve(
    transport: &dyn Transport,
    url: &str,
    max_hops: u32,
) -> Result<(FetchResult, Vec<RedirectHop>), CheckError> {
    let mut current = url.to_string();
    let mut history = Vec::new();

    for _ in 0..max_hops {
        let resp = transport.get(&current)?;
        let location = match resp.header("location").map(str::trim) {
            Some(loc) if resp.is_redirect() && !loc.is_empty() => loc.to_string(),
            _ => return Ok((resp, history)),
        };
        let next = join_location(&current, &location)?;
        tracing::debug!(status = resp.status_code, from = %current, to = %next, "redirect hop");
        history.push(RedirectHop {
            from_url: current.clone(),
            status_code: resp.status_code,
            to_url: next.clone(),
        });
        current = next;
    }

    Err(CheckError::RedirectLoop {
        url: url.to_string(),
        hops: max_hops,
    })
}

/// Resolve a `Location` value (absolute, path-absolute or relative) against the current address.
pub fn join_location(current: &str, location: &str) -> Result<String, CheckError> {
    let base = Url::parse(current).map_err(|e| CheckError::MalformedResponse {
        url: current.to_string(),
        reason: format!("unparseable address: {e}"),
    })?;
    base.join(location)
        .map(|u| u.to_string())
        .map_err(|e| CheckError::MalformedResponse {
            url: current.to_string(),
            reason: format!("bad Location header {location:?}: {e}"),
        })
}
