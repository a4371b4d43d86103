use crate::domain::models::{JsonOut, PillarOutcome, RunReport};
use serde::Serialize;

pub fn print_one<T: Serialize>(
    json: bool,
    ok: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

pub fn print_report(json: bool, report: &RunReport) -> anyhow::Result<()> {
    print_one(json, report.exit_code == 0, report, |r| render_report(r))
}

pub fn render_report(r: &RunReport) -> String {
    let mut lines = vec![format!(
        "verdict: {:?}\toutcome: {:?}\texit: {}",
        r.verdict, r.outcome, r.exit_code
    )
    .to_lowercase()];
    lines.push(format!("target: {}", r.target));
    if let Some(reason) = &r.reason {
        lines.push(format!("reason: {reason}"));
    }
    for p in &r.evidence.pillars {
        if p.outcome != PillarOutcome::NotApplicable {
            lines.push(
                format!("pillar {:?}: {:?} ({})", p.pillar, p.outcome, p.detail).to_lowercase(),
            );
        }
    }
    for hop in &r.evidence.redirects {
        lines.push(format!("redirect {}: {} -> {}", hop.status_code, hop.from_url, hop.to_url));
    }
    if let Some(record) = &r.evidence.record {
        lines.push(format!("record: {}\t{}\t{}", record.title, record.link, record.date));
    }
    lines.join("\n")
}
