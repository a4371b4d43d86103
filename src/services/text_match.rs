//! Reference-phrase normalization and tolerant containment matching.
//!
//! CMS editors drift between `AB+` and `AB +`, drop the sign, or spell out
//! the abbreviated qualifier. The variant set absorbs exactly those drifts and
//! nothing else; there is no fuzzy matching.

use crate::domain::constants::{DEFAULT_ABBREVIATION, DEFAULT_VARIANT_SIGN};
use crate::domain::models::TextVariantSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRules {
    /// Punctuation mark whose spacing drifts (`AB+` / `AB +`).
    pub sign: char,
    /// Inline qualifier token that may be dropped entirely (`dot.`).
    pub abbreviation: Option<String>,
}

impl Default for VariantRules {
    fn default() -> Self {
        Self {
            sign: DEFAULT_VARIANT_SIGN,
            abbreviation: Some(DEFAULT_ABBREVIATION.to_string()),
        }
    }
}

/// Full Unicode case fold (`ß` folds to `ss`), map every whitespace-class char
/// (incl. NBSP / NNBSP) to a single ASCII space, collapse runs and trim. Idempotent.
pub fn normalize(text: &str) -> String {
    caseless::default_case_fold_str(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn variants(phrase: &str, rules: &VariantRules) -> TextVariantSet {
    let base = normalize(phrase);
    let mut out = spacing_variants(&base, rules.sign);

    if let Some(abbr) = rules.abbreviation.as_deref().map(normalize) {
        if !abbr.is_empty() {
            let shortened = base
                .split(' ')
                .filter(|token| *token != abbr)
                .collect::<Vec<_>>()
                .join(" ");
            if shortened != base {
                out.extend(spacing_variants(&shortened, rules.sign));
            }
        }
    }

    out.into_iter().collect()
}

pub fn matches(page_text: &str, variants: &TextVariantSet) -> bool {
    let haystack = normalize(page_text);
    variants.iter().any(|v| haystack.contains(v))
}

/// The phrase itself, the sign glued tight, the sign spaced out, and the sign removed.
fn spacing_variants(normalized: &str, sign: char) -> Vec<String> {
    let tight = tighten(normalized, sign);
    let spaced = normalize(&tight.replace(sign, &format!(" {sign}")));
    let removed = normalize(&normalized.replace(sign, " "));
    vec![normalized.to_string(), tight, spaced, removed]
}

fn tighten(normalized: &str, sign: char) -> String {
    let mut out = String::with_capacity(normalized.len());
    for ch in normalized.chars() {
        if ch == sign && out.ends_with(' ') {
            out.pop();
        }
        out.push(ch);
    }
    out
}
