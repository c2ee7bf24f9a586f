//! # Classifier Skill
//!
//! Maps a free-text problem description to a [`ProblemCategory`].
//!
//! ## Scoring
//!
//! The description is lowercased and split into alphanumeric tokens. Every
//! catalog signature is a list of weighted tokens, and a category scores the
//! sum of the weights of its distinct tokens found in the description.
//!
//! - Highest score wins; ties go to the earlier category in the catalog's
//!   priority order.
//! - A winning score under [`MIN_SCORE`] means `Unknown` (confidence 0.0,
//!   fallback status). That is a valid outcome, not an error.
//! - Otherwise confidence is `min(1, score / FULL_CONFIDENCE_SCORE)`.

use crate::catalog::{Catalog, CategorySignature};
use crate::error::SkillError;
use crate::models::{AgentResult, ProblemCategory};
use crate::skills::Agent;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

pub const NAME: &str = "classifier";

/// Scores below this classify as `Unknown`
pub const MIN_SCORE: f64 = 1.0;
/// Score at which confidence saturates
pub const FULL_CONFIDENCE_SCORE: f64 = 3.0;

fn token_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-z0-9]+").ok()).as_ref()
}

/// Distinct lowercase alphanumeric tokens of a description
pub fn tokenize(description: &str) -> BTreeSet<String> {
    let lowered = description.to_lowercase();
    match token_pattern() {
        Some(re) => re
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect(),
        None => lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Score of one signature against a token set
fn score(signature: &CategorySignature, tokens: &BTreeSet<String>) -> f64 {
    let mut counted: BTreeSet<&str> = BTreeSet::new();
    signature
        .tokens
        .iter()
        .filter(|t| tokens.contains(&t.token) && counted.insert(t.token.as_str()))
        .map(|t| t.weight)
        .sum()
}

/// Problem classifier backed by the catalog's signature table
pub struct ClassifierSkill {
    catalog: Arc<dyn Catalog>,
}

impl Agent for ClassifierSkill {
    fn name(&self) -> &str {
        NAME
    }

    fn expertise(&self) -> &[&'static str] {
        &["problem classification"]
    }
}

impl ClassifierSkill {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Classify a description.
    ///
    /// Fails only on empty input or an unavailable catalog.
    pub fn classify(&self, description: &str) -> Result<AgentResult<ProblemCategory>, SkillError> {
        if description.trim().is_empty() {
            return Err(SkillError::InvalidInput(
                "problem description is empty".to_string(),
            ));
        }

        let signatures = self
            .catalog
            .category_signatures()
            .map_err(SkillError::from_catalog)?;
        let priority = self
            .catalog
            .category_priority_order()
            .map_err(SkillError::from_catalog)?;

        let tokens = tokenize(description);
        let rank = |category: ProblemCategory| {
            priority
                .iter()
                .position(|c| *c == category)
                .unwrap_or(usize::MAX)
        };

        let mut best: Option<(ProblemCategory, f64)> = None;
        for signature in &signatures {
            let s = score(signature, &tokens);
            tracing::debug!(category = %signature.category, score = s, "category score");
            best = match best {
                Some((category, top))
                    if top > s || (top == s && rank(category) <= rank(signature.category)) =>
                {
                    Some((category, top))
                }
                _ => Some((signature.category, s)),
            };
        }

        match best {
            Some((category, top)) if top >= MIN_SCORE && category.is_known() => {
                let confidence = (top / FULL_CONFIDENCE_SCORE).min(1.0);
                Ok(AgentResult::success(category, confidence))
            }
            _ => Ok(AgentResult::fallback(ProblemCategory::Unknown, 0.0)),
        }
    }
}
