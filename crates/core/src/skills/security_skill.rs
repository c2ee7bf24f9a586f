//! # Security Skill
//!
//! Specialist that checks every compliance constraint of the requirement set
//! against the security features of the selected services. The catalog maps
//! each compliance tag to the features that satisfy it; a tag is covered when
//! at least one service offers at least one of them.
//!
//! A compliance tag is any tag with a control entry, any `*_compliance` tag,
//! and any tag on a compliance business requirement. Tags the catalog has no
//! controls for are reported as unverifiable and degrade the review.

use crate::catalog::Catalog;
use crate::models::{
    AgentResult, ArchitectureRecommendation, RequirementKind, RequirementSet, SpecialistAnnotation,
};
use crate::skills::{Agent, Specialist};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

pub const NAME: &str = "security";

const OK_CONFIDENCE: f64 = 0.85;
const DEGRADED_CONFIDENCE: f64 = 0.4;

const COMPLIANCE_SUFFIX: &str = "_compliance";

/// Constraint tags that name a compliance obligation, in tag order
fn compliance_tags(context: &RequirementSet, controls: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    let declared: BTreeSet<&str> = context
        .business_requirements
        .iter()
        .filter(|r| r.category == RequirementKind::Compliance)
        .flat_map(|r| r.constraints.iter().map(String::as_str))
        .collect();
    context
        .all_constraint_tags()
        .into_iter()
        .filter(|tag| {
            controls.contains_key(tag)
                || tag.ends_with(COMPLIANCE_SUFFIX)
                || declared.contains(tag.as_str())
        })
        .collect()
}

pub struct SecuritySkill {
    catalog: Arc<dyn Catalog>,
}

impl SecuritySkill {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    fn annotate(
        &self,
        architecture: &ArchitectureRecommendation,
        context: &RequirementSet,
    ) -> SpecialistAnnotation {
        let controls = match self.catalog.compliance_controls() {
            Ok(controls) => controls,
            Err(e) => {
                tracing::warn!(error = %e, "compliance controls unavailable");
                return SpecialistAnnotation::failed(NAME);
            }
        };

        let compliance = compliance_tags(context, &controls);

        if compliance.is_empty() {
            return SpecialistAnnotation::ok(
                NAME,
                vec!["No compliance constraints to verify".to_string()],
                OK_CONFIDENCE,
            );
        }

        let mut findings = Vec::with_capacity(compliance.len());
        let mut gaps = 0;
        for tag in compliance {
            let Some(accepted) = controls.get(&tag) else {
                gaps += 1;
                findings.push(format!(
                    "{}: cannot be verified; no catalog controls for this requirement",
                    tag
                ));
                continue;
            };
            let covering: Vec<&str> = architecture
                .services
                .iter()
                .filter(|s| accepted.iter().any(|f| s.security_features.contains(f)))
                .map(|s| s.name.as_str())
                .collect();
            if covering.is_empty() {
                gaps += 1;
                findings.push(format!(
                    "{}: not covered; needs one of: {}",
                    tag,
                    accepted.join(", ")
                ));
            } else {
                findings.push(format!("{}: covered by {}", tag, covering.join(", ")));
            }
        }

        if gaps == 0 {
            SpecialistAnnotation::ok(NAME, findings, OK_CONFIDENCE)
        } else {
            SpecialistAnnotation::degraded(NAME, findings, DEGRADED_CONFIDENCE)
        }
    }
}

impl Agent for SecuritySkill {
    fn name(&self) -> &str {
        NAME
    }

    fn expertise(&self) -> &[&'static str] {
        &["compliance", "security controls"]
    }
}

#[async_trait]
impl Specialist for SecuritySkill {
    async fn review(
        &self,
        architecture: &ArchitectureRecommendation,
        context: &RequirementSet,
    ) -> AgentResult<SpecialistAnnotation> {
        self.annotate(architecture, context).into_result()
    }
}
