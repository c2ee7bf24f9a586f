//! # Recommendation Report
//!
//! Renders a [`FinalRecommendation`] as a Markdown document for humans.

use crate::models::{AnnotationStatus, FinalRecommendation};

fn status_label(status: AnnotationStatus) -> &'static str {
    match status {
        AnnotationStatus::Ok => "ok",
        AnnotationStatus::Degraded => "degraded",
        AnnotationStatus::Failed => "failed",
    }
}

/// Render a recommendation as Markdown
///
/// Sections:
/// - Scenario summary and confidence
/// - Services table
/// - Deployment, cost, scaling, monitoring
/// - Security considerations
/// - Specialist reviews
/// - Next steps
pub fn render_markdown(plan: &FinalRecommendation) -> String {
    let arch = &plan.architecture;
    let mut md = String::new();

    // Header
    md.push_str(&format!(
        "# Architecture Recommendation: {}\n\n",
        plan.category.display_name()
    ));
    md.push_str(&format!("> {}\n\n", plan.problem_description.trim()));

    // Summary
    md.push_str("## Summary\n\n");
    md.push_str(&format!("- **Category:** {}\n", plan.category));
    md.push_str(&format!("- **Provider:** {}\n", arch.provider.display_name()));
    md.push_str(&format!(
        "- **Overall confidence:** {:.2}\n",
        plan.overall_confidence
    ));
    md.push_str(&format!(
        "- **Stage confidences:** classification {:.2}, extraction {:.2}, synthesis {:.2}\n",
        plan.stage_confidences.classification,
        plan.stage_confidences.extraction,
        plan.stage_confidences.synthesis
    ));
    md.push_str(&format!(
        "- **Complete:** {}\n",
        if plan.complete { "yes" } else { "no" }
    ));
    if plan.needs_manual_review {
        md.push_str("- **Manual review required**\n");
    }
    md.push('\n');

    if !plan.fallbacks.is_empty() {
        md.push_str("### Fallbacks\n\n");
        for marker in &plan.fallbacks {
            md.push_str(&format!("- `{}`: {}\n", marker.stage, marker.reason));
        }
        md.push('\n');
    }

    // Services
    md.push_str("## Services\n\n");
    if arch.services.is_empty() {
        md.push_str("_No services selected_\n\n");
    } else {
        md.push_str("| Service | Type | Purpose | Cost | Scaling |\n");
        md.push_str("|---------|------|---------|------|---------|\n");
        for s in &arch.services {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                s.name,
                s.service_type.as_str(),
                s.description,
                s.cost_estimate,
                s.scalability
            ));
        }
        md.push('\n');
    }

    // Operations
    md.push_str("## Deployment\n\n");
    md.push_str(&format!(
        "**{}**: {}\n\n",
        arch.deployment.strategy.as_str(),
        arch.deployment.description
    ));
    md.push_str("## Cost\n\n");
    md.push_str(&format!("{}\n\n", arch.cost_estimate));
    md.push_str("## Scalability\n\n");
    md.push_str(&format!("{}\n\n", arch.scalability_plan));
    md.push_str("## Monitoring\n\n");
    md.push_str(&format!("{}\n\n", arch.monitoring_strategy));

    md.push_str("## Security\n\n");
    for item in &arch.security_considerations {
        md.push_str(&format!("- {}\n", item));
    }
    md.push('\n');

    // Specialists
    if !plan.annotations.is_empty() {
        md.push_str("## Specialist Reviews\n\n");
        for a in &plan.annotations {
            md.push_str(&format!(
                "### {} ({})\n\n",
                a.specialist,
                status_label(a.status)
            ));
            if a.findings.is_empty() {
                md.push_str("_No findings_\n");
            }
            for finding in &a.findings {
                md.push_str(&format!("- {}\n", finding));
            }
            md.push('\n');
        }
    }

    md.push_str("## Next Steps\n\n");
    for (i, step) in plan.next_steps.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, step));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::swarm::{Orchestrator, OrchestratorConfig};
    use std::sync::Arc;

    fn plan(description: &str) -> FinalRecommendation {
        let orchestrator = Orchestrator::new(
            Arc::new(StaticCatalog::builtin()),
            OrchestratorConfig::default(),
        )
        .with_default_specialists();
        tokio_test::block_on(orchestrator.plan(description, None)).unwrap()
    }

    #[test]
    fn test_render_ecommerce() {
        let md = render_markdown(&plan("Online shop with cart and checkout"));
        assert!(md.starts_with("# Architecture Recommendation: E-commerce"));
        assert!(md.contains("| Amazon EC2 | compute |"));
        assert!(md.contains("**rolling**"));
        assert!(md.contains("### cost (ok)"));
        assert!(md.contains("1. Review and approve architecture design"));
        assert!(!md.contains("### Fallbacks"));
    }

    #[test]
    fn test_render_fallbacks() {
        let md = render_markdown(&plan("asdkj qpwoe random text"));
        assert!(md.contains("- **Complete:** no"));
        assert!(md.contains("- **Manual review required**"));
        assert!(md.contains("### Fallbacks"));
        assert!(md.contains("`classifier`"));
    }
}
