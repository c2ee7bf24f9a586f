//! Built-in catalog tables.
//!
//! Requirement templates for each supported category, per-provider service
//! lists, classifier signatures, and compliance controls. Every template
//! lists technical requirements in dependency order.

use super::{CatalogData, CategorySignature, ServiceEntry, WeightedToken};
use crate::models::{
    tags, BusinessRequirement, CloudProvider, CloudService, PerformanceValue, ProblemCategory,
    RequirementKind, RequirementSet, ServiceType, TechnicalRequirement,
};
use std::collections::BTreeMap;

use CloudProvider::{Aws, Azure, Gcp};
use ServiceType::{Ai, Compute, Database, Messaging, Networking, Security, Storage};

/// Assemble the full built-in catalog
pub fn catalog_data() -> CatalogData {
    CatalogData {
        priority_order: vec![
            ProblemCategory::Ecommerce,
            ProblemCategory::Chatbot,
            ProblemCategory::ExpenseTracker,
        ],
        signatures: signatures(),
        templates: vec![ecommerce_template(), chatbot_template(), expense_template()],
        services: service_entries(),
        default_providers: [
            (ProblemCategory::Ecommerce, Aws),
            (ProblemCategory::Chatbot, Aws),
            (ProblemCategory::ExpenseTracker, Aws),
            (ProblemCategory::Unknown, Aws),
        ]
        .into_iter()
        .collect(),
        compliance_controls: compliance_controls(),
    }
}

fn signature(category: ProblemCategory, tokens: &[(&str, f64)]) -> CategorySignature {
    CategorySignature {
        category,
        tokens: tokens
            .iter()
            .map(|(token, weight)| WeightedToken::new(token, *weight))
            .collect(),
    }
}

fn signatures() -> Vec<CategorySignature> {
    vec![
        signature(
            ProblemCategory::Ecommerce,
            &[
                ("ecommerce", 2.0),
                ("commerce", 1.5),
                ("store", 1.0),
                ("shop", 1.0),
                ("shopping", 1.0),
                ("cart", 1.0),
                ("checkout", 1.0),
                ("online", 0.5),
                ("product", 0.5),
                ("products", 0.5),
                ("catalog", 0.5),
                ("payment", 0.5),
                ("payments", 0.5),
                ("inventory", 0.5),
                ("orders", 0.5),
            ],
        ),
        signature(
            ProblemCategory::Chatbot,
            &[
                ("chatbot", 2.0),
                ("bot", 1.0),
                ("chat", 1.0),
                ("assistant", 1.0),
                ("nlp", 1.0),
                ("conversation", 1.0),
                ("conversations", 1.0),
                ("crm", 0.5),
                ("escalate", 0.5),
                ("escalation", 0.5),
                ("support", 0.5),
                ("customer", 0.5),
            ],
        ),
        signature(
            ProblemCategory::ExpenseTracker,
            &[
                ("expense", 2.0),
                ("expenses", 2.0),
                ("receipt", 1.0),
                ("receipts", 1.0),
                ("reimbursement", 1.0),
                ("payroll", 1.0),
                ("ocr", 1.0),
                ("approval", 0.5),
                ("reporting", 0.5),
                ("employee", 0.5),
            ],
        ),
    ]
}

fn strings(items: &[&str]) -> std::collections::BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn text(value: &str) -> PerformanceValue {
    PerformanceValue::Text(value.to_string())
}

fn ecommerce_template() -> RequirementSet {
    use RequirementKind as K;
    RequirementSet {
        category: ProblemCategory::Ecommerce,
        business_requirements: vec![
            BusinessRequirement::new(
                "Handle 1000 daily users",
                5,
                K::Scalability,
                &[tags::HIGH_AVAILABILITY],
            ),
            BusinessRequirement::new(
                "Secure payment processing",
                5,
                K::Security,
                &[tags::PCI_DSS_COMPLIANCE],
            ),
            BusinessRequirement::new(
                "Product catalog management",
                4,
                K::Functionality,
                &["search_capability"],
            ),
            BusinessRequirement::new(
                "Shopping cart functionality",
                4,
                K::Functionality,
                &["session_management"],
            ),
            BusinessRequirement::new("Admin dashboard", 3, K::Functionality, &["user_management"]),
        ],
        technical_requirements: vec![
            TechnicalRequirement::new("web_application", &["responsive_design", "mobile_support"], &[])
                .with_need("response_time", text("<2s")),
            TechnicalRequirement::new(
                "database",
                &["ACID_compliance", "backup_recovery"],
                &["web_application"],
            )
            .with_need("concurrent_users", PerformanceValue::Number(1000.0)),
            TechnicalRequirement::new(
                "payment_gateway",
                &["PCI_compliance", "encryption"],
                &["web_application"],
            )
            .with_need("transaction_volume", text("high")),
            TechnicalRequirement::new("file_storage", &["image_optimization", "CDN"], &["web_application"])
                .with_need("storage_capacity", text("unlimited")),
        ],
        constraints: strings(&[tags::BUDGET_CONSCIOUS, tags::TIME_TO_MARKET]),
        success_metrics: strings(&["user_satisfaction", "conversion_rate", "uptime"]),
    }
}

fn chatbot_template() -> RequirementSet {
    use RequirementKind as K;
    RequirementSet {
        category: ProblemCategory::Chatbot,
        business_requirements: vec![
            BusinessRequirement::new(
                "Handle 500+ conversations daily",
                5,
                K::Scalability,
                &["real_time_processing"],
            ),
            BusinessRequirement::new("CRM integration", 4, K::Integration, &["api_compatibility"]),
            BusinessRequirement::new("Human escalation", 3, K::Functionality, &["seamless_handoff"]),
            BusinessRequirement::new(
                "Multi-language support",
                3,
                K::Functionality,
                &["internationalization"],
            ),
        ],
        technical_requirements: vec![
            TechnicalRequirement::new(
                "ai_service",
                &["natural_language_processing", "sentiment_analysis"],
                &[],
            )
            .with_need("response_time", text("<1s")),
            TechnicalRequirement::new(
                "conversation_storage",
                &["real_time_access", "privacy_compliance"],
                &["ai_service"],
            )
            .with_need("concurrent_conversations", PerformanceValue::Number(500.0)),
            TechnicalRequirement::new(
                "crm_integration",
                &["api_connectivity", "data_sync", tags::INTEGRATION],
                &["ai_service"],
            )
            .with_need("sync_frequency", text("real_time")),
        ],
        constraints: strings(&["ai_model_accuracy", "response_time"]),
        success_metrics: strings(&["resolution_rate", "customer_satisfaction", "escalation_rate"]),
    }
}

fn expense_template() -> RequirementSet {
    use RequirementKind as K;
    RequirementSet {
        category: ProblemCategory::ExpenseTracker,
        business_requirements: vec![
            BusinessRequirement::new("Mobile app support", 5, K::Functionality, &["cross_platform"]),
            BusinessRequirement::new(
                "Receipt photo processing",
                4,
                K::Functionality,
                &["ocr_capability"],
            ),
            BusinessRequirement::new(
                "Approval workflow",
                4,
                K::Functionality,
                &["notification_system"],
            ),
            BusinessRequirement::new(
                "Payroll integration",
                3,
                K::Integration,
                &[tags::SECURE_DATA_TRANSFER],
            ),
        ],
        technical_requirements: vec![
            TechnicalRequirement::new("mobile_backend", &["rest_api", "authentication"], &[])
                .with_need("concurrent_users", PerformanceValue::Number(500.0)),
            TechnicalRequirement::new(
                "image_processing",
                &["ocr_service", "image_storage"],
                &["mobile_backend"],
            )
            .with_need("processing_time", PerformanceValue::Duration { seconds: 5 }),
            TechnicalRequirement::new(
                "workflow_engine",
                &["approval_routing", "notifications"],
                &["mobile_backend"],
            )
            .with_need("approval_time", PerformanceValue::Duration { seconds: 86_400 }),
            TechnicalRequirement::new(
                "payroll_integration",
                &["secure_api", "data_validation", tags::INTEGRATION],
                &["workflow_engine"],
            )
            .with_need("sync_frequency", text("daily")),
        ],
        constraints: strings(&["mobile_performance", tags::DATA_PRIVACY]),
        success_metrics: strings(&["user_adoption", "processing_accuracy", "approval_efficiency"]),
    }
}

fn entry(category: ProblemCategory, provider: CloudProvider, services: Vec<CloudService>) -> ServiceEntry {
    ServiceEntry {
        category,
        provider,
        services,
    }
}

fn service_entries() -> Vec<ServiceEntry> {
    use ProblemCategory::*;
    vec![
        entry(
            Ecommerce,
            Aws,
            vec![
                CloudService::new("Amazon EC2", Aws, Compute, "Web application servers", "$200-500/month", "Auto Scaling", &["VPC", "Security Groups"]),
                CloudService::new("Amazon RDS", Aws, Database, "MySQL/PostgreSQL database", "$100-300/month", "Read replicas", &["Encryption at rest", "VPC"]),
                CloudService::new("Amazon S3", Aws, Storage, "Product images and static assets", "$50-150/month", "Unlimited", &["Bucket policies", "Encryption"]),
                CloudService::new("CloudFront", Aws, Networking, "CDN for global content delivery", "$20-100/month", "Global", &["DDoS protection", "SSL/TLS"]),
                CloudService::new("Application Load Balancer", Aws, Networking, "Traffic distribution and SSL termination", "$30-80/month", "Auto Scaling", &["Health checks", "SSL termination"]),
                CloudService::new("AWS WAF", Aws, Security, "Web application firewall", "$10-50/month", "Auto Scaling", &["OWASP protection", "DDoS mitigation"]),
            ],
        ),
        entry(
            Ecommerce,
            Azure,
            vec![
                CloudService::new("Azure App Service", Azure, Compute, "Managed web application hosting", "$150-400/month", "Auto Scaling", &["VNet integration", "Managed identity"]),
                CloudService::new("Azure Database for PostgreSQL", Azure, Database, "Managed relational database", "$120-300/month", "Read replicas", &["Encryption at rest", "Private endpoints"]),
                CloudService::new("Azure Blob Storage", Azure, Storage, "Product images and static assets", "$40-120/month", "Unlimited", &["Access policies", "Encryption"]),
                CloudService::new("Azure Front Door", Azure, Networking, "Global CDN and edge routing", "$35-100/month", "Global", &["DDoS protection", "SSL/TLS"]),
                CloudService::new("Azure Application Gateway", Azure, Networking, "Regional load balancing and SSL termination", "$40-90/month", "Auto Scaling", &["Health checks", "SSL termination"]),
                CloudService::new("Azure Web Application Firewall", Azure, Security, "Web application firewall", "$20-60/month", "Auto Scaling", &["Bot protection", "OWASP protection"]),
            ],
        ),
        entry(
            Ecommerce,
            Gcp,
            vec![
                CloudService::new("Compute Engine", Gcp, Compute, "Web application servers", "$180-450/month", "Managed instance groups", &["Firewall rules", "VPC"]),
                CloudService::new("Cloud SQL", Gcp, Database, "Managed MySQL/PostgreSQL database", "$100-280/month", "Read replicas", &["Encryption at rest", "Private IP"]),
                CloudService::new("Cloud Storage", Gcp, Storage, "Product images and static assets", "$40-130/month", "Unlimited", &["Encryption", "IAM policies"]),
                CloudService::new("Cloud CDN", Gcp, Networking, "CDN for global content delivery", "$20-90/month", "Global", &["DDoS protection", "SSL/TLS"]),
                CloudService::new("Cloud Load Balancing", Gcp, Networking, "Global load balancing and SSL termination", "$25-75/month", "Global", &["Health checks", "SSL termination"]),
                CloudService::new("Cloud Armor", Gcp, Security, "Web application firewall", "$10-50/month", "Auto Scaling", &["DDoS mitigation", "OWASP protection"]),
            ],
        ),
        entry(
            Chatbot,
            Aws,
            vec![
                CloudService::new("AWS Lambda", Aws, Compute, "Serverless chatbot functions", "$50-200/month", "Auto Scaling", &["IAM roles", "VPC"]),
                CloudService::new("Amazon Lex", Aws, Ai, "Natural language understanding", "$100-300/month", "Auto Scaling", &["Access control", "Data encryption"]),
                CloudService::new("Amazon DynamoDB", Aws, Database, "Conversation storage", "$80-200/month", "Auto Scaling", &["Encryption at rest", "Point-in-time recovery"]),
                CloudService::new("Amazon API Gateway", Aws, Networking, "API management", "$30-100/month", "Auto Scaling", &["API keys", "Rate limiting"]),
                CloudService::new("Amazon SNS", Aws, Messaging, "Notifications and escalations", "$20-50/month", "Auto Scaling", &["Access control", "Message encryption"]),
            ],
        ),
        entry(
            Chatbot,
            Azure,
            vec![
                CloudService::new("Azure Functions", Azure, Compute, "Serverless chatbot functions", "$40-180/month", "Auto Scaling", &["Managed identity", "VNet integration"]),
                CloudService::new("Azure AI Language", Azure, Ai, "Natural language understanding", "$90-280/month", "Auto Scaling", &["Access control", "Data encryption"]),
                CloudService::new("Azure Cosmos DB", Azure, Database, "Conversation storage", "$90-220/month", "Auto Scaling", &["Encryption at rest", "Point-in-time restore"]),
                CloudService::new("Azure API Management", Azure, Networking, "API management", "$50-150/month", "Auto Scaling", &["API keys", "Rate limiting"]),
                CloudService::new("Azure Service Bus", Azure, Messaging, "Notifications and escalations", "$15-50/month", "Auto Scaling", &["Access control", "Message encryption"]),
            ],
        ),
        entry(
            ExpenseTracker,
            Aws,
            vec![
                CloudService::new("AWS Lambda", Aws, Compute, "Serverless backend API", "$50-150/month", "Auto Scaling", &["IAM roles", "VPC"]),
                CloudService::new("Amazon S3", Aws, Storage, "Receipt image storage", "$30-100/month", "Unlimited", &["Bucket policies", "Encryption"]),
                CloudService::new("Amazon Textract", Aws, Ai, "OCR for receipt processing", "$100-300/month", "Auto Scaling", &["Access control", "Data encryption"]),
                CloudService::new("Amazon RDS", Aws, Database, "Expense data storage", "$80-200/month", "Read replicas", &["Encryption at rest", "VPC"]),
                CloudService::new("Amazon SNS", Aws, Messaging, "Approval notifications", "$20-50/month", "Auto Scaling", &["Access control", "Message encryption"]),
            ],
        ),
        entry(
            ExpenseTracker,
            Gcp,
            vec![
                CloudService::new("Cloud Run", Gcp, Compute, "Serverless backend API", "$40-140/month", "Auto Scaling", &["IAM roles", "VPC connector"]),
                CloudService::new("Cloud Storage", Gcp, Storage, "Receipt image storage", "$30-90/month", "Unlimited", &["Encryption", "IAM policies"]),
                CloudService::new("Document AI", Gcp, Ai, "OCR for receipt processing", "$90-280/month", "Auto Scaling", &["Access control", "Data encryption"]),
                CloudService::new("Cloud SQL", Gcp, Database, "Expense data storage", "$80-200/month", "Read replicas", &["Encryption at rest", "Private IP"]),
                CloudService::new("Pub/Sub", Gcp, Messaging, "Approval notifications", "$15-45/month", "Auto Scaling", &["Access control", "Message encryption"]),
            ],
        ),
        entry(
            Unknown,
            Aws,
            vec![
                CloudService::new("Amazon EC2", Aws, Compute, "General-purpose application servers", "$100-300/month", "Auto Scaling", &["Security Groups", "VPC"]),
                CloudService::new("Amazon RDS", Aws, Database, "Managed relational database", "$80-200/month", "Read replicas", &["Encryption at rest", "VPC"]),
                CloudService::new("Amazon S3", Aws, Storage, "Object storage", "$20-80/month", "Unlimited", &["Bucket policies", "Encryption"]),
                CloudService::new("Application Load Balancer", Aws, Networking, "Traffic distribution", "$30-80/month", "Auto Scaling", &["Health checks", "SSL termination"]),
            ],
        ),
        entry(
            Unknown,
            Azure,
            vec![
                CloudService::new("Azure App Service", Azure, Compute, "General-purpose application hosting", "$100-300/month", "Auto Scaling", &["Managed identity", "VNet integration"]),
                CloudService::new("Azure SQL Database", Azure, Database, "Managed relational database", "$80-220/month", "Read replicas", &["Encryption at rest", "Private endpoints"]),
                CloudService::new("Azure Blob Storage", Azure, Storage, "Object storage", "$20-80/month", "Unlimited", &["Access policies", "Encryption"]),
                CloudService::new("Azure Application Gateway", Azure, Networking, "Traffic distribution", "$40-90/month", "Auto Scaling", &["Health checks", "SSL termination"]),
            ],
        ),
        entry(
            Unknown,
            Gcp,
            vec![
                CloudService::new("Compute Engine", Gcp, Compute, "General-purpose application servers", "$100-300/month", "Managed instance groups", &["Firewall rules", "VPC"]),
                CloudService::new("Cloud SQL", Gcp, Database, "Managed relational database", "$80-200/month", "Read replicas", &["Encryption at rest", "Private IP"]),
                CloudService::new("Cloud Storage", Gcp, Storage, "Object storage", "$20-80/month", "Unlimited", &["Encryption", "IAM policies"]),
                CloudService::new("Cloud Load Balancing", Gcp, Networking, "Traffic distribution", "$25-75/month", "Global", &["Health checks", "SSL termination"]),
            ],
        ),
    ]
}

fn compliance_controls() -> BTreeMap<String, Vec<String>> {
    let controls: [(&str, &[&str]); 4] = [
        (
            tags::PCI_DSS_COMPLIANCE,
            &["Encryption at rest", "OWASP protection", "SSL termination", "SSL/TLS"],
        ),
        (
            tags::DATA_PRIVACY,
            &["Access control", "Data encryption", "Encryption", "Encryption at rest"],
        ),
        (
            tags::SECURE_DATA_TRANSFER,
            &["API keys", "Message encryption", "SSL/TLS"],
        ),
        ("hipaa_compliance", &["Audit logging", "HIPAA eligible"]),
    ];
    controls
        .iter()
        .map(|(tag, features)| {
            (
                tag.to_string(),
                features.iter().map(|f| f.to_string()).collect(),
            )
        })
        .collect()
}
