pub mod analytics;
pub mod audit_pack_service;
pub mod dashboard_service;
pub mod evidence_service;

pub use analytics::{AnalyticsRpc, StoreAnalytics};
pub use audit_pack_service::{AuditPackRequest, AuditPackService};
pub use dashboard_service::DashboardService;
pub use evidence_service::{EvidenceService, EvidenceUpload};
