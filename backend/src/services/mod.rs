//! Record services and the cross-store plumbing they share.
//!
//! Each service owns the handles it needs and is constructed once at
//! startup, then injected into handlers through `web::Data`.

pub mod billing_service;
pub mod contract_service;
pub mod customer_service;
pub mod reference_service;
pub mod report_service;
pub mod vehicle_service;

pub use billing_service::BillingService;
pub use contract_service::ContractService;
pub use customer_service::CustomerService;
pub use reference_service::ReferenceChecker;
pub use report_service::ReportService;
pub use vehicle_service::VehicleService;
