//! Business logic services

pub mod access;
pub mod pdf_service;
pub mod problem_service;
pub mod testcase_versioner;

pub use access::ProblemAccess;
pub use pdf_service::{PdfAttachmentHandler, PdfBlob};
pub use problem_service::ProblemLifecycleService;
pub use testcase_versioner::TestcaseVersioner;
