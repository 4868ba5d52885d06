//! Infrastructure layer: repositories, invoice orchestration, config.

pub mod config;
pub mod invoice_service;
pub mod read_model;

pub use config::{AppConfig, ConfigError};
pub use invoice_service::{InvoiceService, ServiceError, ServiceResult};
pub use read_model::{
    EnrollmentRepository, FamilyRepository, InMemoryStore, InvoiceRepository, LedgerRepository,
    RepositoryError, RepositoryResult, SettingsRepository, Snapshot,
};
