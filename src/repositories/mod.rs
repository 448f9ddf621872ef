//! # Repository Layer
//!
//! Repositories encapsulate SeaORM operations with tenant-aware queries.
//! They are generic over [`sea_orm::ConnectionTrait`], so callers hand them
//! either the connection pool or an open transaction and the queries run
//! the same way against both.

pub mod audit_log;
pub mod category;

pub use audit_log::AuditLogRepository;
pub use category::CategoryRepository;
