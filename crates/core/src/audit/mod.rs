//! Audit trail: redaction, projection and recording
//!
//! Every pipeline attempt becomes exactly one [`AuditEntry`] appended to an
//! [`AuditSink`]. Redaction is applied once, in [`project`], before anything
//! reaches a sink.
//!
//! [`AuditEntry`]: ciam_domain::AuditEntry
//! [`AuditSink`]: ports::AuditSink

pub mod memory;
pub mod ports;
pub mod projection;
pub mod recorder;
pub mod redaction;

pub use memory::InMemoryAuditSink;
pub use ports::AuditSink;
pub use projection::project;
pub use recorder::AuditRecorder;
