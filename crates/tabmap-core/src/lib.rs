#![deny(unsafe_code)]

//! Export pipeline and session controller.

pub mod export;
pub mod session;

pub use export::{ExportError, generate};
pub use session::{
    DEFAULT_EXPORT_LATENCY, ExportJob, RestoreOutcome, Session, SessionError, SessionOptions,
};
