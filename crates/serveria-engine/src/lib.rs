//! Selection manager and validation engine for the server configurator.
//!
//! A [`ConfigSession`] holds one user's chassis choice and component
//! selection; totals and warnings are derived from it after every change.

pub mod export;
pub mod payload;
pub mod registry;
pub mod session;
pub mod types;
pub mod validation;

pub use export::SpecSheet;
pub use payload::DropPayload;
pub use registry::{SessionInfo, SessionRegistry};
pub use session::ConfigSession;
pub use types::*;
