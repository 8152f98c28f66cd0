//! Session state: the annotation store and the per-session overlay state.

mod session;
mod store;

#[cfg(test)]
mod tests;

pub use session::{AnnotationStatus, Session, SessionError};
pub use store::AnnotationStore;
