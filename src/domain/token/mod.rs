//! Token domain types

mod claims;
mod clock;
mod subject;

pub use claims::{TokenClaims, TokenPair, TokenType};
pub use clock::{Clock, ManualClock, SystemClock};
pub use subject::SubjectId;

/// Validated identity attached to a request after the access token checks out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    subject_id: SubjectId,
}

impl AuthenticatedIdentity {
    pub fn new(subject_id: SubjectId) -> Self {
        Self { subject_id }
    }

    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }
}
