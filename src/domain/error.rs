use color_eyre::eyre::Report;
use thiserror::Error;

use super::MemberId;

#[derive(Debug, Error)]
pub enum MemberAPIError {
    #[error("No member with ID {0}")]
    MemberNotFound(MemberId),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
}

#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}
