use thiserror::Error;

use crate::project::Status;

#[derive(Error, Debug)]
pub enum SmithError {
    #[error("generation already in flight for this project")] Busy,
    #[error("invalid status transition: {0} -> {1}")] Transition(Status, Status),
    #[error("project has no generated document")] EmptyDocument,
    #[error("storage error: {0}")] Storage(String),
    #[error("unknown deployment platform: {0}")] UnknownPlatform(String),
}
