use thiserror::Error;

use crate::model::{GroupProgressError, ModuleStatusError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Group(#[from] GroupProgressError),
    #[error(transparent)]
    Status(#[from] ModuleStatusError),
}
