use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Snapshot file {path} could not be read: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Snapshot file {path} is malformed: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Snapshot file {path} could not be written: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error(transparent)]
    Provider(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
