use annotator_model::{ElementId, ImportError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The initial document could not be loaded. Fatal to a session.
    #[error("Failed to load diagram: {0}")]
    Load(#[from] ImportError),

    #[error("Element {id} no longer exists")]
    StaleTarget { id: ElementId },

    #[error(transparent)]
    Model(#[from] annotator_model::Error),

    #[error("Invalid configuration at {path}: {message}")]
    Config { path: String, message: String },
}
