use crate::element::ElementId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("No document has been imported")]
    NoDocument,

    #[error("Unknown type: {type_name}")]
    UnknownType { type_name: String },

    #[error("Unknown element: {id}")]
    UnknownElement { id: ElementId },

    #[error("Duplicate element: {id}")]
    DuplicateElement { id: ElementId },

    #[error("The root element cannot be {action}")]
    RootElement { action: &'static str },

    #[error("Invalid package descriptor: {message}")]
    InvalidPackage { message: String },

    #[error("Duplicate package prefix: {prefix}")]
    DuplicatePackage { prefix: String },
}

/// Fatal problems while turning BPMN XML into a [`Document`](crate::Document).
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Expected a <bpmn:definitions> root element, found <{found}>")]
    NotDefinitions { found: String },

    #[error("No <bpmn:process> found in definitions")]
    MissingProcess,

    #[error("Element is missing an id: <{tag}>")]
    MissingId { tag: String },

    #[error("Duplicate element id: {id}")]
    DuplicateId { id: String },

    #[error("Invalid {attribute} on {id}: {value}")]
    InvalidNumber {
        id: String,
        attribute: &'static str,
        value: String,
    },
}
