use thiserror::Error;

/// Everything that can abort a conversion. None of these are retried.
#[derive(Error, Debug)]
pub enum Error {
    #[error("input is not a DOCX file and no converter was supplied")]
    NotNativeFormat,

    #[error("conversion to DOCX failed")]
    ConversionFailed,

    #[error("malformed DOCX: {0}")]
    MalformedContainer(String),

    #[error("unexpected tag in list or table context: {0}")]
    UnexpectedStructuralTag(String),

    #[error("unsupported content tag: {0}")]
    UnsupportedContentTag(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
