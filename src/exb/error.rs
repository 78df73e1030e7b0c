use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("closing tag `{0}` has no matching opening tag")]
    UnexpectedClose(String),

    #[error("tag `{0}` is never closed")]
    Unclosed(String),
}
