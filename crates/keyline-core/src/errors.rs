use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Vector source could not be parsed: {0}")]
    Malformed(String),
    #[error("Import produced no renderable layers")]
    NoRenderableContent,
}
