use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("classifier error: {0}")]
    Classifier(String),
    #[error("lookup error: {0}")]
    Lookup(String),
    #[error("configuration error: {0}")]
    Config(String),
}
