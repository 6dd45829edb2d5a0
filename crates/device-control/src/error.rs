use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("preset not found: {0}")]
    PresetNotFound(u32),
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("device error: {0}")]
    Device(String),
    #[error("decode error: {0}")]
    Decode(String),
}
