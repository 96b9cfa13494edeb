//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObsgateError {
    #[error("SERIALIZE/{0}")]
    Serialize(String),
}
