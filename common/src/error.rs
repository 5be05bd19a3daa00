use thiserror::Error;

#[derive(Error, Debug)]
pub enum RsaError {
    #[error("e and phi are not coprime")]
    NotCoprime,
    #[error("invalid key bit length: {0}")]
    InvalidBitLength(usize),
}

#[derive(Error, Debug)]
pub enum RingError {
    #[error("public key file must hold exactly 4 integer lines (e1, n1, e2, n2): {0}")]
    FileFormat(String),
    #[error("input is empty: {0}")]
    EmptyInput(String),
    #[error("invalid signer choice '{0}': must be 1 or 2")]
    InvalidRole(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid public key: {0}")]
    InvalidKey(String),
}
