use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("failed to read dataset: {_0}")]
    Dataset(#[error(not(source))] String),
    #[display("failed to update the recency table")]
    Recency,
    #[display("expected an array of objects at {_0:?}")]
    NotTabular(#[error(not(source))] String),
    #[display("failed to write output")]
    Output,
}
