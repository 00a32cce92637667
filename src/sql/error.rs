use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlBuildError {
    /// A partial update was requested with no fields to set.
    #[error("No data")]
    NoData,
}
