pub mod error;
pub mod filtered_query;
pub mod partial_update;
pub mod types;

pub use error::SqlBuildError;
pub use filtered_query::FilteredQuery;
pub use partial_update::PartialUpdate;
pub use types::*;
