pub mod bind;
pub mod manager;
pub mod models;

pub use bind::bind_params_as;
pub use manager::{DatabaseError, DatabaseManager};
