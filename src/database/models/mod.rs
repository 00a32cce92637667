pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail, CompanyJob};
pub use job::{Job, JobDetail};
pub use user::{User, UserDetail};
