pub mod auth;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod service;

pub use auth::{Actor, AuthConfig};
pub use error::{PipelineError, ServiceError, ServiceResult};
pub use schema::{AppSchema, CrmSchema, build_schema};
