//! sea-orm models for the CRM tables.
//!
//! The string-valued enums in here are persisted verbatim and compared by
//! equality, so their `string_value`s form a closed vocabulary that must not
//! be renamed once rows exist.

pub mod company;
pub mod contract;
pub mod plan;
pub mod profile;
pub mod proposal;
pub mod proposal_status_history;
pub mod user_role;

pub use company::CompanyStatus;
pub use proposal::{OperationalStatus, ProcessingStatus, ProposalStatus, RequestType, SalesStatus};
pub use user_role::Role;
