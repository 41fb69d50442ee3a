//! Database-backed operations. Each one loads what it needs, hands the
//! decision to the pure pipeline core and writes the result back.

pub mod proposals;
pub mod seed;
pub mod team;

pub use proposals::{
    NewProposalInput, ProposalFilter, ProposalView, WriteOutcome, create_proposal, list_proposals,
    load_proposal, move_legacy_status, move_operational_status, move_processing_status,
    move_sales_status, pipeline_board, pipeline_metrics, processing_board_groups, status_history,
};
pub use seed::{SeededRecords, seed_demo};
pub use team::{NewUserInput, TeamMember, load_actor, load_member, provision_user};
