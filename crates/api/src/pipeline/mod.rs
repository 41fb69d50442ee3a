//! The pure pipeline core. Nothing in here talks to the database.

pub mod board;
pub mod metrics;
pub mod policy;
pub mod transition;
pub mod vocabulary;

pub use board::{
    Board, BoardColumn, GroupedBoard, Projectable, parse_columns, processing_groups, project_board,
};
pub use metrics::{PipelineMetrics, summarize};
pub use policy::Capabilities;
pub use transition::{
    ProposalTerms, SideEffect, TransitionOutcome, transition_legacy, transition_operational,
    transition_processing, transition_sales, validate_terms,
};
pub use vocabulary::{Pipeline, PipelineState, ProcessingGroup};
