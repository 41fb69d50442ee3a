use entity::Role;

use super::vocabulary::Pipeline;
use crate::{auth::Actor, error::PipelineError};

/// Roles that may see and move cards on the sales board.
pub const SALES_ROLES: &[Role] = &[Role::Seller, Role::Manager];

/// Roles that may see and move cards on the processing board.
pub const PROCESSING_ROLES: &[Role] = &[Role::Backoffice, Role::Manager];

/// Shown when someone outside the processing roles tries to move a card there.
pub const PROCESSING_DENIED: &str = "seller cannot move at this stage";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub can_view_sales: bool,
    pub can_view_processing: bool,
    pub can_edit_sales: bool,
    pub can_edit_processing: bool,
    pub can_manage_team: bool,
}

impl Capabilities {
    /// Set intersections only: a manager ends up with everything because the
    /// role sits in both lists.
    pub fn for_actor(actor: &Actor) -> Self {
        let can_view_sales = actor.has_any_role(SALES_ROLES);
        let can_view_processing = actor.has_any_role(PROCESSING_ROLES);
        Self {
            can_view_sales,
            can_view_processing,
            can_edit_sales: can_view_sales,
            can_edit_processing: can_view_processing,
            can_manage_team: actor.has_role(Role::Manager),
        }
    }
}

/// The legacy and operational boards are open to every authenticated actor.
pub fn ensure_can_view(actor: &Actor, pipeline: Pipeline) -> Result<(), PipelineError> {
    let caps = Capabilities::for_actor(actor);
    let allowed = match pipeline {
        Pipeline::Sales => caps.can_view_sales,
        Pipeline::Processing => caps.can_view_processing,
        Pipeline::Legacy | Pipeline::Operational => true,
    };
    if allowed {
        Ok(())
    } else {
        Err(PipelineError::denied(format!(
            "you cannot view the {} pipeline",
            pipeline.key()
        )))
    }
}

pub fn ensure_can_edit_sales(actor: &Actor) -> Result<(), PipelineError> {
    if Capabilities::for_actor(actor).can_edit_sales {
        Ok(())
    } else {
        Err(PipelineError::denied(
            "only sellers and managers can move proposals in the sales pipeline",
        ))
    }
}

pub fn ensure_can_edit_processing(actor: &Actor) -> Result<(), PipelineError> {
    if Capabilities::for_actor(actor).can_edit_processing {
        Ok(())
    } else {
        Err(PipelineError::denied(PROCESSING_DENIED))
    }
}

pub fn ensure_can_manage_team(actor: &Actor) -> Result<(), PipelineError> {
    if Capabilities::for_actor(actor).can_manage_team {
        Ok(())
    } else {
        Err(PipelineError::denied("only managers can create users"))
    }
}
