//! Pipeline transition engine.
//!
//! Every function here is pure: it takes the current proposal, the target
//! state, the actor and the clock reading, and returns the next proposal plus
//! the side effects the caller must persist, in order. Refusals never
//! produce a partially updated proposal.

use chrono::NaiveDate;
use entity::{
    OperationalStatus, ProcessingStatus, ProposalStatus, RequestType, SalesStatus, proposal,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use super::{
    policy,
    vocabulary::{PROCESSING_ENTRY, PipelineState},
};
use crate::{auth::Actor, error::PipelineError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SideEffect {
    AppendHistory {
        old_status: Option<ProposalStatus>,
        new_status: ProposalStatus,
        changed_by: Uuid,
        changed_at: DateTimeWithTimeZone,
    },
    CreateContract {
        start_date: NaiveDate,
    },
    ActivateCompany {
        company_id: Uuid,
    },
}

#[derive(Clone, Debug)]
pub struct TransitionOutcome {
    pub proposal: proposal::Model,
    pub effects: Vec<SideEffect>,
}

/// The commercial terms that must hold before a proposal is written or
/// handed off.
#[derive(Clone, Copy, Debug)]
pub struct ProposalTerms<'a> {
    pub line_quantity: i32,
    pub price_per_line_cents: i64,
    pub request_type: Option<RequestType>,
    pub donor_carrier: Option<&'a str>,
}

impl<'a> From<&'a proposal::Model> for ProposalTerms<'a> {
    fn from(model: &'a proposal::Model) -> Self {
        Self {
            line_quantity: model.line_quantity,
            price_per_line_cents: model.price_per_line_cents,
            request_type: model.request_type,
            donor_carrier: model.donor_carrier.as_deref(),
        }
    }
}

/// Validates the terms and returns the monthly total they imply.
pub fn validate_terms(terms: &ProposalTerms<'_>) -> Result<i64, PipelineError> {
    if terms.line_quantity < 1 {
        return Err(PipelineError::invalid("line quantity must be at least 1"));
    }
    if terms.price_per_line_cents < 0 {
        return Err(PipelineError::invalid("price per line cannot be negative"));
    }
    if terms.request_type == Some(RequestType::Portability)
        && terms.donor_carrier.map_or(true, |c| c.trim().is_empty())
    {
        return Err(PipelineError::invalid(
            "donor carrier is required for portability requests",
        ));
    }
    monthly_total(terms.line_quantity, terms.price_per_line_cents)
}

pub fn monthly_total(line_quantity: i32, price_per_line_cents: i64) -> Result<i64, PipelineError> {
    i64::from(line_quantity)
        .checked_mul(price_per_line_cents)
        .ok_or_else(|| PipelineError::invalid("monthly total overflows"))
}

/// Moves a proposal inside the sales pipeline.
///
/// Reaching `sent_to_processing` stamps the hand-off time and seeds the
/// processing pipeline; from then on the sales state is frozen.
pub fn transition_sales(
    proposal: &proposal::Model,
    target: SalesStatus,
    actor: &Actor,
    now: DateTimeWithTimeZone,
) -> Result<TransitionOutcome, PipelineError> {
    policy::ensure_can_edit_sales(actor)?;
    if proposal.sales_status == Some(SalesStatus::SentToProcessing) {
        return Err(PipelineError::denied(
            "proposal was already handed off to processing; its sales status is frozen",
        ));
    }
    if target == SalesStatus::SentToProcessing {
        validate_terms(&ProposalTerms::from(proposal))?;
    }

    let mut next = proposal.clone();
    next.sales_status = Some(target);
    if target == SalesStatus::SentToProcessing {
        next.sent_to_processing_at.get_or_insert(now);
        next.processing_status.get_or_insert(PROCESSING_ENTRY);
    }
    refresh(&mut next, now)?;
    Ok(TransitionOutcome {
        proposal: next,
        effects: Vec::new(),
    })
}

/// Moves a handed-off proposal to any processing state. There is no ordering
/// between the processing states, only the role gate.
pub fn transition_processing(
    proposal: &proposal::Model,
    target: ProcessingStatus,
    actor: &Actor,
    now: DateTimeWithTimeZone,
) -> Result<TransitionOutcome, PipelineError> {
    policy::ensure_can_edit_processing(actor)?;
    if proposal.sales_status != Some(SalesStatus::SentToProcessing)
        || proposal.processing_status.is_none()
    {
        return Err(PipelineError::invalid(format!(
            "proposal has not been handed off to processing (sales status: {})",
            proposal.sales_status.map_or("none", |s| s.key())
        )));
    }

    let mut next = proposal.clone();
    next.processing_status = Some(target);
    refresh(&mut next, now)?;
    Ok(TransitionOutcome {
        proposal: next,
        effects: Vec::new(),
    })
}

/// Moves the single-pipeline `status`. Any authenticated actor may do this;
/// holding an `Actor` is the proof of authentication.
pub fn transition_legacy(
    proposal: &proposal::Model,
    target: ProposalStatus,
    actor: &Actor,
    now: DateTimeWithTimeZone,
) -> Result<TransitionOutcome, PipelineError> {
    let mut next = proposal.clone();
    next.status = target;
    refresh(&mut next, now)?;

    let mut effects = vec![SideEffect::AppendHistory {
        old_status: Some(proposal.status),
        new_status: target,
        changed_by: actor.user_id,
        changed_at: now,
    }];
    if target == ProposalStatus::Signed {
        effects.push(SideEffect::CreateContract {
            start_date: now.date_naive(),
        });
        effects.push(SideEffect::ActivateCompany {
            company_id: proposal.company_id,
        });
    }
    Ok(TransitionOutcome {
        proposal: next,
        effects,
    })
}

/// Moves the follow-up status of a signed proposal. Like the legacy status,
/// it carries no role gate.
pub fn transition_operational(
    proposal: &proposal::Model,
    target: OperationalStatus,
    _actor: &Actor,
    now: DateTimeWithTimeZone,
) -> Result<TransitionOutcome, PipelineError> {
    if proposal.status != ProposalStatus::Signed {
        return Err(PipelineError::invalid(format!(
            "only signed proposals have an operational status (status: {})",
            proposal.status.key()
        )));
    }

    let mut next = proposal.clone();
    next.operational_status = Some(target);
    refresh(&mut next, now)?;
    Ok(TransitionOutcome {
        proposal: next,
        effects: Vec::new(),
    })
}

fn refresh(next: &mut proposal::Model, now: DateTimeWithTimeZone) -> Result<(), PipelineError> {
    next.total_monthly_cents = monthly_total(next.line_quantity, next.price_per_line_cents)?;
    next.updated_at = now;
    Ok(())
}
