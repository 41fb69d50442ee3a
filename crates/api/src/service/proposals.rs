use std::collections::HashMap;

use chrono::Utc;
use entity::{
    CompanyStatus, OperationalStatus, ProcessingStatus, ProposalStatus, RequestType, SalesStatus,
    company, contract, plan, proposal, proposal_status_history,
};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    prelude::DateTimeWithTimeZone,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::Actor,
    error::{PipelineError, ServiceError, ServiceResult},
    pipeline::{
        board::{Board, GroupedBoard, Projectable, processing_groups, project_board},
        metrics::{PipelineMetrics, summarize},
        policy,
        transition::{
            ProposalTerms, SideEffect, TransitionOutcome, transition_legacy, transition_operational,
            transition_processing, transition_sales, validate_terms,
        },
        vocabulary::{Pipeline, PipelineState},
    },
};

/// A proposal with its company and plan joined in.
#[derive(Clone, Debug)]
pub struct ProposalView {
    pub proposal: proposal::Model,
    pub company: Option<company::Model>,
    pub plan: Option<plan::Model>,
}

impl Projectable for ProposalView {
    fn proposal(&self) -> &proposal::Model {
        &self.proposal
    }
}

#[derive(Clone, Debug)]
pub struct NewProposalInput {
    pub company_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub line_quantity: i32,
    pub price_per_line_cents: i64,
    pub request_type: Option<RequestType>,
    pub donor_carrier: Option<String>,
    pub product: Option<String>,
    pub notes: Option<String>,
    /// Place the proposal straight into the first sales column.
    pub enter_sales_pipeline: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ProposalFilter {
    pub company_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
}

/// Result of a persisted write. `warnings` lists follow-up writes that
/// failed after the proposal itself was saved.
#[derive(Clone, Debug)]
pub struct WriteOutcome {
    pub proposal: ProposalView,
    pub warnings: Vec<String>,
}

#[instrument(skip(db, actor, input), fields(actor = %actor.user_id, company_id = %input.company_id))]
pub async fn create_proposal(
    db: &DatabaseConnection,
    actor: &Actor,
    input: NewProposalInput,
) -> ServiceResult<WriteOutcome> {
    policy::ensure_can_edit_sales(actor)?;
    let donor_carrier = clean_text(input.donor_carrier);
    let total = validate_terms(&ProposalTerms {
        line_quantity: input.line_quantity,
        price_per_line_cents: input.price_per_line_cents,
        request_type: input.request_type,
        donor_carrier: donor_carrier.as_deref(),
    })?;

    let company = company::Entity::find_by_id(input.company_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("company"))?;
    if let Some(plan_id) = input.plan_id {
        plan::Entity::find_by_id(plan_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("plan"))?;
    }

    let now: DateTimeWithTimeZone = Utc::now().into();
    let id = Uuid::new_v4();
    proposal::ActiveModel {
        id: Set(id),
        company_id: Set(company.id),
        plan_id: Set(input.plan_id),
        seller_id: Set(Some(actor.user_id)),
        line_quantity: Set(input.line_quantity),
        price_per_line_cents: Set(input.price_per_line_cents),
        total_monthly_cents: Set(total),
        status: Set(ProposalStatus::Qualified),
        notes: Set(clean_text(input.notes)),
        product: Set(clean_text(input.product)),
        request_type: Set(input.request_type),
        donor_carrier: Set(donor_carrier),
        sales_status: Set(input
            .enter_sales_pipeline
            .then_some(SalesStatus::ProposalSent)),
        processing_status: Set(None),
        sent_to_processing_at: Set(None),
        operational_status: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(proposal_id = %id, total_monthly_cents = total, "proposal created");

    let mut warnings = Vec::new();
    if company.status == CompanyStatus::Lead {
        let promoted = company::ActiveModel {
            id: Unchanged(company.id),
            status: Set(CompanyStatus::Proposal),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(db)
        .await;
        if let Err(err) = promoted {
            warn!(proposal_id = %id, company_id = %company.id, error = %err, "lead promotion failed");
            warnings.push(format!("company promotion failed: {err}"));
        }
    }

    Ok(WriteOutcome {
        proposal: load_proposal(db, id).await?,
        warnings,
    })
}

pub async fn load_proposal(db: &DatabaseConnection, id: Uuid) -> ServiceResult<ProposalView> {
    load_views(db, proposal::Entity::find_by_id(id))
        .await?
        .into_iter()
        .next()
        .ok_or(ServiceError::NotFound("proposal"))
}

/// Newest first.
pub async fn list_proposals(
    db: &DatabaseConnection,
    filter: &ProposalFilter,
) -> ServiceResult<Vec<ProposalView>> {
    let mut query = proposal::Entity::find();
    if let Some(company_id) = filter.company_id {
        query = query.filter(proposal::Column::CompanyId.eq(company_id));
    }
    if let Some(seller_id) = filter.seller_id {
        query = query.filter(proposal::Column::SellerId.eq(seller_id));
    }
    let query = query
        .order_by_desc(proposal::Column::CreatedAt)
        .order_by_asc(proposal::Column::Id);
    load_views(db, query).await
}

#[instrument(skip(db, actor), fields(actor = %actor.user_id, to = target.key()))]
pub async fn move_sales_status(
    db: &DatabaseConnection,
    actor: &Actor,
    proposal_id: Uuid,
    target: SalesStatus,
) -> ServiceResult<WriteOutcome> {
    run_transition(db, actor, proposal_id, target, transition_sales).await
}

#[instrument(skip(db, actor), fields(actor = %actor.user_id, to = target.key()))]
pub async fn move_processing_status(
    db: &DatabaseConnection,
    actor: &Actor,
    proposal_id: Uuid,
    target: ProcessingStatus,
) -> ServiceResult<WriteOutcome> {
    run_transition(db, actor, proposal_id, target, transition_processing).await
}

#[instrument(skip(db, actor), fields(actor = %actor.user_id, to = target.key()))]
pub async fn move_operational_status(
    db: &DatabaseConnection,
    actor: &Actor,
    proposal_id: Uuid,
    target: OperationalStatus,
) -> ServiceResult<WriteOutcome> {
    run_transition(db, actor, proposal_id, target, transition_operational).await
}

#[instrument(skip(db, actor), fields(actor = %actor.user_id, to = target.key()))]
pub async fn move_legacy_status(
    db: &DatabaseConnection,
    actor: &Actor,
    proposal_id: Uuid,
    target: ProposalStatus,
) -> ServiceResult<WriteOutcome> {
    run_transition(db, actor, proposal_id, target, transition_legacy).await
}

type TransitionFn<S> = fn(
    &proposal::Model,
    S,
    &Actor,
    DateTimeWithTimeZone,
) -> Result<TransitionOutcome, PipelineError>;

async fn run_transition<S: PipelineState>(
    db: &DatabaseConnection,
    actor: &Actor,
    proposal_id: Uuid,
    target: S,
    transition: TransitionFn<S>,
) -> ServiceResult<WriteOutcome> {
    let current = proposal::Entity::find_by_id(proposal_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("proposal"))?;
    let from = S::of(&current).map_or("none", |state| state.key());
    let now: DateTimeWithTimeZone = Utc::now().into();

    let outcome = match transition(&current, target, actor, now) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(
                %proposal_id,
                pipeline = S::PIPELINE.key(),
                from,
                to = target.key(),
                error = %err,
                "transition refused"
            );
            return Err(err.into());
        }
    };

    pipeline_update(&outcome.proposal).update(db).await?;
    info!(
        %proposal_id,
        pipeline = S::PIPELINE.key(),
        from,
        to = target.key(),
        actor = %actor.user_id,
        "proposal moved"
    );

    let mut warnings = Vec::new();
    for effect in &outcome.effects {
        if let Err(err) = apply_effect(db, proposal_id, effect, now).await {
            warn!(%proposal_id, effect = effect_name(effect), error = %err, "side effect failed");
            warnings.push(format!("{} failed: {}", effect_name(effect), err));
        }
    }

    Ok(WriteOutcome {
        proposal: load_proposal(db, proposal_id).await?,
        warnings,
    })
}

/// Writes back only the fields a transition may change.
fn pipeline_update(next: &proposal::Model) -> proposal::ActiveModel {
    proposal::ActiveModel {
        id: Unchanged(next.id),
        status: Set(next.status),
        sales_status: Set(next.sales_status),
        processing_status: Set(next.processing_status),
        sent_to_processing_at: Set(next.sent_to_processing_at),
        operational_status: Set(next.operational_status),
        total_monthly_cents: Set(next.total_monthly_cents),
        updated_at: Set(next.updated_at),
        ..Default::default()
    }
}

async fn apply_effect(
    db: &DatabaseConnection,
    proposal_id: Uuid,
    effect: &SideEffect,
    now: DateTimeWithTimeZone,
) -> Result<(), sea_orm::DbErr> {
    match effect {
        SideEffect::AppendHistory {
            old_status,
            new_status,
            changed_by,
            changed_at,
        } => {
            proposal_status_history::ActiveModel {
                id: Set(Uuid::new_v4()),
                proposal_id: Set(proposal_id),
                old_status: Set(*old_status),
                new_status: Set(*new_status),
                changed_by: Set(Some(*changed_by)),
                changed_at: Set(*changed_at),
            }
            .insert(db)
            .await?;
        }
        SideEffect::CreateContract { start_date } => {
            contract::ActiveModel {
                id: Set(Uuid::new_v4()),
                proposal_id: Set(proposal_id),
                start_date: Set(*start_date),
                end_date: Set(None),
                notes: Set(None),
                created_at: Set(now),
            }
            .insert(db)
            .await?;
        }
        SideEffect::ActivateCompany { company_id } => {
            company::ActiveModel {
                id: Unchanged(*company_id),
                status: Set(CompanyStatus::Active),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(db)
            .await?;
        }
    }
    Ok(())
}

fn effect_name(effect: &SideEffect) -> &'static str {
    match effect {
        SideEffect::AppendHistory { .. } => "status history",
        SideEffect::CreateContract { .. } => "contract creation",
        SideEffect::ActivateCompany { .. } => "company activation",
    }
}

/// Newest first.
pub async fn status_history(
    db: &DatabaseConnection,
    proposal_id: Uuid,
) -> ServiceResult<Vec<proposal_status_history::Model>> {
    Ok(proposal_status_history::Entity::find()
        .filter(proposal_status_history::Column::ProposalId.eq(proposal_id))
        .order_by_desc(proposal_status_history::Column::ChangedAt)
        .all(db)
        .await?)
}

pub async fn pipeline_board<S: PipelineState>(
    db: &DatabaseConnection,
    actor: &Actor,
    columns: &[S],
) -> ServiceResult<Board<S, ProposalView>> {
    policy::ensure_can_view(actor, S::PIPELINE)?;
    let proposals = list_proposals(db, &ProposalFilter::default()).await?;
    Ok(project_board(&proposals, columns))
}

pub async fn processing_board_groups(
    db: &DatabaseConnection,
    actor: &Actor,
) -> ServiceResult<Vec<GroupedBoard<ProposalView>>> {
    policy::ensure_can_view(actor, Pipeline::Processing)?;
    let proposals = list_proposals(db, &ProposalFilter::default()).await?;
    Ok(processing_groups(&proposals))
}

pub async fn pipeline_metrics(db: &DatabaseConnection) -> ServiceResult<PipelineMetrics> {
    let proposals = proposal::Entity::find().all(db).await?;
    let companies = company::Entity::find().count(db).await?;
    Ok(summarize(&proposals, companies))
}

async fn load_views(
    db: &DatabaseConnection,
    query: Select<proposal::Entity>,
) -> ServiceResult<Vec<ProposalView>> {
    let rows = query.find_also_related(company::Entity).all(db).await?;
    let plan_ids: Vec<Uuid> = rows.iter().filter_map(|(p, _)| p.plan_id).collect();
    let plans: HashMap<Uuid, plan::Model> = if plan_ids.is_empty() {
        HashMap::new()
    } else {
        plan::Entity::find()
            .filter(plan::Column::Id.is_in(plan_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|plan| (plan.id, plan))
            .collect()
    };
    Ok(rows
        .into_iter()
        .map(|(proposal, company)| {
            let plan = proposal.plan_id.and_then(|id| plans.get(&id).cloned());
            ProposalView {
                proposal,
                company,
                plan,
            }
        })
        .collect())
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
