use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, Enum, Error, ErrorExtensions, ID, InputObject, Object, Schema,
    SimpleObject,
};
use chrono::{DateTime, Utc};
use entity::{
    OperationalStatus, ProcessingStatus, ProposalStatus, SalesStatus, proposal_status_history,
};
use sea_orm::DatabaseConnection;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::{
    auth::{Actor, AuthConfig},
    error::{PipelineError, ServiceError},
    pipeline::{
        board::{Board, GroupedBoard, parse_columns},
        metrics::PipelineMetrics,
        policy::Capabilities,
        vocabulary::{
            Pipeline, PipelineState, ProcessingGroup, company_status_label,
            is_terminal_by_convention, parse_request_type, parse_role, request_type_key, role_key,
            role_label,
        },
    },
    service::{self, ProposalFilter, ProposalView, TeamMember, WriteOutcome},
};

pub type CrmSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub struct AppSchema(pub CrmSchema);

pub fn build_schema(db: Arc<DatabaseConnection>, auth: Arc<AuthConfig>) -> AppSchema {
    let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .data(auth)
        .finish();
    AppSchema(schema)
}

pub struct QueryRoot;
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    async fn crm(&self) -> CrmQuery {
        CrmQuery
    }
}

#[Object]
impl MutationRoot {
    async fn crm(&self) -> CrmMutation {
        CrmMutation
    }
}

#[derive(Default)]
pub struct CrmQuery;

#[derive(Default)]
pub struct CrmMutation;

#[Object]
impl CrmQuery {
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<MePayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let member = service::load_member(db.as_ref(), actor.user_id)
            .await
            .map_err(service_error)?;
        Ok(MePayload {
            user: UserNode::from(member),
            roles: actor.role_keys(),
            capabilities: Capabilities::for_actor(&actor).into(),
        })
    }

    async fn proposals(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "companyId")] company_id: Option<ID>,
        #[graphql(name = "sellerId")] seller_id: Option<ID>,
    ) -> async_graphql::Result<Vec<ProposalNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let filter = ProposalFilter {
            company_id: company_id.as_ref().map(parse_uuid).transpose()?,
            seller_id: seller_id.as_ref().map(parse_uuid).transpose()?,
        };
        let views = service::list_proposals(db.as_ref(), &filter)
            .await
            .map_err(service_error)?;
        Ok(views.into_iter().map(ProposalNode::from).collect())
    }

    async fn proposal(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<ProposalNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        match service::load_proposal(db.as_ref(), parse_uuid(&id)?).await {
            Ok(view) => Ok(Some(view.into())),
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(err) => Err(service_error(err)),
        }
    }

    #[graphql(name = "proposalStatusHistory")]
    async fn proposal_status_history(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "proposalId")] proposal_id: ID,
    ) -> async_graphql::Result<Vec<StatusHistoryNode>> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let rows = service::status_history(db.as_ref(), parse_uuid(&proposal_id)?)
            .await
            .map_err(service_error)?;
        Ok(rows.into_iter().map(StatusHistoryNode::from).collect())
    }

    #[graphql(name = "pipelineBoard")]
    async fn pipeline_board(
        &self,
        ctx: &Context<'_>,
        pipeline: PipelineKind,
        #[graphql(name = "columnKeys")] column_keys: Option<Vec<String>>,
    ) -> async_graphql::Result<PipelineBoardNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let keys = column_keys.unwrap_or_default();
        let span = info_span!(
            "crm.pipelineBoard",
            pipeline = Pipeline::from(pipeline).key(),
            requested_columns = keys.len()
        );
        async {
            match pipeline {
                PipelineKind::Sales => board_for::<SalesStatus>(db.as_ref(), &actor, &keys).await,
                PipelineKind::Processing => {
                    board_for::<ProcessingStatus>(db.as_ref(), &actor, &keys).await
                }
                PipelineKind::Legacy => {
                    board_for::<ProposalStatus>(db.as_ref(), &actor, &keys).await
                }
                PipelineKind::Operational => {
                    board_for::<OperationalStatus>(db.as_ref(), &actor, &keys).await
                }
            }
        }
        .instrument(span)
        .await
    }

    #[graphql(name = "processingBoard")]
    async fn processing_board(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<ProcessingGroupNode>> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let groups = service::processing_board_groups(db.as_ref(), &actor)
            .await
            .map_err(service_error)?;
        Ok(groups.into_iter().map(ProcessingGroupNode::from).collect())
    }

    #[graphql(name = "pipelineMetrics")]
    async fn pipeline_metrics(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<PipelineMetricsNode> {
        current_actor(ctx)?;
        let db = database(ctx)?;
        let metrics = service::pipeline_metrics(db.as_ref())
            .await
            .map_err(service_error)?;
        Ok(metrics.into())
    }

    #[graphql(name = "pipelineVocabulary")]
    async fn pipeline_vocabulary(
        &self,
        ctx: &Context<'_>,
        pipeline: PipelineKind,
    ) -> async_graphql::Result<Vec<PipelineStateNode>> {
        current_actor(ctx)?;
        Ok(match pipeline {
            PipelineKind::Sales => SalesStatus::ordered()
                .iter()
                .map(|s| PipelineStateNode::sales(*s))
                .collect(),
            PipelineKind::Processing => ProcessingStatus::ordered()
                .iter()
                .map(|s| PipelineStateNode::processing(*s))
                .collect(),
            PipelineKind::Legacy => ProposalStatus::ordered()
                .iter()
                .map(|s| PipelineStateNode::legacy(*s))
                .collect(),
            PipelineKind::Operational => OperationalStatus::ordered()
                .iter()
                .map(|s| PipelineStateNode::operational(*s))
                .collect(),
        })
    }
}

#[Object]
impl CrmMutation {
    #[graphql(name = "createProposal")]
    async fn create_proposal(
        &self,
        ctx: &Context<'_>,
        input: NewProposalInput,
    ) -> async_graphql::Result<ProposalPayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let request_type = match input.request_type.as_deref() {
            Some(key) => Some(parse_request_type(key).ok_or_else(|| {
                PipelineError::invalid(format!("unknown request type `{}`", key.trim())).extend()
            })?),
            None => None,
        };
        let input = service::NewProposalInput {
            company_id: parse_uuid(&input.company_id)?,
            plan_id: input.plan_id.as_ref().map(parse_uuid).transpose()?,
            line_quantity: input.line_quantity,
            price_per_line_cents: input.price_per_line_cents,
            request_type,
            donor_carrier: input.donor_carrier,
            product: input.product,
            notes: input.notes,
            enter_sales_pipeline: input.enter_sales_pipeline.unwrap_or(true),
        };
        let outcome = service::create_proposal(db.as_ref(), &actor, input)
            .await
            .map_err(service_error)?;
        Ok(outcome.into())
    }

    #[graphql(name = "moveSalesStatus")]
    async fn move_sales_status(
        &self,
        ctx: &Context<'_>,
        id: ID,
        status: String,
    ) -> async_graphql::Result<ProposalPayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let target = parse_state::<SalesStatus>(&status)?;
        let outcome = service::move_sales_status(db.as_ref(), &actor, parse_uuid(&id)?, target)
            .await
            .map_err(service_error)?;
        Ok(outcome.into())
    }

    #[graphql(name = "moveProcessingStatus")]
    async fn move_processing_status(
        &self,
        ctx: &Context<'_>,
        id: ID,
        status: String,
    ) -> async_graphql::Result<ProposalPayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let target = parse_state::<ProcessingStatus>(&status)?;
        let outcome =
            service::move_processing_status(db.as_ref(), &actor, parse_uuid(&id)?, target)
                .await
                .map_err(service_error)?;
        Ok(outcome.into())
    }

    #[graphql(name = "moveLegacyStatus")]
    async fn move_legacy_status(
        &self,
        ctx: &Context<'_>,
        id: ID,
        status: String,
    ) -> async_graphql::Result<ProposalPayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let target = parse_state::<ProposalStatus>(&status)?;
        let outcome = service::move_legacy_status(db.as_ref(), &actor, parse_uuid(&id)?, target)
            .await
            .map_err(service_error)?;
        Ok(outcome.into())
    }

    #[graphql(name = "moveOperationalStatus")]
    async fn move_operational_status(
        &self,
        ctx: &Context<'_>,
        id: ID,
        status: String,
    ) -> async_graphql::Result<ProposalPayload> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let target = parse_state::<OperationalStatus>(&status)?;
        let outcome =
            service::move_operational_status(db.as_ref(), &actor, parse_uuid(&id)?, target)
                .await
                .map_err(service_error)?;
        Ok(outcome.into())
    }

    #[graphql(name = "createUser")]
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        input: NewUserInput,
    ) -> async_graphql::Result<UserNode> {
        let actor = current_actor(ctx)?;
        let db = database(ctx)?;
        let mut roles = Vec::with_capacity(input.roles.len());
        for key in &input.roles {
            let role = parse_role(key).ok_or_else(|| {
                PipelineError::invalid(format!("unknown role `{}`", key.trim())).extend()
            })?;
            roles.push(role);
        }
        let member = service::provision_user(
            db.as_ref(),
            &actor,
            service::NewUserInput {
                email: input.email,
                full_name: input.full_name,
                roles,
            },
        )
        .await
        .map_err(service_error)?;
        Ok(member.into())
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum PipelineKind {
    #[graphql(name = "SALES")]
    Sales,
    #[graphql(name = "PROCESSING")]
    Processing,
    #[graphql(name = "LEGACY")]
    Legacy,
    #[graphql(name = "OPERATIONAL")]
    Operational,
}

impl From<PipelineKind> for Pipeline {
    fn from(value: PipelineKind) -> Self {
        match value {
            PipelineKind::Sales => Pipeline::Sales,
            PipelineKind::Processing => Pipeline::Processing,
            PipelineKind::Legacy => Pipeline::Legacy,
            PipelineKind::Operational => Pipeline::Operational,
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct NewProposalInput {
    #[graphql(name = "companyId")]
    pub company_id: ID,
    #[graphql(name = "planId")]
    pub plan_id: Option<ID>,
    #[graphql(name = "lineQuantity")]
    pub line_quantity: i32,
    #[graphql(name = "pricePerLineCents")]
    pub price_per_line_cents: i64,
    #[graphql(name = "requestType")]
    pub request_type: Option<String>,
    #[graphql(name = "donorCarrier")]
    pub donor_carrier: Option<String>,
    pub product: Option<String>,
    pub notes: Option<String>,
    /// Defaults to true.
    #[graphql(name = "enterSalesPipeline")]
    pub enter_sales_pipeline: Option<bool>,
}

#[derive(Clone, Debug, InputObject)]
pub struct NewUserInput {
    pub email: String,
    #[graphql(name = "fullName")]
    pub full_name: String,
    pub roles: Vec<String>,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Proposal")]
pub struct ProposalNode {
    pub id: ID,
    #[graphql(name = "companyId")]
    pub company_id: ID,
    #[graphql(name = "companyName")]
    pub company_name: Option<String>,
    #[graphql(name = "companyStatus")]
    pub company_status: Option<String>,
    #[graphql(name = "planId")]
    pub plan_id: Option<ID>,
    #[graphql(name = "planName")]
    pub plan_name: Option<String>,
    #[graphql(name = "sellerId")]
    pub seller_id: Option<ID>,
    #[graphql(name = "lineQuantity")]
    pub line_quantity: i32,
    #[graphql(name = "pricePerLineCents")]
    pub price_per_line_cents: i64,
    #[graphql(name = "totalMonthlyCents")]
    pub total_monthly_cents: i64,
    pub status: String,
    #[graphql(name = "salesStatus")]
    pub sales_status: Option<String>,
    #[graphql(name = "processingStatus")]
    pub processing_status: Option<String>,
    #[graphql(name = "processingGroup")]
    pub processing_group: Option<String>,
    #[graphql(name = "requestType")]
    pub request_type: Option<String>,
    #[graphql(name = "donorCarrier")]
    pub donor_carrier: Option<String>,
    pub product: Option<String>,
    pub notes: Option<String>,
    #[graphql(name = "sentToProcessingAt")]
    pub sent_to_processing_at: Option<DateTime<Utc>>,
    /// Set only for signed proposals; unset reads as `analysis`.
    #[graphql(name = "operationalStatus")]
    pub operational_status: Option<String>,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<ProposalView> for ProposalNode {
    fn from(view: ProposalView) -> Self {
        let ProposalView {
            proposal: model,
            company,
            plan,
        } = view;
        let operational_status = OperationalStatus::of(&model).map(|s| s.key().to_string());
        Self {
            id: ID::from(model.id.to_string()),
            company_id: ID::from(model.company_id.to_string()),
            company_name: company.as_ref().map(|c| c.legal_name.clone()),
            company_status: company
                .as_ref()
                .map(|c| company_status_label(c.status).to_string()),
            plan_id: model.plan_id.map(|id| ID::from(id.to_string())),
            plan_name: plan.map(|p| p.name),
            seller_id: model.seller_id.map(|id| ID::from(id.to_string())),
            line_quantity: model.line_quantity,
            price_per_line_cents: model.price_per_line_cents,
            total_monthly_cents: model.total_monthly_cents,
            status: model.status.key().to_string(),
            sales_status: model.sales_status.map(|s| s.key().to_string()),
            processing_status: model.processing_status.map(|s| s.key().to_string()),
            processing_group: model
                .processing_status
                .map(|s| ProcessingGroup::of(s).key().to_string()),
            request_type: model.request_type.map(|r| request_type_key(r).to_string()),
            donor_carrier: model.donor_carrier,
            product: model.product,
            notes: model.notes,
            sent_to_processing_at: model.sent_to_processing_at.map(Into::into),
            operational_status,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ProposalStatusHistory")]
pub struct StatusHistoryNode {
    pub id: ID,
    #[graphql(name = "proposalId")]
    pub proposal_id: ID,
    #[graphql(name = "oldStatus")]
    pub old_status: Option<String>,
    #[graphql(name = "newStatus")]
    pub new_status: String,
    #[graphql(name = "changedBy")]
    pub changed_by: Option<ID>,
    #[graphql(name = "changedAt")]
    pub changed_at: DateTime<Utc>,
}

impl From<proposal_status_history::Model> for StatusHistoryNode {
    fn from(model: proposal_status_history::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            proposal_id: ID::from(model.proposal_id.to_string()),
            old_status: model.old_status.map(|s| s.key().to_string()),
            new_status: model.new_status.key().to_string(),
            changed_by: model.changed_by.map(|id| ID::from(id.to_string())),
            changed_at: model.changed_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct ProposalPayload {
    pub proposal: ProposalNode,
    /// Follow-up writes that failed after the proposal itself was saved.
    pub warnings: Vec<String>,
}

impl From<WriteOutcome> for ProposalPayload {
    fn from(outcome: WriteOutcome) -> Self {
        Self {
            proposal: outcome.proposal.into(),
            warnings: outcome.warnings,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PipelineState")]
pub struct PipelineStateNode {
    pub key: String,
    pub label: String,
    pub position: i32,
    #[graphql(name = "isTerminal")]
    pub is_terminal: bool,
    pub group: Option<String>,
}

impl PipelineStateNode {
    fn base<S: PipelineState>(state: S) -> Self {
        Self {
            key: state.key().to_string(),
            label: state.label().to_string(),
            position: i32::try_from(state.position()).unwrap_or(i32::MAX),
            is_terminal: false,
            group: None,
        }
    }

    fn sales(state: SalesStatus) -> Self {
        Self {
            is_terminal: state == SalesStatus::SentToProcessing,
            ..Self::base(state)
        }
    }

    fn processing(state: ProcessingStatus) -> Self {
        Self {
            is_terminal: is_terminal_by_convention(state),
            group: Some(ProcessingGroup::of(state).key().to_string()),
            ..Self::base(state)
        }
    }

    fn legacy(state: ProposalStatus) -> Self {
        Self {
            is_terminal: matches!(state, ProposalStatus::Signed | ProposalStatus::Lost),
            ..Self::base(state)
        }
    }

    fn operational(state: OperationalStatus) -> Self {
        Self {
            is_terminal: matches!(
                state,
                OperationalStatus::Completed | OperationalStatus::Cancelled
            ),
            ..Self::base(state)
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PipelineColumn")]
pub struct PipelineColumnNode {
    pub key: String,
    pub label: String,
    #[graphql(name = "totalCount")]
    pub total_count: i32,
    #[graphql(name = "totalValueCents")]
    pub total_value_cents: i64,
    pub proposals: Vec<ProposalNode>,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PipelineBoard")]
pub struct PipelineBoardNode {
    pub pipeline: String,
    pub columns: Vec<PipelineColumnNode>,
    #[graphql(name = "totalCount")]
    pub total_count: i32,
    #[graphql(name = "totalValueCents")]
    pub total_value_cents: i64,
}

impl<S: PipelineState> From<Board<S, ProposalView>> for PipelineBoardNode {
    fn from(board: Board<S, ProposalView>) -> Self {
        let total_count = count_i32(board.total_count());
        let total_value_cents = board.total_value_cents();
        let columns = board
            .columns
            .into_iter()
            .map(|column| PipelineColumnNode {
                key: column.state.key().to_string(),
                label: column.state.label().to_string(),
                total_count: count_i32(column.count()),
                total_value_cents: column.value_cents,
                proposals: column.items.into_iter().map(ProposalNode::from).collect(),
            })
            .collect();
        Self {
            pipeline: S::PIPELINE.key().to_string(),
            columns,
            total_count,
            total_value_cents,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ProcessingGroup")]
pub struct ProcessingGroupNode {
    pub key: String,
    pub label: String,
    pub board: PipelineBoardNode,
}

impl From<GroupedBoard<ProposalView>> for ProcessingGroupNode {
    fn from(grouped: GroupedBoard<ProposalView>) -> Self {
        Self {
            key: grouped.group.key().to_string(),
            label: grouped.group.label().to_string(),
            board: grouped.board.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PipelineMetrics")]
pub struct PipelineMetricsNode {
    #[graphql(name = "openValueCents")]
    pub open_value_cents: i64,
    #[graphql(name = "closedCount")]
    pub closed_count: i64,
    #[graphql(name = "averageValueCents")]
    pub average_value_cents: i64,
    #[graphql(name = "totalCompanies")]
    pub total_companies: i64,
}

impl From<PipelineMetrics> for PipelineMetricsNode {
    fn from(metrics: PipelineMetrics) -> Self {
        Self {
            open_value_cents: metrics.open_value_cents,
            closed_count: i64::try_from(metrics.closed_count).unwrap_or(i64::MAX),
            average_value_cents: metrics.average_value_cents,
            total_companies: i64::try_from(metrics.total_companies).unwrap_or(i64::MAX),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "User")]
pub struct UserNode {
    pub id: ID,
    pub email: String,
    #[graphql(name = "fullName")]
    pub full_name: Option<String>,
    /// Display label only.
    #[graphql(name = "displayRole")]
    pub display_role: String,
    pub roles: Vec<String>,
    /// pt-BR captions, same order as `roles`.
    #[graphql(name = "roleLabels")]
    pub role_labels: Vec<String>,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<TeamMember> for UserNode {
    fn from(member: TeamMember) -> Self {
        Self {
            id: ID::from(member.profile.id.to_string()),
            email: member.profile.email,
            full_name: member.profile.full_name,
            display_role: role_key(member.profile.role).to_string(),
            roles: member
                .roles
                .iter()
                .map(|r| role_key(*r).to_string())
                .collect(),
            role_labels: member
                .roles
                .iter()
                .map(|r| role_label(*r).to_string())
                .collect(),
            created_at: member.profile.created_at.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, SimpleObject)]
#[graphql(name = "Capabilities")]
pub struct CapabilitiesNode {
    #[graphql(name = "canViewSales")]
    pub can_view_sales: bool,
    #[graphql(name = "canViewProcessing")]
    pub can_view_processing: bool,
    #[graphql(name = "canEditSales")]
    pub can_edit_sales: bool,
    #[graphql(name = "canEditProcessing")]
    pub can_edit_processing: bool,
    #[graphql(name = "canManageTeam")]
    pub can_manage_team: bool,
}

impl From<Capabilities> for CapabilitiesNode {
    fn from(caps: Capabilities) -> Self {
        Self {
            can_view_sales: caps.can_view_sales,
            can_view_processing: caps.can_view_processing,
            can_edit_sales: caps.can_edit_sales,
            can_edit_processing: caps.can_edit_processing,
            can_manage_team: caps.can_manage_team,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct MePayload {
    pub user: UserNode,
    pub roles: Vec<String>,
    pub capabilities: CapabilitiesNode,
}

async fn board_for<S: PipelineState>(
    db: &DatabaseConnection,
    actor: &Actor,
    keys: &[String],
) -> async_graphql::Result<PipelineBoardNode> {
    let columns = parse_columns::<S>(keys).map_err(|err| err.extend())?;
    let board = service::pipeline_board(db, actor, &columns)
        .await
        .map_err(service_error)?;
    Ok(board.into())
}

fn parse_state<S: PipelineState>(key: &str) -> async_graphql::Result<S> {
    S::parse(key).ok_or_else(|| {
        PipelineError::invalid(format!(
            "unknown {} status `{}`",
            S::PIPELINE.key(),
            key.trim()
        ))
        .extend()
    })
}

fn count_i32(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn database(ctx: &Context<'_>) -> async_graphql::Result<Arc<DatabaseConnection>> {
    ctx.data::<Arc<DatabaseConnection>>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing database connection"))
}

fn current_actor(ctx: &Context<'_>) -> async_graphql::Result<Actor> {
    ctx.data::<Actor>()
        .cloned()
        .map_err(|_| ServiceError::Unauthenticated.extend())
}

fn parse_uuid(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| PipelineError::invalid("invalid ID").extend())
}

fn service_error(err: ServiceError) -> Error {
    err.extend()
}

fn error_with_code(code: &'static str, message: impl Into<String>) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", code))
}
