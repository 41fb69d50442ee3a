use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "proposals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub company_id: Uuid,
    pub plan_id: Option<Uuid>,
    #[sea_orm(indexed)]
    pub seller_id: Option<Uuid>,
    pub line_quantity: i32,
    pub price_per_line_cents: i64,
    pub total_monthly_cents: i64,
    pub status: ProposalStatus,
    pub notes: Option<String>,
    pub product: Option<String>,
    pub request_type: Option<RequestType>,
    pub donor_carrier: Option<String>,
    pub sales_status: Option<SalesStatus>,
    pub processing_status: Option<ProcessingStatus>,
    pub sent_to_processing_at: Option<DateTimeWithTimeZone>,
    /// Post-signature follow-up; only meaningful once `status` is signed.
    pub operational_status: Option<OperationalStatus>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id"
    )]
    Plan,
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::SellerId",
        to = "super::profile::Column::Id"
    )]
    Seller,
    #[sea_orm(has_many = "super::proposal_status_history::Entity")]
    StatusHistory,
    #[sea_orm(has_many = "super::contract::Entity")]
    Contract,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::proposal_status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

/// Single-pipeline status used before the sales/processing split.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum ProposalStatus {
    #[sea_orm(string_value = "qualified")]
    Qualified,
    #[sea_orm(string_value = "diagnosis")]
    Diagnosis,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "negotiation")]
    Negotiation,
    #[sea_orm(string_value = "signed")]
    Signed,
    #[sea_orm(string_value = "lost")]
    Lost,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum RequestType {
    #[sea_orm(string_value = "portability")]
    Portability,
    #[sea_orm(string_value = "new_line")]
    NewLine,
    #[sea_orm(string_value = "migration")]
    Migration,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum SalesStatus {
    #[sea_orm(string_value = "proposal_sent")]
    ProposalSent,
    #[sea_orm(string_value = "awaiting_documentation")]
    AwaitingDocumentation,
    #[sea_orm(string_value = "sent_to_processing")]
    SentToProcessing,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum ProcessingStatus {
    #[sea_orm(string_value = "troca_carteira")]
    TrocaCarteira,
    #[sea_orm(string_value = "gerar_contrato")]
    GerarContrato,
    #[sea_orm(string_value = "auditoria_assinatura")]
    AuditoriaAssinatura,
    #[sea_orm(string_value = "pendente_input")]
    PendenteInput,
    #[sea_orm(string_value = "chamado_aberto")]
    ChamadoAberto,
    #[sea_orm(string_value = "pendente_estoque")]
    PendenteEstoque,
    #[sea_orm(string_value = "ativo")]
    Ativo,
    #[sea_orm(string_value = "instalada")]
    Instalada,
    #[sea_orm(string_value = "logistica")]
    Logistica,
    #[sea_orm(string_value = "pendente_instalacao")]
    PendenteInstalacao,
    #[sea_orm(string_value = "ag_portabilidade")]
    AgPortabilidade,
    #[sea_orm(string_value = "ag_autorizacao_sms")]
    AgAutorizacaoSms,
    #[sea_orm(string_value = "analise_credito")]
    AnaliseCredito,
    #[sea_orm(string_value = "ag_validacao")]
    AgValidacao,
    #[sea_orm(string_value = "validacao_pendente")]
    ValidacaoPendente,
    #[sea_orm(string_value = "pendente_assinatura")]
    PendenteAssinatura,
    #[sea_orm(string_value = "reprovado_bko")]
    ReprovadoBko,
    #[sea_orm(string_value = "para_correcao")]
    ParaCorrecao,
    #[sea_orm(string_value = "reprovado_troca_carteira")]
    ReprovadoTrocaCarteira,
    #[sea_orm(string_value = "credito_reprovado")]
    CreditoReprovado,
    #[sea_orm(string_value = "cancelado")]
    Cancelado,
    #[sea_orm(string_value = "ag_faturamento")]
    AgFaturamento,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum OperationalStatus {
    #[sea_orm(string_value = "analysis")]
    Analysis,
    #[sea_orm(string_value = "documentation")]
    Documentation,
    #[sea_orm(string_value = "activation")]
    Activation,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl ActiveModelBehavior for ActiveModel {}
