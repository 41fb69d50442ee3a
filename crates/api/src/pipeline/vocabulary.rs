//! Closed state vocabularies for both pipelines, the legacy single status
//! and the post-signature operational follow-up, with the display metadata
//! the boards need.
//!
//! Keys are the persisted strings (the `string_value`s on the entity enums);
//! labels are the pt-BR captions shown to the team.

use std::hash::Hash;

use entity::{
    CompanyStatus, OperationalStatus, ProcessingStatus, ProposalStatus, RequestType, Role,
    SalesStatus, proposal,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Pipeline {
    Sales,
    Processing,
    Legacy,
    Operational,
}

impl Pipeline {
    pub fn key(self) -> &'static str {
        match self {
            Pipeline::Sales => "sales",
            Pipeline::Processing => "processing",
            Pipeline::Legacy => "legacy",
            Pipeline::Operational => "operational",
        }
    }
}

/// A state a proposal can occupy in one pipeline.
pub trait PipelineState: Copy + Eq + Hash + Send + Sync + 'static {
    const PIPELINE: Pipeline;

    /// Every state in display order.
    fn ordered() -> &'static [Self];
    fn key(self) -> &'static str;
    fn label(self) -> &'static str;
    /// The proposal's current position in this pipeline, if it has one.
    fn of(proposal: &proposal::Model) -> Option<Self>;

    /// Columns a board shows when the caller does not pick any.
    fn board_columns() -> &'static [Self] {
        Self::ordered()
    }

    fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ordered().iter().copied().find(|state| state.key() == key)
    }

    fn position(self) -> usize {
        Self::ordered()
            .iter()
            .position(|state| *state == self)
            .unwrap_or(usize::MAX)
    }
}

pub const SALES_ORDER: &[SalesStatus] = &[
    SalesStatus::ProposalSent,
    SalesStatus::AwaitingDocumentation,
    SalesStatus::SentToProcessing,
];

impl PipelineState for SalesStatus {
    const PIPELINE: Pipeline = Pipeline::Sales;

    fn ordered() -> &'static [Self] {
        SALES_ORDER
    }

    fn key(self) -> &'static str {
        match self {
            SalesStatus::ProposalSent => "proposal_sent",
            SalesStatus::AwaitingDocumentation => "awaiting_documentation",
            SalesStatus::SentToProcessing => "sent_to_processing",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SalesStatus::ProposalSent => "Proposta Enviada",
            SalesStatus::AwaitingDocumentation => "AG Documentação",
            SalesStatus::SentToProcessing => "Enviado Bko",
        }
    }

    fn of(proposal: &proposal::Model) -> Option<Self> {
        proposal.sales_status
    }

    /// Accepts the keys written by the first deployment as aliases.
    fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "proposal_sent" | "proposta_enviada" => Some(SalesStatus::ProposalSent),
            "awaiting_documentation" | "ag_documentacao" => {
                Some(SalesStatus::AwaitingDocumentation)
            }
            "sent_to_processing" | "enviado_bko" => Some(SalesStatus::SentToProcessing),
            _ => None,
        }
    }
}

pub const PROCESSING_ORDER: &[ProcessingStatus] = &[
    ProcessingStatus::TrocaCarteira,
    ProcessingStatus::GerarContrato,
    ProcessingStatus::AuditoriaAssinatura,
    ProcessingStatus::PendenteInput,
    ProcessingStatus::ChamadoAberto,
    ProcessingStatus::PendenteEstoque,
    ProcessingStatus::Ativo,
    ProcessingStatus::Instalada,
    ProcessingStatus::Logistica,
    ProcessingStatus::PendenteInstalacao,
    ProcessingStatus::AgPortabilidade,
    ProcessingStatus::AgAutorizacaoSms,
    ProcessingStatus::AnaliseCredito,
    ProcessingStatus::AgValidacao,
    ProcessingStatus::ValidacaoPendente,
    ProcessingStatus::PendenteAssinatura,
    ProcessingStatus::ReprovadoBko,
    ProcessingStatus::ParaCorrecao,
    ProcessingStatus::ReprovadoTrocaCarteira,
    ProcessingStatus::CreditoReprovado,
    ProcessingStatus::Cancelado,
    ProcessingStatus::AgFaturamento,
];

/// Processing state every handed-off proposal starts in.
pub const PROCESSING_ENTRY: ProcessingStatus = ProcessingStatus::TrocaCarteira;

/// Processing state that counts a proposal as closed.
pub const PROCESSING_ACTIVE: ProcessingStatus = ProcessingStatus::Ativo;

impl PipelineState for ProcessingStatus {
    const PIPELINE: Pipeline = Pipeline::Processing;

    fn ordered() -> &'static [Self] {
        PROCESSING_ORDER
    }

    fn key(self) -> &'static str {
        match self {
            ProcessingStatus::TrocaCarteira => "troca_carteira",
            ProcessingStatus::GerarContrato => "gerar_contrato",
            ProcessingStatus::AuditoriaAssinatura => "auditoria_assinatura",
            ProcessingStatus::PendenteInput => "pendente_input",
            ProcessingStatus::ChamadoAberto => "chamado_aberto",
            ProcessingStatus::PendenteEstoque => "pendente_estoque",
            ProcessingStatus::Ativo => "ativo",
            ProcessingStatus::Instalada => "instalada",
            ProcessingStatus::Logistica => "logistica",
            ProcessingStatus::PendenteInstalacao => "pendente_instalacao",
            ProcessingStatus::AgPortabilidade => "ag_portabilidade",
            ProcessingStatus::AgAutorizacaoSms => "ag_autorizacao_sms",
            ProcessingStatus::AnaliseCredito => "analise_credito",
            ProcessingStatus::AgValidacao => "ag_validacao",
            ProcessingStatus::ValidacaoPendente => "validacao_pendente",
            ProcessingStatus::PendenteAssinatura => "pendente_assinatura",
            ProcessingStatus::ReprovadoBko => "reprovado_bko",
            ProcessingStatus::ParaCorrecao => "para_correcao",
            ProcessingStatus::ReprovadoTrocaCarteira => "reprovado_troca_carteira",
            ProcessingStatus::CreditoReprovado => "credito_reprovado",
            ProcessingStatus::Cancelado => "cancelado",
            ProcessingStatus::AgFaturamento => "ag_faturamento",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ProcessingStatus::TrocaCarteira => "Troca de Carteira",
            ProcessingStatus::GerarContrato => "Gerar Contrato",
            ProcessingStatus::AuditoriaAssinatura => "Auditoria / Assinatura",
            ProcessingStatus::PendenteInput => "Pendente Input",
            ProcessingStatus::ChamadoAberto => "Chamado Aberto",
            ProcessingStatus::PendenteEstoque => "Pendente Estoque",
            ProcessingStatus::Ativo => "Ativo",
            ProcessingStatus::Instalada => "Instalada",
            ProcessingStatus::Logistica => "Logística",
            ProcessingStatus::PendenteInstalacao => "Pendente Instalação",
            ProcessingStatus::AgPortabilidade => "AG Portabilidade",
            ProcessingStatus::AgAutorizacaoSms => "AG Autorização SMS-Cliente",
            ProcessingStatus::AnaliseCredito => "Análise de Crédito",
            ProcessingStatus::AgValidacao => "Ag Validação",
            ProcessingStatus::ValidacaoPendente => "Validação Pendente",
            ProcessingStatus::PendenteAssinatura => "Pendente Assinatura",
            ProcessingStatus::ReprovadoBko => "Reprovado Bko",
            ProcessingStatus::ParaCorrecao => "Para Correção",
            ProcessingStatus::ReprovadoTrocaCarteira => "Reprovado Troca de Carteira",
            ProcessingStatus::CreditoReprovado => "Crédito Reprovado",
            ProcessingStatus::Cancelado => "Cancelado",
            ProcessingStatus::AgFaturamento => "AG Faturamento",
        }
    }

    fn of(proposal: &proposal::Model) -> Option<Self> {
        proposal.processing_status
    }
}

/// End states by business meaning only; transitions out of them stay legal.
pub fn is_terminal_by_convention(status: ProcessingStatus) -> bool {
    matches!(
        status,
        ProcessingStatus::Ativo
            | ProcessingStatus::Cancelado
            | ProcessingStatus::CreditoReprovado
            | ProcessingStatus::ReprovadoBko
            | ProcessingStatus::ReprovadoTrocaCarteira
    )
}

/// Presentation buckets for the processing board. No ordering is enforced
/// between groups.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ProcessingGroup {
    Documentation,
    Analysis,
    PendingItems,
    Operational,
    Completion,
    Correction,
}

impl ProcessingGroup {
    pub const ALL: [ProcessingGroup; 6] = [
        ProcessingGroup::Documentation,
        ProcessingGroup::Analysis,
        ProcessingGroup::PendingItems,
        ProcessingGroup::Operational,
        ProcessingGroup::Completion,
        ProcessingGroup::Correction,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ProcessingGroup::Documentation => "documentation",
            ProcessingGroup::Analysis => "analysis",
            ProcessingGroup::PendingItems => "pending_items",
            ProcessingGroup::Operational => "operational",
            ProcessingGroup::Completion => "completion",
            ProcessingGroup::Correction => "correction",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcessingGroup::Documentation => "Documentação",
            ProcessingGroup::Analysis => "Análise",
            ProcessingGroup::PendingItems => "Pendências",
            ProcessingGroup::Operational => "Operacional",
            ProcessingGroup::Completion => "Conclusão",
            ProcessingGroup::Correction => "Correções",
        }
    }

    pub fn members(self) -> &'static [ProcessingStatus] {
        use ProcessingStatus::*;
        match self {
            ProcessingGroup::Documentation => &[TrocaCarteira, GerarContrato, AuditoriaAssinatura],
            ProcessingGroup::Analysis => &[AnaliseCredito, AgValidacao, ValidacaoPendente],
            ProcessingGroup::PendingItems => &[
                PendenteInput,
                PendenteEstoque,
                PendenteAssinatura,
                PendenteInstalacao,
            ],
            ProcessingGroup::Operational => {
                &[AgPortabilidade, AgAutorizacaoSms, Logistica, ChamadoAberto]
            }
            ProcessingGroup::Completion => &[Ativo, Instalada, AgFaturamento],
            ProcessingGroup::Correction => &[
                ReprovadoBko,
                ParaCorrecao,
                ReprovadoTrocaCarteira,
                CreditoReprovado,
                Cancelado,
            ],
        }
    }

    pub fn of(status: ProcessingStatus) -> ProcessingGroup {
        Self::ALL
            .into_iter()
            .find(|group| group.members().contains(&status))
            .unwrap_or(ProcessingGroup::Correction)
    }
}

pub const LEGACY_ORDER: &[ProposalStatus] = &[
    ProposalStatus::Qualified,
    ProposalStatus::Diagnosis,
    ProposalStatus::Sent,
    ProposalStatus::Negotiation,
    ProposalStatus::Signed,
    ProposalStatus::Lost,
];

impl PipelineState for ProposalStatus {
    const PIPELINE: Pipeline = Pipeline::Legacy;

    fn ordered() -> &'static [Self] {
        LEGACY_ORDER
    }

    fn key(self) -> &'static str {
        match self {
            ProposalStatus::Qualified => "qualified",
            ProposalStatus::Diagnosis => "diagnosis",
            ProposalStatus::Sent => "sent",
            ProposalStatus::Negotiation => "negotiation",
            ProposalStatus::Signed => "signed",
            ProposalStatus::Lost => "lost",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ProposalStatus::Qualified => "Lead Qualificado",
            ProposalStatus::Diagnosis => "Diagnóstico",
            ProposalStatus::Sent => "Proposta Enviada",
            ProposalStatus::Negotiation => "Negociação",
            ProposalStatus::Signed => "Contrato Assinado",
            ProposalStatus::Lost => "Perdido",
        }
    }

    fn of(proposal: &proposal::Model) -> Option<Self> {
        Some(proposal.status)
    }
}

pub const OPERATIONAL_ORDER: &[OperationalStatus] = &[
    OperationalStatus::Analysis,
    OperationalStatus::Documentation,
    OperationalStatus::Activation,
    OperationalStatus::Completed,
    OperationalStatus::Cancelled,
];

/// Where a signed proposal sits before anyone has moved it.
pub const OPERATIONAL_ENTRY: OperationalStatus = OperationalStatus::Analysis;

impl PipelineState for OperationalStatus {
    const PIPELINE: Pipeline = Pipeline::Operational;

    fn ordered() -> &'static [Self] {
        OPERATIONAL_ORDER
    }

    /// Cancelled follow-ups drop off the default board.
    fn board_columns() -> &'static [Self] {
        &OPERATIONAL_ORDER[..4]
    }

    fn key(self) -> &'static str {
        match self {
            OperationalStatus::Analysis => "analysis",
            OperationalStatus::Documentation => "documentation",
            OperationalStatus::Activation => "activation",
            OperationalStatus::Completed => "completed",
            OperationalStatus::Cancelled => "cancelled",
        }
    }

    fn label(self) -> &'static str {
        match self {
            OperationalStatus::Analysis => "Análise",
            OperationalStatus::Documentation => "Documentação",
            OperationalStatus::Activation => "Ativação",
            OperationalStatus::Completed => "Concluído",
            OperationalStatus::Cancelled => "Cancelado",
        }
    }

    /// Only signed proposals are followed up; an unset status reads as the
    /// entry state.
    fn of(proposal: &proposal::Model) -> Option<Self> {
        (proposal.status == ProposalStatus::Signed)
            .then(|| proposal.operational_status.unwrap_or(OPERATIONAL_ENTRY))
    }
}

pub fn company_status_label(status: CompanyStatus) -> &'static str {
    match status {
        CompanyStatus::Lead => "Lead",
        CompanyStatus::Proposal => "Em Proposta",
        CompanyStatus::Active => "Cliente Ativo",
        CompanyStatus::Lost => "Perdido",
    }
}

pub fn request_type_key(request_type: RequestType) -> &'static str {
    match request_type {
        RequestType::Portability => "portability",
        RequestType::NewLine => "new_line",
        RequestType::Migration => "migration",
    }
}

pub fn parse_request_type(key: &str) -> Option<RequestType> {
    match key.trim() {
        "portability" => Some(RequestType::Portability),
        "new_line" => Some(RequestType::NewLine),
        "migration" => Some(RequestType::Migration),
        _ => None,
    }
}

pub fn role_key(role: Role) -> &'static str {
    match role {
        Role::Seller => "seller",
        Role::Manager => "manager",
        Role::Supervisor => "supervisor",
        Role::PostSale => "post_sale",
        Role::Backoffice => "backoffice",
    }
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::Seller => "Vendedor",
        Role::Manager => "Gestor",
        Role::Supervisor => "Supervisor",
        Role::PostSale => "Pós-Venda",
        Role::Backoffice => "Backoffice",
    }
}

pub fn parse_role(key: &str) -> Option<Role> {
    match key.trim() {
        "seller" => Some(Role::Seller),
        "manager" => Some(Role::Manager),
        "supervisor" => Some(Role::Supervisor),
        "post_sale" => Some(Role::PostSale),
        "backoffice" => Some(Role::Backoffice),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use sea_orm::{ActiveEnum, Iterable};

    use super::*;

    #[test]
    fn processing_vocabulary_has_22_distinct_states() {
        let keys: HashSet<_> = PROCESSING_ORDER.iter().map(|s| s.key()).collect();
        assert_eq!(PROCESSING_ORDER.len(), 22);
        assert_eq!(keys.len(), 22);
        assert_eq!(PROCESSING_ORDER[0], PROCESSING_ENTRY);
    }

    #[test]
    fn keys_match_persisted_values() {
        for status in ProcessingStatus::iter() {
            assert_eq!(status.key(), status.to_value());
        }
        for status in SalesStatus::iter() {
            assert_eq!(status.key(), status.to_value());
        }
        for status in ProposalStatus::iter() {
            assert_eq!(status.key(), status.to_value());
        }
        for status in OperationalStatus::iter() {
            assert_eq!(status.key(), status.to_value());
        }
        for role in Role::iter() {
            assert_eq!(role_key(role), role.to_value());
        }
    }

    #[test]
    fn every_processing_state_belongs_to_exactly_one_group() {
        for status in PROCESSING_ORDER {
            let owners = ProcessingGroup::ALL
                .iter()
                .filter(|group| group.members().contains(status))
                .count();
            assert_eq!(owners, 1, "{} sits in {} groups", status.key(), owners);
        }
        let grouped: usize = ProcessingGroup::ALL.iter().map(|g| g.members().len()).sum();
        assert_eq!(grouped, PROCESSING_ORDER.len());
    }

    #[test]
    fn sales_parse_accepts_historical_keys() {
        assert_eq!(SalesStatus::parse("enviado_bko"), Some(SalesStatus::SentToProcessing));
        assert_eq!(
            SalesStatus::parse(" awaiting_documentation "),
            Some(SalesStatus::AwaitingDocumentation)
        );
        assert_eq!(SalesStatus::parse("troca_carteira"), None);
    }

    #[test]
    fn operational_board_hides_cancelled_by_default() {
        assert_eq!(OperationalStatus::ordered().len(), 5);
        assert!(!OperationalStatus::board_columns().contains(&OperationalStatus::Cancelled));
        assert_eq!(OperationalStatus::board_columns()[0], OPERATIONAL_ENTRY);
        assert_eq!(SalesStatus::board_columns(), SALES_ORDER);
    }

    #[test]
    fn role_labels_cover_every_role() {
        assert_eq!(role_label(Role::PostSale), "Pós-Venda");
        for role in Role::iter() {
            assert!(!role_label(role).is_empty());
        }
    }

    #[test]
    fn terminal_states_are_flagged() {
        assert!(is_terminal_by_convention(ProcessingStatus::Ativo));
        assert!(is_terminal_by_convention(ProcessingStatus::Cancelado));
        assert!(!is_terminal_by_convention(ProcessingStatus::Logistica));
        assert_eq!(ProcessingGroup::of(ProcessingStatus::Ativo), ProcessingGroup::Completion);
    }
}
