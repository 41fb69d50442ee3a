//! Deterministic demo data for local development and tests.

use chrono::{NaiveDate, TimeZone, Utc};
use entity::{
    CompanyStatus, OperationalStatus, ProcessingStatus, ProposalStatus, RequestType, Role,
    SalesStatus, company, contract, plan, profile, proposal, proposal_status_history, user_role,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SeededRecords {
    pub profiles: Vec<profile::Model>,
    pub companies: Vec<company::Model>,
    pub plans: Vec<plan::Model>,
    pub proposals: Vec<proposal::Model>,
}

impl SeededRecords {
    pub fn profile_email(&self, email: &str) -> Option<&profile::Model> {
        self.profiles.iter().find(|p| p.email == email)
    }

    pub fn company_named(&self, legal_name: &str) -> Option<&company::Model> {
        self.companies.iter().find(|c| c.legal_name == legal_name)
    }

    pub fn plan_named(&self, name: &str) -> Option<&plan::Model> {
        self.plans.iter().find(|p| p.name == name)
    }

    /// Proposals carry no title, so they are looked up by their note.
    pub fn proposal_noted(&self, note: &str) -> Option<&proposal::Model> {
        self.proposals
            .iter()
            .find(|p| p.notes.as_deref() == Some(note))
    }
}

pub const MANAGER_EMAIL: &str = "gestor@crm.test";
pub const SELLER_EMAIL: &str = "vendedor@crm.test";
pub const BACKOFFICE_EMAIL: &str = "backoffice@crm.test";

pub async fn seed_demo(db: &DatabaseConnection) -> Result<SeededRecords, DbErr> {
    let day_one = timestamp(2025, 1, 6)?;
    let manager = insert_seed_profile(db, MANAGER_EMAIL, "Marina Gestora", &[Role::Manager], day_one)
        .await?;
    let seller = insert_seed_profile(
        db,
        SELLER_EMAIL,
        "Sergio Vendedor",
        &[Role::Seller],
        day_one,
    )
    .await?;
    let backoffice = insert_seed_profile(
        db,
        BACKOFFICE_EMAIL,
        "Bianca Backoffice",
        &[Role::Backoffice],
        day_one,
    )
    .await?;

    let alfa = insert_seed_company(
        db,
        "Alfa Telecom Ltda",
        "11.222.333/0001-44",
        CompanyStatus::Lead,
        seller.id,
        day_one,
    )
    .await?;
    let beta = insert_seed_company(
        db,
        "Beta Logística S.A.",
        "22.333.444/0001-55",
        CompanyStatus::Proposal,
        seller.id,
        day_one,
    )
    .await?;
    let gama = insert_seed_company(
        db,
        "Gama Varejo Ltda",
        "33.444.555/0001-66",
        CompanyStatus::Active,
        seller.id,
        day_one,
    )
    .await?;

    let smart = plan::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Smart Empresas 20GB".into()),
        carrier: Set(Some("Vivo".into())),
        base_price_cents: Set(4_990),
        notes: Set(None),
        active: Set(true),
        request_type: Set(None),
        created_at: Set(day_one),
    }
    .insert(db)
    .await?;
    let max = plan::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Smart Empresas 50GB".into()),
        carrier: Set(Some("Vivo".into())),
        base_price_cents: Set(7_990),
        notes: Set(Some("Inclui gestor de frota".into())),
        active: Set(true),
        request_type: Set(Some(RequestType::Portability)),
        created_at: Set(day_one),
    }
    .insert(db)
    .await?;

    let mut proposals = Vec::new();
    proposals.push(
        SeedProposal {
            company: &alfa,
            plan: None,
            seller: seller.id,
            line_quantity: 10,
            price_per_line_cents: 2_550,
            status: ProposalStatus::Sent,
            request_type: Some(RequestType::NewLine),
            donor_carrier: None,
            sales_status: Some(SalesStatus::ProposalSent),
            processing_status: None,
            operational: None,
            note: "Alfa - linhas novas",
            created_at: timestamp(2025, 1, 10)?,
        }
        .insert(db)
        .await?,
    );
    proposals.push(
        SeedProposal {
            company: &beta,
            plan: Some(&smart),
            seller: seller.id,
            line_quantity: 5,
            price_per_line_cents: 4_990,
            status: ProposalStatus::Negotiation,
            request_type: Some(RequestType::Portability),
            donor_carrier: Some("Claro"),
            sales_status: Some(SalesStatus::AwaitingDocumentation),
            processing_status: None,
            operational: None,
            note: "Beta - portabilidade",
            created_at: timestamp(2025, 1, 11)?,
        }
        .insert(db)
        .await?,
    );
    let gama_signed = SeedProposal {
        company: &gama,
        plan: Some(&max),
        seller: seller.id,
        line_quantity: 20,
        price_per_line_cents: 7_990,
        status: ProposalStatus::Signed,
        request_type: Some(RequestType::Portability),
        donor_carrier: Some("TIM"),
        sales_status: Some(SalesStatus::SentToProcessing),
        processing_status: Some(ProcessingStatus::Ativo),
        operational: Some(OperationalStatus::Activation),
        note: "Gama - frota completa",
        created_at: timestamp(2025, 1, 12)?,
    }
    .insert(db)
    .await?;
    proposals.push(gama_signed.clone());
    proposals.push(
        SeedProposal {
            company: &beta,
            plan: Some(&smart),
            seller: manager.id,
            line_quantity: 8,
            price_per_line_cents: 4_990,
            status: ProposalStatus::Qualified,
            request_type: Some(RequestType::Migration),
            donor_carrier: None,
            sales_status: Some(SalesStatus::SentToProcessing),
            processing_status: Some(ProcessingStatus::AnaliseCredito),
            operational: None,
            note: "Beta - migração filial",
            created_at: timestamp(2025, 1, 13)?,
        }
        .insert(db)
        .await?,
    );
    proposals.push(
        SeedProposal {
            company: &alfa,
            plan: None,
            seller: seller.id,
            line_quantity: 3,
            price_per_line_cents: 3_000,
            status: ProposalStatus::Qualified,
            request_type: None,
            donor_carrier: None,
            sales_status: None,
            processing_status: None,
            operational: None,
            note: "Alfa - diretoria",
            created_at: timestamp(2025, 1, 14)?,
        }
        .insert(db)
        .await?,
    );

    proposal_status_history::ActiveModel {
        id: Set(Uuid::new_v4()),
        proposal_id: Set(gama_signed.id),
        old_status: Set(Some(ProposalStatus::Negotiation)),
        new_status: Set(ProposalStatus::Signed),
        changed_by: Set(Some(seller.id)),
        changed_at: Set(gama_signed.updated_at),
    }
    .insert(db)
    .await?;
    contract::ActiveModel {
        id: Set(Uuid::new_v4()),
        proposal_id: Set(gama_signed.id),
        start_date: Set(naive_date(2025, 1, 12)?),
        end_date: Set(None),
        notes: Set(None),
        created_at: Set(gama_signed.updated_at),
    }
    .insert(db)
    .await?;

    Ok(SeededRecords {
        profiles: vec![manager, seller, backoffice],
        companies: vec![alfa, beta, gama],
        plans: vec![smart, max],
        proposals,
    })
}

struct SeedProposal<'a> {
    company: &'a company::Model,
    plan: Option<&'a plan::Model>,
    seller: Uuid,
    line_quantity: i32,
    price_per_line_cents: i64,
    status: ProposalStatus,
    request_type: Option<RequestType>,
    donor_carrier: Option<&'a str>,
    sales_status: Option<SalesStatus>,
    processing_status: Option<ProcessingStatus>,
    operational: Option<OperationalStatus>,
    note: &'a str,
    created_at: DateTimeWithTimeZone,
}

impl SeedProposal<'_> {
    async fn insert(self, db: &DatabaseConnection) -> Result<proposal::Model, DbErr> {
        let handed_off = self.processing_status.map(|_| self.created_at);
        proposal::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(self.company.id),
            plan_id: Set(self.plan.map(|p| p.id)),
            seller_id: Set(Some(self.seller)),
            line_quantity: Set(self.line_quantity),
            price_per_line_cents: Set(self.price_per_line_cents),
            total_monthly_cents: Set(i64::from(self.line_quantity) * self.price_per_line_cents),
            status: Set(self.status),
            notes: Set(Some(self.note.to_string())),
            product: Set(self.plan.map(|p| p.name.clone())),
            request_type: Set(self.request_type),
            donor_carrier: Set(self.donor_carrier.map(str::to_string)),
            sales_status: Set(self.sales_status),
            processing_status: Set(self.processing_status),
            sent_to_processing_at: Set(handed_off),
            operational_status: Set(self.operational),
            created_at: Set(self.created_at),
            updated_at: Set(self.created_at),
        }
        .insert(db)
        .await
    }
}

async fn insert_seed_profile(
    db: &DatabaseConnection,
    email: &str,
    full_name: &str,
    roles: &[Role],
    created_at: DateTimeWithTimeZone,
) -> Result<profile::Model, DbErr> {
    let display_role = if roles.contains(&Role::Manager) {
        Role::Manager
    } else {
        Role::Seller
    };
    let model = profile::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        full_name: Set(Some(full_name.to_string())),
        role: Set(display_role),
        created_at: Set(created_at),
    }
    .insert(db)
    .await?;
    for role in roles {
        user_role::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(model.id),
            role: Set(*role),
            created_by: Set(None),
            created_at: Set(created_at),
        }
        .insert(db)
        .await?;
    }
    Ok(model)
}

async fn insert_seed_company(
    db: &DatabaseConnection,
    legal_name: &str,
    cnpj: &str,
    status: CompanyStatus,
    owner: Uuid,
    created_at: DateTimeWithTimeZone,
) -> Result<company::Model, DbErr> {
    company::ActiveModel {
        id: Set(Uuid::new_v4()),
        legal_name: Set(legal_name.to_string()),
        cnpj: Set(cnpj.to_string()),
        segment: Set(None),
        estimated_lines: Set(None),
        status: Set(status),
        owner_id: Set(Some(owner)),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
}

fn naive_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, DbErr> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DbErr::Custom(format!("invalid seed date {year}-{month}-{day}")))
}

fn timestamp(year: i32, month: u32, day: u32) -> Result<DateTimeWithTimeZone, DbErr> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .map(Into::into)
        .ok_or_else(|| DbErr::Custom(format!("invalid seed timestamp {year}-{month}-{day}")))
}
