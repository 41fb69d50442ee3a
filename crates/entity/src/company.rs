use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub legal_name: String,
    #[sea_orm(unique)]
    pub cnpj: String,
    pub segment: Option<String>,
    pub estimated_lines: Option<i32>,
    pub status: CompanyStatus,
    #[sea_orm(indexed)]
    pub owner_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Proposal,
    Owner,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Proposal => Entity::has_many(super::proposal::Entity).into(),
            Self::Owner => Entity::belongs_to(super::profile::Entity)
                .from(Column::OwnerId)
                .to(super::profile::Column::Id)
                .into(),
        }
    }
}

impl Related<super::proposal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposal.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Hash)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum CompanyStatus {
    #[sea_orm(string_value = "lead")]
    Lead,
    #[sea_orm(string_value = "proposal")]
    Proposal,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "lost")]
    Lost,
}

impl ActiveModelBehavior for ActiveModel {}
