use chrono::Utc;
use entity::{Role, profile, user_role};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, prelude::DateTimeWithTimeZone,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::Actor,
    error::{PipelineError, ServiceError, ServiceResult},
    pipeline::policy,
};

#[derive(Clone, Debug)]
pub struct NewUserInput {
    pub email: String,
    pub full_name: String,
    pub roles: Vec<Role>,
}

#[derive(Clone, Debug)]
pub struct TeamMember {
    pub profile: profile::Model,
    pub roles: Vec<Role>,
}

/// Creates the profile and role rows for a new team member. Login
/// credentials are issued by the identity provider, not here.
#[instrument(skip(db, actor, input), fields(actor = %actor.user_id))]
pub async fn provision_user(
    db: &DatabaseConnection,
    actor: &Actor,
    input: NewUserInput,
) -> ServiceResult<TeamMember> {
    policy::ensure_can_manage_team(actor)?;
    let email = normalize_email(&input.email)?;
    let full_name = validate_full_name(&input.full_name)?;
    let mut roles: Vec<Role> = Vec::new();
    for role in input.roles {
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    if roles.is_empty() {
        return Err(PipelineError::invalid("roles must include at least one entry").into());
    }
    let display_role = if roles.contains(&Role::Manager) {
        Role::Manager
    } else {
        Role::Seller
    };

    let now: DateTimeWithTimeZone = Utc::now().into();
    let user_id = Uuid::new_v4();
    let txn = db.begin().await?;
    let profile = profile::ActiveModel {
        id: Set(user_id),
        email: Set(email),
        full_name: Set(Some(full_name)),
        role: Set(display_role),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;
    for role in &roles {
        user_role::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            role: Set(*role),
            created_by: Set(Some(actor.user_id)),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    info!(%user_id, roles = roles.len(), "team member provisioned");
    Ok(TeamMember { profile, roles })
}

/// Resolves a user id into an `Actor`. A missing profile or an empty role
/// set both mean the caller is not signed in as anyone we know.
pub async fn load_actor(db: &DatabaseConnection, user_id: Uuid) -> ServiceResult<Actor> {
    let profile = profile::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::Unauthenticated)?;
    let roles = load_roles(db, user_id).await?;
    Actor::new(user_id, roles)
        .map(|actor| actor.with_display_role(profile.role))
        .map_err(|_| ServiceError::Unauthenticated)
}

pub async fn load_member(db: &DatabaseConnection, user_id: Uuid) -> ServiceResult<TeamMember> {
    let profile = profile::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("user"))?;
    let roles = load_roles(db, user_id).await?;
    Ok(TeamMember { profile, roles })
}

async fn load_roles(db: &DatabaseConnection, user_id: Uuid) -> ServiceResult<Vec<Role>> {
    Ok(user_role::Entity::find()
        .filter(user_role::Column::UserId.eq(user_id))
        .order_by_asc(user_role::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.role)
        .collect())
}

fn normalize_email(value: &str) -> Result<String, PipelineError> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(PipelineError::invalid("invalid email address"));
    }
    Ok(trimmed)
}

fn validate_full_name(value: &str) -> Result<String, PipelineError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::invalid("full name is required"));
    }
    if trimmed.chars().count() > 100 {
        return Err(PipelineError::invalid("full name must be <= 100 characters"));
    }
    Ok(trimmed.to_string())
}
