use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use entity::Role;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PipelineError;

pub const SESSION_COOKIE: &str = "crm_session";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.jwt_secret.as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.jwt_secret.as_bytes())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub roles: Vec<String>,
    pub exp: usize,
    pub iat: usize,
}

/// The authenticated party behind a request.
///
/// Authorization looks only at the role set. `display_role` mirrors the
/// scalar profile role and is never consulted by policy checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    roles: BTreeSet<Role>,
    pub display_role: Option<Role>,
}

impl Actor {
    pub fn new(
        user_id: Uuid,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<Self, PipelineError> {
        let roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            return Err(PipelineError::invalid("an actor needs at least one role"));
        }
        Ok(Self {
            user_id,
            roles,
            display_role: None,
        })
    }

    pub fn with_display_role(mut self, role: Role) -> Self {
        self.display_role = Some(role);
        self
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }

    pub fn role_keys(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.to_value()).collect()
    }
}

pub fn issue_token(actor: &Actor, config: &AuthConfig) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::minutes(config.session_ttl_minutes))
        .unwrap_or(now)
        .timestamp() as usize;
    let claims = SessionClaims {
        sub: actor.user_id,
        roles: actor.role_keys(),
        exp,
        iat: now.timestamp() as usize,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &config.encoding_key())
}

pub fn decode_token(
    token: &str,
    config: &AuthConfig,
) -> jsonwebtoken::errors::Result<SessionClaims> {
    jsonwebtoken::decode::<SessionClaims>(token, &config.decoding_key(), &Validation::default())
        .map(|data| data.claims)
}
