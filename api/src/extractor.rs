use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use kernel::model::{
    id::UserId,
    role::{Actor, Role},
};
use shared::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

// 認証は上流で済んでいる前提で、ヘッダから呼び出し元を組み立てる
pub struct AuthorizedUser {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user_id
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }

    pub fn require_mentor(&self) -> Result<(), AppError> {
        self.require(Role::Mentor)
    }

    pub fn require_mentee(&self) -> Result<(), AppError> {
        self.require(Role::Mentee)
    }

    fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::AuthorizationError(format!(
                "this operation is only available to a {role}"
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let user_id = header(USER_ID_HEADER)
            .and_then(|v| v.parse::<UserId>().ok())
            .ok_or(AppError::UnauthenticatedError)?;
        let role = header(USER_ROLE_HEADER)
            .and_then(|v| v.parse::<Role>().ok())
            .ok_or(AppError::UnauthenticatedError)?;

        Ok(Self { user_id, role })
    }
}
