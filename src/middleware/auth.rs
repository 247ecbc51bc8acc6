//! Autenticación JWT
//!
//! `AuthenticatedUser` se extrae del header `Authorization: Bearer <token>`.
//! Los permisos por rol se comprueban en cada handler con `authorize`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::{
    models::auth::{Role, RoleSet},
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token, JwtConfig},
    },
};

/// Usuario autenticado que se inyecta en los handlers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub role: Role,
}

impl AuthenticatedUser {
    /// 403 si el rol no está en el conjunto permitido
    pub fn authorize(&self, allowed: &RoleSet) -> Result<(), AppError> {
        if allowed.allows(self.role) {
            Ok(())
        } else {
            tracing::warn!(
                "🚫 Usuario {} ({}) sin permiso para {}",
                self.user_id,
                self.role.as_str(),
                allowed.action
            );
            Err(AppError::Forbidden(format!(
                "Rol {} sin permiso para {}",
                self.role.as_str(),
                allowed.action
            )))
        }
    }

    pub fn is_driver(&self) -> bool {
        self.role == Role::Driver
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

        let token = extract_token_from_header(auth_header)
            .map_err(|_| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

        let claims = verify_token(token, &JwtConfig::from(&state.config))
            .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;
        let company_id = Uuid::parse_str(&claims.company_id)
            .map_err(|_| AppError::Unauthorized("ID de empresa inválido".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            company_id,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::access;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_authorize_by_role() {
        assert!(user(Role::Admin).authorize(&access::MANAGE_VEHICLES).is_ok());
        assert!(matches!(
            user(Role::Driver).authorize(&access::MANAGE_VEHICLES),
            Err(AppError::Forbidden(_))
        ));
        assert!(user(Role::Driver).authorize(&access::CREATE_OPERATION).is_ok());
    }
}
