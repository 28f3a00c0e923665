// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, User},
};

// Vida útil dos tokens: acesso curto, refresh longo
const ACCESS_TOKEN_HOURS: i64 = 24;
const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self {
            user_repo,
            jwt_secret,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação de bcrypt fora do runtime assíncrono
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.user_repo.touch_last_login(user.id).await?;

        Ok(AuthResponse {
            token: self.create_token(user.id, chrono::Duration::hours(ACCESS_TOKEN_HOURS))?,
            refresh_token: self
                .create_token(user.id, chrono::Duration::days(REFRESH_TOKEN_DAYS))?,
            user,
        })
    }

    /// Troca um refresh token válido por um novo token de acesso.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let user = self.validate_token(refresh_token).await?;

        if !user.is_active {
            return Err(AppError::UserInactive);
        }

        self.create_token(user.id, chrono::Duration::hours(ACCESS_TOKEN_HOURS))
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let current = current_password.to_owned();
        let stored_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || verify(&current, &stored_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_valid {
            return Err(AppError::InvalidCredentials);
        }

        let new_password = new_password.to_owned();
        let new_hash =
            tokio::task::spawn_blocking(move || hash(&new_password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo.update_password(user.id, &new_hash).await?;

        tracing::info!("Senha alterada para o usuário {}", user.id);
        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(
        &self,
        user_id: Uuid,
        lifetime: chrono::Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + lifetime;

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
