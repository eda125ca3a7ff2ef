//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs minted by the identity provider the frontend signs
//! in with. `sub` carries the provider's user id, which is matched against
//! `users.external_id`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub secret: String,
    /// When set, tokens must carry a matching `iss` claim.
    pub issuer: Option<String>,
    /// When set, tokens must carry a matching `aud` claim. Otherwise `aud`
    /// is ignored.
    pub audience: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl AuthConfig {
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }

    /// Sign a token for `subject` valid for `ttl_secs` seconds.
    pub fn mint(&self, subject: &str, ttl_secs: u64) -> Result<String, jsonwebtoken::errors::Error> {
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        let claims = Claims {
            sub: subject.to_string(),
            exp: now + ttl_secs,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }
}

/// The verified identity of the caller, which may not have a local account
/// yet.
#[derive(Clone, Debug)]
pub struct Identity {
    pub subject: String,
}

fn identity_from(
    state: &ServerState,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
) -> Result<Identity, ServerError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| ServerError::Unauthorized)?;
    let claims = state.auth.verify(bearer.token()).map_err(|err| {
        tracing::debug!("rejected bearer token: {err}");
        ServerError::Unauthorized
    })?;
    if claims.sub.trim().is_empty() {
        return Err(ServerError::Unauthorized);
    }
    Ok(Identity { subject: claims.sub })
}

/// Requires a valid token only. Used by the login route, where the account
/// is created.
pub async fn identity(
    State(state): State<ServerState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let identity = identity_from(&state, bearer)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Requires a valid token belonging to a registered user.
pub async fn auth(
    State(state): State<ServerState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let identity = identity_from(&state, bearer)?;
    let user = state
        .engine
        .user_by_identity(&identity.subject)
        .await?
        .ok_or(ServerError::Unauthorized)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(issuer: Option<&str>) -> AuthConfig {
        AuthConfig {
            secret: "test-secret".to_string(),
            issuer: issuer.map(str::to_string),
            audience: None,
        }
    }

    fn signed(auth: &AuthConfig, aud: Option<&str>) -> String {
        let claims = Claims {
            sub: "sub-42".to_string(),
            exp: u64::try_from(chrono::Utc::now().timestamp()).unwrap() + 60,
            iss: None,
            aud: aud.map(str::to_string),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(auth.secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn minted_tokens_verify() {
        let auth = config(Some("swapply"));
        let token = auth.mint("sub-42", 60).unwrap();
        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.sub, "sub-42");
        assert_eq!(claims.iss.as_deref(), Some("swapply"));
    }

    #[test]
    fn wrong_secret_or_issuer_is_rejected() {
        let token = config(Some("swapply")).mint("sub-42", 60).unwrap();

        let other_secret = AuthConfig {
            secret: "another".to_string(),
            issuer: None,
            audience: None,
        };
        assert!(other_secret.verify(&token).is_err());
        assert!(config(Some("elsewhere")).verify(&token).is_err());
        assert!(config(None).verify(&token).is_ok());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let auth = config(None);
        let claims = Claims {
            sub: "sub-42".to_string(),
            exp: 1_000,
            iss: None,
            aud: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(auth.secret.as_bytes()),
        )
        .unwrap();
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn audience_is_ignored_unless_configured() {
        let auth = config(None);
        assert!(auth.verify(&signed(&auth, Some("swapply-web"))).is_ok());
        assert!(auth.verify(&signed(&auth, None)).is_ok());

        let scoped = AuthConfig {
            audience: Some("swapply-web".to_string()),
            ..config(None)
        };
        assert!(scoped.verify(&signed(&scoped, Some("swapply-web"))).is_ok());
        assert!(scoped.verify(&signed(&scoped, Some("elsewhere"))).is_err());
        assert!(scoped.verify(&signed(&scoped, None)).is_err());

        let minted = scoped.mint("sub-42", 60).unwrap();
        assert_eq!(scoped.verify(&minted).unwrap().aud.as_deref(), Some("swapply-web"));
    }
}
