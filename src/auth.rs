// src/auth.rs
use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::database::Database;
use crate::models::Profile;

const FIREBASE_KEYS_URL: &str =
    "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseUser {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub aud: String,
    pub iss: String,
    pub sub: String,
    #[serde(default)]
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub exp: usize,
    pub iat: usize,
}

impl From<Claims> for FirebaseUser {
    fn from(claims: Claims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
            email_verified: claims.email_verified,
        }
    }
}

/// Verifies bearer tokens issued by the external auth provider.
///
/// Keys are fetched once at startup and the config is handed to Rocket as
/// managed state.
pub struct AuthConfig {
    pub project_id: String,
    pub firebase_keys: HashMap<String, String>, // kid -> PEM certificate
}

impl AuthConfig {
    pub fn new(project_id: String) -> Self {
        Self {
            project_id,
            firebase_keys: HashMap::new(),
        }
    }

    pub fn with_keys(mut self, keys: HashMap<String, String>) -> Self {
        self.firebase_keys = keys;
        self
    }

    pub async fn update_firebase_keys(&mut self) -> Result<()> {
        let response = reqwest::get(FIREBASE_KEYS_URL).await?.error_for_status()?;
        let keys: HashMap<String, String> = response.json().await?;

        info!("Fetched {} Firebase public keys", keys.len());
        self.firebase_keys = keys;
        Ok(())
    }

    pub fn verify(&self, token: &str) -> Result<FirebaseUser> {
        let header = jsonwebtoken::decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| anyhow::anyhow!("Missing kid in token header"))?;

        let public_key = self
            .firebase_keys
            .get(&kid)
            .ok_or_else(|| anyhow::anyhow!("Unknown key ID: {}", kid))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.project_id
        )]);

        let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())?;
        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;

        Ok(token_data.claims.into())
    }
}

/// Caller identity plus their campus profile, if they have created one
pub struct AuthenticatedUser {
    pub firebase_user: FirebaseUser,
    pub profile: Option<Profile>,
}

impl AuthenticatedUser {
    pub fn user(&self) -> &FirebaseUser {
        &self.firebase_user
    }

    pub fn uid(&self) -> &str {
        &self.firebase_user.uid
    }

    pub fn email(&self) -> &str {
        &self.firebase_user.email
    }

    /// The caller's profile; most routes need one before they do anything
    pub fn require_profile(&self) -> Result<&Profile, AuthError> {
        self.profile.as_ref().ok_or(AuthError::ProfileRequired)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => return Outcome::Error((status, AuthError::DatabaseError)),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let db = match req.guard::<&State<Database>>().await {
            Outcome::Success(db) => db,
            Outcome::Error((status, _)) => return Outcome::Error((status, AuthError::DatabaseError)),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let token = match bearer_token(req.headers().get_one("Authorization")) {
            Ok(token) => token,
            Err(e) => {
                warn!("{}", e.message());
                return Outcome::Error((Status::Unauthorized, e));
            }
        };

        let firebase_user = match auth_config.verify(token) {
            Ok(user) => user,
            Err(e) => {
                error!("Token verification failed: {}", e);
                return Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed));
            }
        };

        let profile = match db.profiles().find_by_auth_uid(&firebase_user.uid).await {
            Ok(profile) => profile,
            Err(e) => {
                error!("Failed to load profile for {}: {}", firebase_user.uid, e);
                return Outcome::Error((Status::InternalServerError, AuthError::DatabaseError));
            }
        };

        info!(
            "User {} authenticated (profile: {})",
            firebase_user.email,
            profile.as_ref().map(|p| p.id.as_str()).unwrap_or("none")
        );

        Outcome::Success(AuthenticatedUser {
            firebase_user,
            profile,
        })
    }
}

/// Auth guard that never fails; anonymous callers get `user: None`
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    DatabaseError,
    ProfileRequired,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token verification failed",
            AuthError::DatabaseError => "Database error occurred",
            AuthError::ProfileRequired => "Create your profile first",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::ProfileRequired => "PROFILE_REQUIRED",
            AuthError::DatabaseError => "INTERNAL_ERROR",
            _ => "AUTHORIZATION_ERROR",
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    match header {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AuthError::InvalidToken),
        },
        None => Err(AuthError::MissingToken),
    }
}
