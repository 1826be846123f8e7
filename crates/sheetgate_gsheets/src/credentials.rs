use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use reqwest::header::CONTENT_TYPE;
use ring::signature::RsaKeyPair;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::{GsheetsError, Result};

/// Read and write values of spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Needed to look spreadsheets up by title.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh tokens this long before they actually expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// A Google service account key file.
#[derive(Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct JwtHeader<'a> {
    alg: &'static str,
    typ: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<&'a str>,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: i64,
}

impl ServiceAccount {
    pub fn try_from_str(input: &str) -> Result<Self> {
        let account: ServiceAccount = serde_json::from_str(input)
            .map_err(|e| GsheetsError::InvalidServiceAccount(e.to_string()))?;
        if account.private_key.is_empty() {
            return Err(GsheetsError::InvalidServiceAccount(
                "missing private key".to_string(),
            ));
        }
        Ok(account)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::try_from_str(&contents)
    }

    /// Build a signed JWT assertion for the given scopes.
    pub fn signed_assertion(&self, scopes: &[&str], now: DateTime<Utc>) -> Result<String> {
        let scope = scopes.join(" ");
        let claims = JwtClaims {
            iss: &self.client_email,
            scope: &scope,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
            kid: self.private_key_id.as_deref(),
        };

        let header_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let claims_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{header_b64}.{claims_b64}");

        let key_pair = self.key_pair()?;

        // PKCS#1 v1.5 SHA-256 (RS256)
        let mut signature = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| GsheetsError::Signing("failed to sign payload".to_string()))?;

        let sig_b64 = BASE64_URL_SAFE_NO_PAD.encode(&signature);
        Ok(format!("{signing_input}.{sig_b64}"))
    }

    fn key_pair(&self) -> Result<RsaKeyPair> {
        let mut reader = std::io::Cursor::new(self.private_key.as_bytes());
        let key = rustls_pemfile::read_one(&mut reader)
            .map_err(|e| GsheetsError::InvalidServiceAccount(format!("invalid PEM: {e}")))?;
        match key {
            Some(rustls_pemfile::Item::Pkcs8Key(der)) => {
                RsaKeyPair::from_pkcs8(der.secret_pkcs8_der()).map_err(|e| {
                    GsheetsError::Signing(format!("bad pkcs8 key: {e}"))
                })
            }
            Some(rustls_pemfile::Item::Pkcs1Key(der)) => {
                RsaKeyPair::from_der(der.secret_pkcs1_der()).map_err(|e| {
                    GsheetsError::Signing(format!("bad pkcs1 key: {e}"))
                })
            }
            _ => Err(GsheetsError::InvalidServiceAccount(
                "missing private key".to_string(),
            )),
        }
    }

    /// Exchange a signed assertion for an access token.
    pub async fn fetch_access_token(
        &self,
        client: &reqwest::Client,
        scopes: &[&str],
    ) -> Result<AccessToken> {
        let jwt = self.signed_assertion(scopes, Utc::now())?;
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt.as_str()),
        ];
        let body = serde_urlencoded::to_string(params)?;

        let resp = client
            .post(&self.token_uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GsheetsError::Status {
                endpoint: "token".to_string(),
                status,
                body: resp.text().await.unwrap_or_default(),
            });
        }

        Ok(resp.json().await?)
    }
}

/// Something that can produce a bearer token for the Google APIs.
#[async_trait]
pub trait TokenSource: fmt::Debug + Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug)]
struct CachedToken {
    token: String,
    refresh_at: DateTime<Utc>,
}

/// Tokens minted from a service account, reused until shortly before they
/// expire.
#[derive(Debug)]
pub struct ServiceAccountTokenSource {
    account: ServiceAccount,
    client: reqwest::Client,
    scopes: Vec<&'static str>,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(account: ServiceAccount, client: reqwest::Client) -> Self {
        ServiceAccountTokenSource {
            account,
            client,
            scopes: vec![SPREADSHEETS_SCOPE, DRIVE_READONLY_SCOPE],
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(tok) = cached.as_ref() {
            if Utc::now() < tok.refresh_at {
                return Ok(tok.token.clone());
            }
        }

        debug!(client_email = %self.account.client_email, "fetching access token");
        let fetched = self
            .account
            .fetch_access_token(&self.client, &self.scopes)
            .await?;
        let lifetime = (fetched.expires_in - EXPIRY_MARGIN_SECS).max(0);
        *cached = Some(CachedToken {
            token: fetched.access_token.clone(),
            refresh_at: Utc::now() + Duration::seconds(lifetime),
        });

        Ok(fetched.access_token)
    }
}
