use anyhow::Context;
use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::config::SheetsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Worksheet {
    Entries,
    Goal,
    WeekTotal,
}

impl Worksheet {
    pub fn title(self) -> &'static str {
        match self {
            Worksheet::Entries => "Entries",
            Worksheet::Goal => "Goal",
            Worksheet::WeekTotal => "WeekTotal",
        }
    }
}

#[async_trait]
pub trait SheetsGateway: Send + Sync {
    async fn append_row(&self, worksheet: Worksheet, row: Vec<String>) -> anyhow::Result<()>;
    async fn read_all_rows(&self, worksheet: Worksheet) -> anyhow::Result<Vec<Vec<String>>>;
}

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: String,
    expires_at: OffsetDateTime,
}

/// Google Sheets REST client authenticated with a service-account key.
/// Tokens are minted from a signed JWT assertion and cached until shortly
/// before they expire.
pub struct GoogleSheets {
    http: reqwest::Client,
    spreadsheet_id: String,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleSheets {
    pub async fn connect(config: &SheetsConfig) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&config.credentials_path)
            .with_context(|| format!("read service account key {}", config.credentials_path))?;
        let key: ServiceAccountKey =
            serde_json::from_str(&raw).context("parse service account key")?;
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .context("service account private key is not valid RSA PEM")?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("build sheets http client")?;

        let sheets = Self {
            http,
            spreadsheet_id: config.spreadsheet_id.clone(),
            key,
            signing_key,
            token: Mutex::new(None),
        };
        sheets
            .probe()
            .await
            .with_context(|| format!("open spreadsheet {}", sheets.spreadsheet_id))?;
        Ok(sheets)
    }

    /// Fails fast at startup when credentials are bad or the spreadsheet
    /// does not exist, instead of on the first menu action.
    async fn probe(&self) -> anyhow::Result<()> {
        let token = self.access_token().await?;
        let url = format!("{SHEETS_API}/{}?fields=spreadsheetId", self.spreadsheet_id);
        self.http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn access_token(&self) -> anyhow::Result<String> {
        let mut slot = self.token.lock().await;
        let now = OffsetDateTime::now_utc();
        if let Some(cached) = slot.as_ref() {
            if cached.expires_at > now {
                return Ok(cached.value.clone());
            }
        }

        let iat = now.unix_timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat + 3600,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .context("sign service account assertion")?;
        let resp: TokenResponse = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .context("request access token")?
            .error_for_status()
            .context("access token request rejected")?
            .json()
            .await
            .context("decode access token response")?;

        // Refresh a minute early so a token never expires mid-request.
        let cached = CachedToken {
            value: resp.access_token,
            expires_at: now + time::Duration::seconds(resp.expires_in.max(60) - 60),
        };
        let value = cached.value.clone();
        *slot = Some(cached);
        Ok(value)
    }
}

#[async_trait]
impl SheetsGateway for GoogleSheets {
    async fn append_row(&self, worksheet: Worksheet, row: Vec<String>) -> anyhow::Result<()> {
        let token = self.access_token().await?;
        let url = format!(
            "{SHEETS_API}/{}/values/{}:append?valueInputOption=RAW",
            self.spreadsheet_id,
            worksheet.title()
        );
        self.http
            .post(&url)
            .bearer_auth(&token)
            .json(&serde_json::json!({ "values": [row] }))
            .send()
            .await
            .with_context(|| format!("append to {}", worksheet.title()))?
            .error_for_status()
            .with_context(|| format!("append to {} rejected", worksheet.title()))?;
        Ok(())
    }

    async fn read_all_rows(&self, worksheet: Worksheet) -> anyhow::Result<Vec<Vec<String>>> {
        #[derive(Deserialize)]
        struct ValueRange {
            // Absent entirely when the worksheet has no rows.
            #[serde(default)]
            values: Vec<Vec<String>>,
        }

        let token = self.access_token().await?;
        let url = format!(
            "{SHEETS_API}/{}/values/{}",
            self.spreadsheet_id,
            worksheet.title()
        );
        let range: ValueRange = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .with_context(|| format!("read {}", worksheet.title()))?
            .error_for_status()
            .with_context(|| format!("read {} rejected", worksheet.title()))?
            .json()
            .await
            .with_context(|| format!("decode {} rows", worksheet.title()))?;
        Ok(range.values)
    }
}
