use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub credentials_path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NutritionConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub sheets: SheetsConfig,
    pub nutrition: NutritionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);
        let sheets = SheetsConfig {
            spreadsheet_id: std::env::var("SPREADSHEET_ID").context("SPREADSHEET_ID is not set")?,
            credentials_path: std::env::var("GOOGLE_CREDENTIALS")
                .unwrap_or_else(|_| "creds.json".into()),
            timeout_secs,
        };
        let nutrition = NutritionConfig {
            api_key: std::env::var("NUTRITION_API_KEY").context("NUTRITION_API_KEY is not set")?,
            api_url: std::env::var("NUTRITION_API_URL")
                .unwrap_or_else(|_| "https://api.calorieninjas.com/v1/nutrition".into()),
            timeout_secs,
        };
        Ok(Self { sheets, nutrition })
    }
}
