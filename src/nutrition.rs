use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::NutritionConfig;
use crate::tracker::ledger::FoodEntry;

/// Transport or HTTP failure talking to the lookup service. Distinct from
/// a successful query that matched nothing, which is `Ok(None)`.
#[derive(Debug, Error)]
#[error("nutrition lookup failed: {0}")]
pub struct LookupError(#[from] reqwest::Error);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NutritionFacts {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub fat_total_g: f64,
    #[serde(default)]
    pub carbohydrates_total_g: f64,
}

impl NutritionFacts {
    /// The ledger and the sheet store whole grams; fractional values are
    /// truncated and anything non-positive reads as 0.
    pub fn into_entry(self, name: &str) -> FoodEntry {
        FoodEntry {
            name: name.to_string(),
            calories: whole(self.calories),
            protein_g: whole(self.protein_g),
            fat_g: whole(self.fat_total_g),
            carbs_g: whole(self.carbohydrates_total_g),
        }
    }
}

fn whole(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value as u32
    } else {
        0
    }
}

#[async_trait]
pub trait NutritionGateway: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Option<NutritionFacts>, LookupError>;
}

/// CalorieNinjas-style lookup: `GET <url>?query=...` with an `X-Api-Key`
/// header, answering `{ "items": [...] }`.
pub struct CalorieNinjas {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl CalorieNinjas {
    pub fn new(config: &NutritionConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("build nutrition http client")?;
        Ok(Self {
            http,
            url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    items: Vec<NutritionFacts>,
}

#[async_trait]
impl NutritionGateway for CalorieNinjas {
    async fn lookup(&self, query: &str) -> Result<Option<NutritionFacts>, LookupError> {
        let resp: LookupResponse = self
            .http
            .get(&self.url)
            .header("X-Api-Key", &self.api_key)
            .query(&[("query", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp.items.into_iter().next())
    }
}
