use std::sync::Arc;

use crate::config::AppConfig;
use crate::nutrition::{CalorieNinjas, NutritionGateway};
use crate::sheets::{GoogleSheets, SheetsGateway};

/// Gateways are built once at startup and handed around by reference;
/// nothing in the crate reaches for a global client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sheets: Arc<dyn SheetsGateway>,
    pub nutrition: Arc<dyn NutritionGateway>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let sheets = Arc::new(GoogleSheets::connect(&config.sheets).await?);
        let nutrition = Arc::new(CalorieNinjas::new(&config.nutrition)?);
        Ok(Self::from_parts(config, sheets, nutrition))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        sheets: Arc<dyn SheetsGateway>,
        nutrition: Arc<dyn NutritionGateway>,
    ) -> Self {
        Self {
            config,
            sheets,
            nutrition,
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::AppState;
    use crate::config::{AppConfig, NutritionConfig, SheetsConfig};
    use crate::nutrition::{LookupError, NutritionFacts, NutritionGateway};
    use crate::sheets::{SheetsGateway, Worksheet};

    /// In-memory sheets stand-in: serves `rows` for reads, records appends,
    /// and can be told to refuse them.
    #[derive(Default)]
    pub struct RecordingSheets {
        pub rows: Vec<Vec<String>>,
        pub fail_appends: bool,
        pub appended: Mutex<Vec<(Worksheet, Vec<String>)>>,
    }

    impl RecordingSheets {
        pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
            Self {
                rows,
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail_appends: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl SheetsGateway for RecordingSheets {
        async fn append_row(&self, worksheet: Worksheet, row: Vec<String>) -> anyhow::Result<()> {
            if self.fail_appends {
                anyhow::bail!("append refused");
            }
            self.appended.lock().await.push((worksheet, row));
            Ok(())
        }

        async fn read_all_rows(&self, _worksheet: Worksheet) -> anyhow::Result<Vec<Vec<String>>> {
            Ok(self.rows.clone())
        }
    }

    pub struct StubNutrition {
        pub facts: Option<NutritionFacts>,
    }

    #[async_trait]
    impl NutritionGateway for StubNutrition {
        async fn lookup(&self, _query: &str) -> Result<Option<NutritionFacts>, LookupError> {
            Ok(self.facts.clone())
        }
    }

    pub fn test_config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            sheets: SheetsConfig {
                spreadsheet_id: "test-spreadsheet".into(),
                credentials_path: "creds.json".into(),
                timeout_secs: 1,
            },
            nutrition: NutritionConfig {
                api_key: "test-key".into(),
                api_url: "http://localhost/nutrition".into(),
                timeout_secs: 1,
            },
        })
    }

    impl AppState {
        pub fn fake(sheets: Arc<RecordingSheets>) -> Self {
            Self::from_parts(
                test_config(),
                sheets,
                Arc::new(StubNutrition { facts: None }),
            )
        }
    }
}
