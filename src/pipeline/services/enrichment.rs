use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, ConfigurationError};
use crate::pipeline::types::{Label, Nutrient, NutrientKey, NutrientSet};

const NUTRITION_PATH: &str = "nutrition-data";

/// Seam between the controller and the remote nutrition lookup service.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, label: &Label) -> Result<NutrientSet, ClientError>;
}

#[derive(Debug, Clone)]
pub struct NutritionCredentials {
    pub app_id: String,
    pub app_key: String,
}

/// Looks a label up against the nutrition service, one unit at a time, and
/// keeps only the nutrients the pipeline reports on.
pub struct HttpEnricher {
    client: reqwest::Client,
    lookup_url: reqwest::Url,
    credentials: Option<NutritionCredentials>,
}

impl HttpEnricher {
    pub fn new(
        base_url: &str,
        credentials: Option<NutritionCredentials>,
    ) -> Result<Self, ConfigurationError> {
        let endpoint = format!("{}/{}", base_url.trim_end_matches('/'), NUTRITION_PATH);
        let lookup_url =
            reqwest::Url::parse(&endpoint).map_err(|e| ConfigurationError::Invalid {
                name: "nutrition.base_url",
                reason: e.to_string(),
            })?;
        Ok(Self {
            client: reqwest::Client::new(),
            lookup_url,
            credentials,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NutritionResponse {
    #[serde(rename = "totalNutrients")]
    total_nutrients: Option<IndexMap<String, RawNutrient>>,
}

#[derive(Debug, Deserialize)]
struct RawNutrient {
    quantity: f64,
    unit: String,
}

fn parse_nutrients(status: u16, body: &str) -> Result<NutrientSet, ClientError> {
    if !(200..300).contains(&status) {
        return Err(ClientError::Service(status));
    }
    let response: NutritionResponse = serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(format!("not a nutrition object: {e}")))?;
    let raw = response.total_nutrients.ok_or_else(|| {
        ClientError::MalformedResponse("no totalNutrients field in response".to_string())
    })?;

    // An empty mapping is a valid answer; unrecognized nutrient codes are
    // dropped, not errors.
    let mut nutrients = NutrientSet::new();
    for (code, value) in raw {
        if let Some(key) = NutrientKey::from_service_code(&code) {
            nutrients.insert(
                key,
                Nutrient {
                    quantity: value.quantity,
                    unit: value.unit,
                },
            );
        }
    }
    Ok(nutrients)
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn enrich(&self, label: &Label) -> Result<NutrientSet, ClientError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ConfigurationError::Missing("nutrition.app_id / nutrition.app_key"))
            .map_err(ClientError::Configuration)?;

        let ingredient = format!("{label} 1");
        debug!(url = %self.lookup_url, %label, "looking up nutrition data");
        let response = self
            .client
            .get(self.lookup_url.clone())
            .query(&[
                ("app_id", credentials.app_id.as_str()),
                ("app_key", credentials.app_key.as_str()),
                ("ingr", ingredient.as_str()),
            ])
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, "nutrition response received");
        parse_nutrients(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_only_known_nutrients() {
        let body = r#"{"totalNutrients":{
            "ENERC_KCAL":{"quantity":52.0,"unit":"kcal"},
            "CHOLE":{"quantity":0.0,"unit":"mg"},
            "SUGAR":{"quantity":10.4,"unit":"g"}
        }}"#;
        let nutrients = parse_nutrients(200, body).expect("Failed to parse nutrients");
        assert_eq!(nutrients.len(), 2);
        assert_eq!(nutrients.get(NutrientKey::Energy).unwrap().quantity, 52.0);
        assert_eq!(nutrients.get(NutrientKey::Sugar).unwrap().unit, "g");
        assert!(nutrients.get(NutrientKey::Protein).is_none());
    }

    #[test]
    fn empty_nutrient_listing_is_a_valid_answer() {
        let nutrients =
            parse_nutrients(200, r#"{"totalNutrients":{}}"#).expect("Failed to parse nutrients");
        assert!(nutrients.is_empty());
    }

    #[test]
    fn missing_nutrient_structure_is_malformed() {
        let error = parse_nutrients(200, r#"{"calories":52}"#).unwrap_err();
        assert!(matches!(error, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn unauthorized_status_is_a_service_error() {
        let error = parse_nutrients(401, "").unwrap_err();
        assert!(matches!(error, ClientError::Service(401)));
    }

    #[test]
    fn parsing_is_idempotent_for_a_fixed_body() {
        let body = r#"{"totalNutrients":{"PROCNT":{"quantity":0.3,"unit":"g"}}}"#;
        let first = parse_nutrients(200, body).expect("Failed to parse nutrients");
        let second = parse_nutrients(200, body).expect("Failed to parse nutrients");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        // Port 9 would refuse the connection; a Configuration error proves
        // the request was never attempted.
        let enricher =
            HttpEnricher::new("http://127.0.0.1:9", None).expect("Failed to build enricher");
        let label = Label::parse("apple").unwrap();
        let error = enricher.enrich(&label).await.unwrap_err();
        assert!(matches!(error, ClientError::Configuration(_)));
    }
}
