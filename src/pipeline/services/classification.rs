use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, ConfigurationError};
use crate::pipeline::types::{ImageArtifact, Label};

const IMAGE_FIELD: &str = "image";
const PREDICT_PATH: &str = "predict";

/// Seam between the controller and the remote prediction service.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, artifact: &ImageArtifact) -> Result<Label, ClientError>;
}

/// Uploads the photo as a multipart form and extracts the predicted label.
/// A single POST per call; retries are the caller's decision.
pub struct HttpClassifier {
    client: reqwest::Client,
    predict_url: reqwest::Url,
}

impl HttpClassifier {
    pub fn new(base_url: &str) -> Result<Self, ConfigurationError> {
        // Joined by hand so a base URL with a path keeps it, trailing slash
        // or not.
        let endpoint = format!("{}/{}", base_url.trim_end_matches('/'), PREDICT_PATH);
        let predict_url =
            reqwest::Url::parse(&endpoint).map_err(|e| ConfigurationError::Invalid {
                name: "classification.base_url",
                reason: e.to_string(),
            })?;
        Ok(Self {
            client: reqwest::Client::new(),
            predict_url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    fruit: Option<String>,
}

fn parse_label(status: u16, body: &str) -> Result<Label, ClientError> {
    if !(200..300).contains(&status) {
        return Err(ClientError::Service(status));
    }
    let response: PredictResponse = serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(format!("not a prediction object: {e}")))?;
    let raw = response
        .fruit
        .ok_or_else(|| ClientError::MalformedResponse("no fruit field in response".to_string()))?;
    Label::parse(&raw)
        .ok_or_else(|| ClientError::MalformedResponse("fruit field is empty".to_string()))
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, artifact: &ImageArtifact) -> Result<Label, ClientError> {
        // An unreadable or empty artifact is a caller mistake, caught before
        // anything goes on the wire.
        let bytes = tokio::fs::read(artifact.path()).await.map_err(|e| {
            ClientError::Precondition(format!(
                "artifact {} is unreadable: {e}",
                artifact.path().display()
            ))
        })?;
        if bytes.is_empty() {
            return Err(ClientError::Precondition(format!(
                "artifact {} is empty",
                artifact.path().display()
            )));
        }

        let part = multipart::Part::bytes(bytes)
            .file_name(artifact.file_name().to_string())
            .mime_str(artifact.mime_type())
            .map_err(|e| {
                ClientError::Precondition(format!("invalid mime type {}: {e}", artifact.mime_type()))
            })?;
        let form = multipart::Form::new().part(IMAGE_FIELD, part);

        debug!(url = %self.predict_url, artifact = %artifact.id(), "uploading photo for classification");
        let response = self
            .client
            .post(self.predict_url.clone())
            .multipart(form)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, "classification response received");
        parse_label(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_the_label() {
        let label = parse_label(200, r#"{"fruit":"Apple"}"#).expect("Failed to parse label");
        assert_eq!(label.as_str(), "apple");
    }

    #[test]
    fn parse_rejects_missing_fruit_field() {
        let error = parse_label(200, r#"{"error":"bad image"}"#).unwrap_err();
        assert!(matches!(error, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn parse_rejects_empty_label() {
        let error = parse_label(200, r#"{"fruit":"  "}"#).unwrap_err();
        assert!(matches!(error, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn parse_rejects_non_json_body() {
        let error = parse_label(200, "<html>oops</html>").unwrap_err();
        assert!(matches!(error, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn non_success_status_is_a_service_error() {
        let error = parse_label(500, r#"{"fruit":"apple"}"#).unwrap_err();
        assert!(matches!(error, ClientError::Service(500)));
    }

    #[tokio::test]
    async fn unreadable_artifact_fails_before_any_request() {
        let classifier =
            HttpClassifier::new("http://127.0.0.1:9").expect("Failed to build classifier");
        let artifact = ImageArtifact::jpeg("/nonexistent/fruit.jpg".into());
        let error = classifier.classify(&artifact).await.unwrap_err();
        assert!(matches!(error, ClientError::Precondition(_)));
    }
}
