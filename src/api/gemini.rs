//! The AI collaborator: query translation, dashboard summary and document
//! field extraction backed by the Gemini `generateContent` API.

mod types;

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use super::{
    config::GeminiSettings,
    err::{CollaboratorError, TranslationFailure},
    filter::{RawFilter, StructuredFilter},
    student::{Major, Status},
};
use types::{
    ApiErrorBody, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Schema,
    SchemaType,
};

pub const SUMMARY_UNCONFIGURED: &str = "AI Configuration missing. Please set API_KEY.";
pub const SUMMARY_EMPTY: &str = "No summary generated.";
pub const SUMMARY_UNAVAILABLE: &str = "Unable to generate summary at this time.";
/// Placeholder shown while a summary is in flight
pub const SUMMARY_LOADING: &str = "Memuat analisis AI...";

/// Student fields read out of a scanned document.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// The remote text-generation service as the dashboard uses it.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Turns a free-text query into a validated structured filter.
    async fn translate_query(&self, query: &str) -> Result<StructuredFilter, TranslationFailure>;

    /// Prose summary of the `(major, status)` composition.
    async fn summarize(&self, composition: &[(Major, Status)]) -> Result<String, CollaboratorError>;

    async fn extract_document_fields(
        &self,
        description: &str,
    ) -> Result<ExtractedFields, CollaboratorError>;
}

/// Summary text for display; failures collapse into a fallback string.
pub async fn summary_or_fallback(
    collaborator: &dyn Collaborator,
    composition: &[(Major, Status)],
) -> String {
    match collaborator.summarize(composition).await {
        Ok(text) => text,
        Err(CollaboratorError::Unconfigured) => SUMMARY_UNCONFIGURED.to_string(),
        Err(CollaboratorError::EmptyResponse) => SUMMARY_EMPTY.to_string(),
        Err(err) => {
            error!("summary unavailable: {err}");
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

/// Extracted fields, or nothing when the service fails.
pub async fn extract_or_empty(collaborator: &dyn Collaborator, description: &str) -> ExtractedFields {
    collaborator
        .extract_document_fields(description)
        .await
        .unwrap_or_else(|err| {
            error!("document extraction failed: {err}");
            ExtractedFields::default()
        })
}

/// Parses translator output; anything but a JSON object is a failure.
pub fn parse_filter_text(text: &str) -> Result<StructuredFilter, CollaboratorError> {
    let value: serde_json::Value = serde_json::from_str(text.trim())
        .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(CollaboratorError::Malformed(format!(
            "expected a JSON object, got {value}"
        )));
    }
    let raw: RawFilter =
        serde_json::from_value(value).map_err(|e| CollaboratorError::Malformed(e.to_string()))?;
    Ok(raw.into_filter())
}

fn translation_prompt(query: &str) -> String {
    let majors = Major::ALL
        .iter()
        .map(|m| format!("'{}'", m.label()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Convert this natural language search query for a student database into a JSON object: \"{query}\".\n\
         Possible fields: name (string), major (string, strictly map to one of: {majors}), year (number), status (string).\n\
         Return ONLY the JSON object. If a field is not mentioned, omit it."
    )
}

fn summary_prompt(composition: &[(Major, Status)]) -> String {
    let listing = composition
        .iter()
        .map(|(major, status)| format!("{major} - {status}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Analyze this raw list of student majors and statuses: {listing}.\n\
         Provide a brief, professional 3-sentence executive summary about the current composition and health of the student body for a university administrator.\n\
         Focus on distribution and retention risks (like Leave/Dropout)."
    )
}

fn extraction_prompt(description: &str) -> String {
    format!(
        "Extract student information from this document text: \"{description}\".\n\
         Return JSON with keys: nim, name, address."
    )
}

pub struct GeminiClient {
    settings: GeminiSettings,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self::with_client(settings, client))
    }

    pub fn with_client(settings: GeminiSettings, client: reqwest::Client) -> Self {
        Self { settings, client }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        )
    }

    /// One `generateContent` round trip, returning the answer text.
    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, CollaboratorError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(CollaboratorError::Unconfigured)?;

        debug!("calling {}", self.api_url());
        let response = self
            .client
            .post(format!("{}?key={api_key}", self.api_url()))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            error!("Gemini API error {}: {}", status.as_u16(), message);
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.text().ok_or(CollaboratorError::EmptyResponse)
    }
}

#[async_trait]
impl Collaborator for GeminiClient {
    async fn translate_query(&self, query: &str) -> Result<StructuredFilter, TranslationFailure> {
        let schema = Schema::object([
            ("name", SchemaType::String),
            ("major", SchemaType::String),
            ("year", SchemaType::Number),
            ("status", SchemaType::String),
        ]);
        let request = GenerateContentRequest::prompt(translation_prompt(query))
            .with_config(GenerationConfig::json(Some(schema)));

        let text = self.generate(&request).await?;
        let filter = parse_filter_text(&text).map_err(|err| {
            warn!("unusable translation {text:?}: {err}");
            err
        })?;
        Ok(filter)
    }

    async fn summarize(&self, composition: &[(Major, Status)]) -> Result<String, CollaboratorError> {
        let request = GenerateContentRequest::prompt(summary_prompt(composition));
        self.generate(&request).await
    }

    async fn extract_document_fields(
        &self,
        description: &str,
    ) -> Result<ExtractedFields, CollaboratorError> {
        let request = GenerateContentRequest::prompt(extraction_prompt(description))
            .with_config(GenerationConfig::json(None));
        let text = self.generate(&request).await?;
        serde_json::from_str(text.trim()).map_err(|e| CollaboratorError::Malformed(e.to_string()))
    }
}
