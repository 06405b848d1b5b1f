use reqwest::multipart;
use tracing::debug;
use uuid::Uuid;

use super::types::{
    AnalyzeResponse, CoachingRequest, CoachingResponse, PromptRequest, PromptResponse,
    TranscribeResponse,
};
use crate::error::CoachError;

/// The four remote contracts the orchestrator depends on.
///
/// Seam for tests: the orchestrator only ever talks to this trait, so a
/// counting mock can assert that local failures never reach the network.
#[async_trait::async_trait]
pub trait CoachApi: Send + Sync {
    /// `POST /analyze_speech`: multipart audio plus assessment type tag.
    async fn analyze_speech(
        &self,
        wav: Vec<u8>,
        assessment_type: &str,
    ) -> Result<AnalyzeResponse, CoachError>;

    /// `POST /transcribe_audio`: multipart audio only.
    async fn transcribe_audio(&self, wav: Vec<u8>) -> Result<TranscribeResponse, CoachError>;

    /// `POST /get_practice_prompt`: JSON body.
    async fn practice_prompt(&self, req: PromptRequest) -> Result<PromptResponse, CoachError>;

    /// `POST /practice_session`: JSON body.
    async fn practice_session(&self, req: CoachingRequest)
        -> Result<CoachingResponse, CoachError>;
}

/// HTTP client for the coaching service.
///
/// Single round trip per call, no retry, no client-imposed timeout: the
/// transport's own failure surfaces as `RequestFailed`. Non-2xx responses
/// still carry a JSON body with `success: false` and an `error` string, so
/// the body is parsed regardless of status.
pub struct HttpCoachApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCoachApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl CoachApi for HttpCoachApi {
    async fn analyze_speech(
        &self,
        wav: Vec<u8>,
        assessment_type: &str,
    ) -> Result<AnalyzeResponse, CoachError> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, bytes = wav.len(), assessment_type, "Dispatching analyze_speech");

        let part = multipart::Part::bytes(wav)
            .file_name("recording.wav")
            .mime_str("audio/wav")?;
        let form = multipart::Form::new()
            .part("audio", part)
            .text("type", assessment_type.to_string());

        let response = self
            .client
            .post(self.url("/analyze_speech"))
            .multipart(form)
            .send()
            .await?;

        Ok(response.json().await?)
    }

    async fn transcribe_audio(&self, wav: Vec<u8>) -> Result<TranscribeResponse, CoachError> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, bytes = wav.len(), "Dispatching transcribe_audio");

        let part = multipart::Part::bytes(wav)
            .file_name("practice.wav")
            .mime_str("audio/wav")?;
        let form = multipart::Form::new().part("audio", part);

        let response = self
            .client
            .post(self.url("/transcribe_audio"))
            .multipart(form)
            .send()
            .await?;

        Ok(response.json().await?)
    }

    async fn practice_prompt(&self, req: PromptRequest) -> Result<PromptResponse, CoachError> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, kind = %req.kind, "Dispatching get_practice_prompt");

        let response = self
            .client
            .post(self.url("/get_practice_prompt"))
            .json(&req)
            .send()
            .await?;

        Ok(response.json().await?)
    }

    async fn practice_session(
        &self,
        req: CoachingRequest,
    ) -> Result<CoachingResponse, CoachError> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, kind = %req.kind, "Dispatching practice_session");

        let response = self
            .client
            .post(self.url("/practice_session"))
            .json(&req)
            .send()
            .await?;

        Ok(response.json().await?)
    }
}
