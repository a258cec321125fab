//! Azure AI Language REST client.
//!
//! Three calls make up one analysis:
//!
//! 1. `POST {endpoint}/language/:analyze-text` with kind `LanguageDetection`
//! 2. `POST {endpoint}/language/:analyze-text` with kind `SentimentAnalysis`
//! 3. `POST {endpoint}/language/analyze-text/jobs` with an
//!    `ExtractiveSummarization` task, then `GET` on the returned
//!    `operation-location` until the job finishes
//!
//! Steps 2 and 3 both need the language from step 1 and run concurrently.
//! Every request sends a single document with id `"1"`.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use super::{ProviderError, TextAnalytics, build_summary};
use crate::config::{AppConfig, Credentials, SummaryConfig};
use crate::models::{NlpAnalysis, SentenceSentiment, Sentiment};
use crate::utils::truncate_for_log;

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const DOCUMENT_ID: &str = "1";

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeTextRequest<'a> {
    kind: &'static str,
    analysis_input: AnalysisInput<'a>,
}

#[derive(Debug, Serialize)]
struct AnalysisInput<'a> {
    documents: Vec<InputDocument<'a>>,
}

#[derive(Debug, Serialize)]
struct InputDocument<'a> {
    id: &'static str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

impl<'a> AnalysisInput<'a> {
    fn single(text: &'a str, language: Option<&'a str>) -> Self {
        Self {
            documents: vec![InputDocument {
                id: DOCUMENT_ID,
                text,
                language,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryJobRequest<'a> {
    display_name: &'static str,
    analysis_input: AnalysisInput<'a>,
    tasks: Vec<SummaryTask>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryTask {
    kind: &'static str,
    task_name: &'static str,
    parameters: SummaryParameters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryParameters {
    sentence_count: usize,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AnalyzeTextResponse<D> {
    results: DocumentResults<D>,
}

#[derive(Debug, Deserialize)]
struct DocumentResults<D> {
    #[serde(default = "Vec::new")]
    documents: Vec<D>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
struct DocumentError {
    error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LanguageDocument {
    detected_language: DetectedLanguage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectedLanguage {
    name: String,
    iso6391_name: String,
}

#[derive(Debug, Deserialize)]
struct SentimentDocument {
    sentiment: Sentiment,
    #[serde(default)]
    sentences: Vec<SentimentSentence>,
}

#[derive(Debug, Deserialize)]
struct SentimentSentence {
    text: String,
    sentiment: Sentiment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
enum JobStatus {
    NotStarted,
    Running,
    Succeeded,
    PartiallyCompleted,
    Failed,
    Cancelling,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Cancelled | JobStatus::Cancelling | JobStatus::Unknown
        )
    }
}

#[derive(Debug, Deserialize)]
struct JobState {
    status: JobStatus,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
    #[serde(default)]
    tasks: Option<JobTasks>,
}

#[derive(Debug, Deserialize)]
struct JobTasks {
    #[serde(default)]
    items: Vec<SummaryTaskResult>,
}

#[derive(Debug, Deserialize)]
struct SummaryTaskResult {
    #[serde(default)]
    results: Option<DocumentResults<SummaryDocument>>,
}

#[derive(Debug, Deserialize)]
struct SummaryDocument {
    #[serde(default)]
    sentences: Vec<SummarySentence>,
}

#[derive(Debug, Deserialize)]
struct SummarySentence {
    text: String,
}

fn first_document<D>(results: DocumentResults<D>, what: &'static str) -> Result<D, ProviderError> {
    if let Some(err) = results.errors.into_iter().next() {
        return Err(ProviderError::Document {
            code: err.error.code,
            message: err.error.message,
        });
    }
    results
        .documents
        .into_iter()
        .next()
        .ok_or(ProviderError::MissingResult(what))
}

/// Summary sentences of a finished job, in the order the service returned them.
fn summary_sentences(state: JobState) -> Result<Vec<String>, ProviderError> {
    let mut sentences = Vec::new();
    for task in state.tasks.map(|t| t.items).unwrap_or_default() {
        let Some(results) = task.results else {
            continue;
        };
        let doc = first_document(results, "summary document")?;
        sentences.extend(doc.sentences.into_iter().map(|s| s.text));
    }
    Ok(sentences)
}

/// Turn a non-success response into [`ProviderError::Api`], reading the
/// service's error body when there is one.
async fn check_status(resp: Response) -> Result<Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body))
}

fn api_error(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| format!("{}: {}", b.error.code, b.error.message))
        .unwrap_or_else(|_| truncate_for_log(body, 300));
    ProviderError::Api { status, message }
}

/// Decide what one poll of a summarization job means: `Some` when the job
/// finished, `None` to keep polling, an error when it failed or `max_wait`
/// has passed.
fn job_progress(
    state: JobState,
    elapsed: Duration,
    max_wait: Duration,
) -> Result<Option<JobState>, ProviderError> {
    match state.status {
        JobStatus::Succeeded | JobStatus::PartiallyCompleted => Ok(Some(state)),
        status if status.is_terminal_failure() => {
            let message = state
                .errors
                .first()
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or_default();
            Err(ProviderError::JobFailed {
                status: format!("{status:?}"),
                message,
            })
        }
        _ if elapsed >= max_wait => Err(ProviderError::Timeout(max_wait.as_secs())),
        _ => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// [`TextAnalytics`] implementation for an Azure AI Language resource.
#[derive(Clone)]
pub struct AzureLanguageClient {
    client: Client,
    endpoint: String,
    key: String,
    api_version: String,
    summary: SummaryConfig,
}

impl std::fmt::Debug for AzureLanguageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureLanguageClient")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl AzureLanguageClient {
    pub fn new(credentials: Credentials, config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.http.user_agent.clone())
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: credentials.endpoint,
            key: credentials.key,
            api_version: config.azure.api_version.clone(),
            summary: config.summary.clone(),
        })
    }

    async fn post_analyze<D: DeserializeOwned>(
        &self,
        request: &AnalyzeTextRequest<'_>,
    ) -> Result<D, ProviderError> {
        let url = format!("{}/language/:analyze-text", self.endpoint);
        let resp = self
            .client
            .post(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .header(KEY_HEADER, &self.key)
            .json(request)
            .send()
            .await?;
        let parsed: AnalyzeTextResponse<D> = check_status(resp).await?.json().await?;
        first_document(parsed.results, request.kind)
    }

    #[instrument(level = "info", skip_all)]
    async fn detect_language(&self, text: &str) -> Result<DetectedLanguage, ProviderError> {
        let request = AnalyzeTextRequest {
            kind: "LanguageDetection",
            analysis_input: AnalysisInput::single(text, None),
        };
        let doc: LanguageDocument = self.post_analyze(&request).await?;
        debug!(language = %doc.detected_language.name, code = %doc.detected_language.iso6391_name, "Detected language");
        Ok(doc.detected_language)
    }

    #[instrument(level = "info", skip(self, text))]
    async fn analyze_sentiment(
        &self,
        text: &str,
        language: Option<&str>,
    ) -> Result<SentimentDocument, ProviderError> {
        let request = AnalyzeTextRequest {
            kind: "SentimentAnalysis",
            analysis_input: AnalysisInput::single(text, language),
        };
        let doc: SentimentDocument = self.post_analyze(&request).await?;
        debug!(sentiment = %doc.sentiment, sentences = doc.sentences.len(), "Analyzed sentiment");
        Ok(doc)
    }

    #[instrument(level = "info", skip(self, text))]
    async fn extract_summary(
        &self,
        text: &str,
        language: Option<&str>,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/language/analyze-text/jobs", self.endpoint);
        let request = SummaryJobRequest {
            display_name: "news_credibility summary",
            analysis_input: AnalysisInput::single(text, language),
            tasks: vec![SummaryTask {
                kind: "ExtractiveSummarization",
                task_name: "summary",
                parameters: SummaryParameters {
                    sentence_count: self.summary.sentence_count,
                },
            }],
        };
        let resp = self
            .client
            .post(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .header(KEY_HEADER, &self.key)
            .json(&request)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let location = resp
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .ok_or(ProviderError::MissingOperationLocation)?
            .to_string();

        let state = self.wait_for_job(&location).await?;
        let sentences = summary_sentences(state)?;
        Ok(build_summary(&sentences, self.summary.sentence_count))
    }

    async fn wait_for_job(&self, location: &str) -> Result<JobState, ProviderError> {
        let t0 = Instant::now();
        let max_wait = Duration::from_secs(self.summary.max_wait_secs);
        let interval = Duration::from_millis(self.summary.poll_interval_ms);

        loop {
            let resp = self
                .client
                .get(location)
                .header(KEY_HEADER, &self.key)
                .send()
                .await?;
            let state: JobState = check_status(resp).await?.json().await?;

            match job_progress(state, t0.elapsed(), max_wait) {
                Ok(Some(state)) => {
                    debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Summarization job finished");
                    return Ok(state);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Summarization job did not succeed");
                    return Err(e);
                }
            }
            sleep(interval).await;
        }
    }
}

impl TextAnalytics for AzureLanguageClient {
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    async fn analyze(&self, text: &str) -> Result<NlpAnalysis, ProviderError> {
        let t0 = Instant::now();
        let language = self.detect_language(text).await?;
        // "(Unknown)" is what the service reports when it cannot tell
        let hint = Some(language.iso6391_name.as_str()).filter(|c| !c.starts_with('('));

        let (sentiment, summary) = futures::try_join!(
            self.analyze_sentiment(text, hint),
            self.extract_summary(text, hint)
        )?;

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            language = %language.name,
            sentences = sentiment.sentences.len(),
            "Provider analysis complete"
        );

        Ok(NlpAnalysis {
            language: Some(language.name),
            language_code: Some(language.iso6391_name),
            sentiment: Some(sentiment.sentiment),
            sentences: sentiment
                .sentences
                .into_iter()
                .map(|s| SentenceSentiment::new(s.text, s.sentiment))
                .collect(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = AnalyzeTextRequest {
            kind: "SentimentAnalysis",
            analysis_input: AnalysisInput::single("Hola mundo", Some("es")),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "SentimentAnalysis");
        assert_eq!(json["analysisInput"]["documents"][0]["id"], "1");
        assert_eq!(json["analysisInput"]["documents"][0]["language"], "es");
        assert_eq!(json["analysisInput"]["documents"][0]["text"], "Hola mundo");
    }

    #[test]
    fn test_request_without_language_omits_field() {
        let request = AnalyzeTextRequest {
            kind: "LanguageDetection",
            analysis_input: AnalysisInput::single("Hola", None),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["analysisInput"]["documents"][0].get("language").is_none());
    }

    #[test]
    fn test_summary_job_serialization() {
        let request = SummaryJobRequest {
            display_name: "x",
            analysis_input: AnalysisInput::single("Texto", Some("es")),
            tasks: vec![SummaryTask {
                kind: "ExtractiveSummarization",
                task_name: "summary",
                parameters: SummaryParameters { sentence_count: 3 },
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["displayName"], "x");
        assert_eq!(json["tasks"][0]["kind"], "ExtractiveSummarization");
        assert_eq!(json["tasks"][0]["taskName"], "summary");
        assert_eq!(json["tasks"][0]["parameters"]["sentenceCount"], 3);
    }

    #[test]
    fn test_language_response() {
        let body = r#"{
            "kind": "LanguageDetectionResults",
            "results": {
                "documents": [{
                    "id": "1",
                    "detectedLanguage": {"name": "Spanish", "iso6391Name": "es", "confidenceScore": 1.0},
                    "warnings": []
                }],
                "errors": [],
                "modelVersion": "2022-10-01"
            }
        }"#;
        let parsed: AnalyzeTextResponse<LanguageDocument> = serde_json::from_str(body).unwrap();
        let doc = first_document(parsed.results, "LanguageDetection").unwrap();
        assert_eq!(doc.detected_language.name, "Spanish");
        assert_eq!(doc.detected_language.iso6391_name, "es");
    }

    #[test]
    fn test_sentiment_response() {
        let body = r#"{
            "kind": "SentimentAnalysisResults",
            "results": {
                "documents": [{
                    "id": "1",
                    "sentiment": "mixed",
                    "confidenceScores": {"positive": 0.4, "neutral": 0.1, "negative": 0.5},
                    "sentences": [
                        {"sentiment": "positive", "confidenceScores": {"positive": 0.9, "neutral": 0.05, "negative": 0.05},
                         "offset": 0, "length": 20, "text": "El equipo ganó hoy."},
                        {"sentiment": "negative", "confidenceScores": {"positive": 0.0, "neutral": 0.1, "negative": 0.9},
                         "offset": 21, "length": 25, "text": "La afición está furiosa."}
                    ],
                    "warnings": []
                }],
                "errors": [],
                "modelVersion": "2022-11-01"
            }
        }"#;
        let parsed: AnalyzeTextResponse<SentimentDocument> = serde_json::from_str(body).unwrap();
        let doc = first_document(parsed.results, "SentimentAnalysis").unwrap();
        assert_eq!(doc.sentiment, Sentiment::Mixed);
        assert_eq!(doc.sentences.len(), 2);
        assert_eq!(doc.sentences[1].sentiment, Sentiment::Negative);
        assert_eq!(doc.sentences[0].text, "El equipo ganó hoy.");
    }

    #[test]
    fn test_document_error() {
        let body = r#"{
            "kind": "SentimentAnalysisResults",
            "results": {
                "documents": [],
                "errors": [{"id": "1", "error": {"code": "InvalidArgument", "message": "Document text is empty."}}],
                "modelVersion": "2022-11-01"
            }
        }"#;
        let parsed: AnalyzeTextResponse<SentimentDocument> = serde_json::from_str(body).unwrap();
        match first_document(parsed.results, "SentimentAnalysis") {
            Err(ProviderError::Document { code, .. }) => assert_eq!(code, "InvalidArgument"),
            other => panic!("expected document error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_document() {
        let body = r#"{"results": {"documents": [], "errors": []}}"#;
        let parsed: AnalyzeTextResponse<LanguageDocument> = serde_json::from_str(body).unwrap();
        assert!(matches!(
            first_document(parsed.results, "LanguageDetection"),
            Err(ProviderError::MissingResult("LanguageDetection"))
        ));
    }

    #[test]
    fn test_job_state_succeeded() {
        let body = r#"{
            "jobId": "abc",
            "status": "succeeded",
            "errors": [],
            "tasks": {
                "completed": 1, "failed": 0, "inProgress": 0, "total": 1,
                "items": [{
                    "kind": "ExtractiveSummarizationLROResults",
                    "taskName": "summary",
                    "status": "succeeded",
                    "results": {
                        "documents": [{
                            "id": "1",
                            "sentences": [
                                {"text": "Primera frase.", "rankScore": 1.0, "offset": 0, "length": 14},
                                {"text": "Segunda frase.", "rankScore": 0.7, "offset": 15, "length": 14}
                            ],
                            "warnings": []
                        }],
                        "errors": [],
                        "modelVersion": "2022-08-01"
                    }
                }]
            }
        }"#;
        let state: JobState = serde_json::from_str(body).unwrap();
        assert_eq!(state.status, JobStatus::Succeeded);
        let sentences = summary_sentences(state).unwrap();
        assert_eq!(sentences, vec!["Primera frase.", "Segunda frase."]);
        assert_eq!(build_summary(&sentences, 3), "Primera frase. Segunda frase.");
    }

    #[test]
    fn test_job_state_running_and_unknown_status() {
        let state: JobState = serde_json::from_str(r#"{"status": "running"}"#).unwrap();
        assert_eq!(state.status, JobStatus::Running);
        assert!(!state.status.is_terminal_failure());

        let state: JobState = serde_json::from_str(r#"{"status": "exploded"}"#).unwrap();
        assert!(state.status.is_terminal_failure());
    }

    #[test]
    fn test_job_state_without_sentences() {
        let state: JobState = serde_json::from_str(
            r#"{"status": "succeeded", "tasks": {"items": [{"results": {"documents": [{"id": "1", "sentences": []}], "errors": []}}]}}"#,
        )
        .unwrap();
        let sentences = summary_sentences(state).unwrap();
        assert!(sentences.is_empty());
        assert_eq!(build_summary(&sentences, 3), crate::provider::SUMMARY_FALLBACK);
    }

    fn job_state(body: &str) -> JobState {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_job_progress_finished() {
        let state = job_state(r#"{"status": "partiallyCompleted"}"#);
        let done = job_progress(state, Duration::from_secs(1), Duration::from_secs(60)).unwrap();
        assert_eq!(done.map(|s| s.status), Some(JobStatus::PartiallyCompleted));
    }

    #[test]
    fn test_job_progress_keeps_polling() {
        for body in [r#"{"status": "notStarted"}"#, r#"{"status": "running"}"#] {
            let next = job_progress(job_state(body), Duration::from_secs(5), Duration::from_secs(60));
            assert!(matches!(next, Ok(None)));
        }
    }

    #[test]
    fn test_job_progress_failed() {
        let state = job_state(
            r#"{"status": "failed", "errors": [{"code": "InvalidRequest", "message": "Bad task."}]}"#,
        );
        match job_progress(state, Duration::ZERO, Duration::from_secs(60)) {
            Err(ProviderError::JobFailed { status, message }) => {
                assert_eq!(status, "Failed");
                assert_eq!(message, "InvalidRequest: Bad task.");
            }
            other => panic!("expected job failure, got {other:?}"),
        }

        let state = job_state(r#"{"status": "cancelled"}"#);
        assert!(matches!(
            job_progress(state, Duration::ZERO, Duration::from_secs(60)),
            Err(ProviderError::JobFailed { .. })
        ));
    }

    #[test]
    fn test_job_progress_times_out() {
        let state = job_state(r#"{"status": "running"}"#);
        let err = job_progress(state, Duration::from_secs(61), Duration::from_secs(60)).unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(60)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_finished_job_wins_over_timeout() {
        let state = job_state(r#"{"status": "succeeded"}"#);
        let done = job_progress(state, Duration::from_secs(120), Duration::from_secs(60)).unwrap();
        assert!(done.is_some());
    }

    #[test]
    fn test_api_error_reads_service_body() {
        let body = r#"{"error": {"code": "401", "message": "Access denied due to invalid subscription key."}}"#;
        match api_error(401, body) {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "401: Access denied due to invalid subscription key.");
            }
            other => panic!("expected api error, got {other:?}"),
        }
        assert!(!api_error(401, body).is_transient());
    }

    #[test]
    fn test_api_error_plain_body() {
        let err = api_error(503, "Service Unavailable");
        assert!(matches!(
            &err,
            ProviderError::Api { status: 503, message } if message == "Service Unavailable"
        ));
        assert!(err.is_transient());
    }
}
