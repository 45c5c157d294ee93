//! Content source backed by the Contentful content delivery API.
//!
//! Steps are entries of content type `step` whose `questions` field links to
//! a question entry. Question entries carry `questionText`, `questionType`,
//! a comma-separated `answers` string and `correctAnswer`.

use std::env;
use std::fmt;

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionKind, QuestionRef, Step, StepId};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::source::{ContentError, ContentSource};

const DEFAULT_CDN_URL: &str = "https://cdn.contentful.com";
const DEFAULT_ENVIRONMENT: &str = "master";
const STEP_CONTENT_TYPE: &str = "step";

#[derive(Clone)]
pub struct ContentfulConfig {
    pub base_url: Url,
    pub space_id: String,
    pub environment: String,
    pub access_token: String,
}

impl ContentfulConfig {
    /// Read the configuration from `QUIZ_*` environment variables.
    ///
    /// Returns `None` when the space or token is missing or blank, or when
    /// `QUIZ_CDN_URL` is not a valid URL.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let required = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let space_id = required("QUIZ_SPACE_ID")?;
        let access_token = required("QUIZ_ACCESS_TOKEN")?;
        let environment =
            required("QUIZ_ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.into());
        let raw_url = required("QUIZ_CDN_URL").unwrap_or_else(|| DEFAULT_CDN_URL.into());
        let base_url = match Url::parse(&raw_url) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(url = %raw_url, error = %err, "ignoring invalid QUIZ_CDN_URL");
                return None;
            }
        };

        Some(Self {
            base_url,
            space_id,
            environment,
            access_token,
        })
    }

    fn entries_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}/entries",
            self.base_url.as_str().trim_end_matches('/'),
            self.space_id,
            self.environment
        )
    }
}

impl fmt::Debug for ContentfulConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentfulConfig")
            .field("base_url", &self.base_url.as_str())
            .field("space_id", &self.space_id)
            .field("environment", &self.environment)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct ContentfulSource {
    client: Client,
    config: Option<ContentfulConfig>,
}

impl ContentfulSource {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ContentfulConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<ContentfulConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
        not_found: &str,
    ) -> Result<T, ContentError> {
        let config = self.config.as_ref().ok_or(ContentError::NotConfigured)?;

        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&config.access_token)
            .send()
            .await
            .map_err(|e| ContentError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound(not_found.to_owned()));
        }
        if !status.is_success() {
            return Err(ContentError::SourceUnavailable(format!(
                "request failed with status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ContentError::SourceUnavailable(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ContentError::SourceUnavailable(e.to_string()))
    }
}

#[async_trait]
impl ContentSource for ContentfulSource {
    async fn load_steps(&self) -> Result<Vec<Step>, ContentError> {
        let config = self.config.as_ref().ok_or(ContentError::NotConfigured)?;
        let url = config.entries_url();
        let body: EntriesResponse = self
            .get_json(url, &[("content_type", STEP_CONTENT_TYPE)], "step entries")
            .await?;
        Ok(body.into_steps())
    }

    async fn load_question(&self, question_ref: &QuestionRef) -> Result<Question, ContentError> {
        let config = self.config.as_ref().ok_or(ContentError::NotConfigured)?;
        let url = format!("{}/{}", config.entries_url(), question_ref);
        let entry: QuestionEntry = self.get_json(url, &[], question_ref.as_str()).await?;
        Ok(entry.fields.into_question())
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    #[serde(default)]
    items: Vec<StepEntry>,
}

impl EntriesResponse {
    fn into_steps(self) -> Vec<Step> {
        self.items
            .into_iter()
            .map(|item| match item.fields.questions {
                Some(link) => Step::new(StepId::new(item.sys.id), QuestionRef::new(link.sys.id)),
                None => {
                    tracing::warn!(step = %item.sys.id, "step entry has no linked question");
                    Step::unlinked(StepId::new(item.sys.id))
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct Sys {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    sys: Sys,
}

#[derive(Debug, Deserialize)]
struct StepEntry {
    sys: Sys,
    #[serde(default)]
    fields: StepFields,
}

#[derive(Debug, Default, Deserialize)]
struct StepFields {
    questions: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct QuestionEntry {
    fields: QuestionFields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionFields {
    #[serde(default)]
    question_text: String,
    #[serde(default)]
    question_type: String,
    #[serde(default)]
    answers: String,
    #[serde(default)]
    correct_answer: String,
}

impl QuestionFields {
    fn into_question(self) -> Question {
        Question::from_answer_list(
            self.question_text,
            QuestionKind::from_label(&self.question_type),
            &self.answers,
            self.correct_answer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn config_requires_space_and_token() {
        assert!(ContentfulConfig::from_lookup(lookup(&[("QUIZ_SPACE_ID", "abc")])).is_none());
        assert!(
            ContentfulConfig::from_lookup(lookup(&[
                ("QUIZ_SPACE_ID", "abc"),
                ("QUIZ_ACCESS_TOKEN", "   "),
            ]))
            .is_none()
        );
    }

    #[test]
    fn config_applies_defaults() {
        let config = ContentfulConfig::from_lookup(lookup(&[
            ("QUIZ_SPACE_ID", "space1"),
            ("QUIZ_ACCESS_TOKEN", "token"),
        ]))
        .unwrap();

        assert_eq!(config.environment, "master");
        assert_eq!(
            config.entries_url(),
            "https://cdn.contentful.com/spaces/space1/environments/master/entries"
        );
    }

    #[test]
    fn config_debug_redacts_access_token() {
        let config = ContentfulConfig::from_lookup(lookup(&[
            ("QUIZ_SPACE_ID", "space1"),
            ("QUIZ_ACCESS_TOKEN", "super-secret-token"),
        ]))
        .unwrap();

        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-token"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("space1"));
    }

    #[test]
    fn config_rejects_invalid_url() {
        let config = ContentfulConfig::from_lookup(lookup(&[
            ("QUIZ_SPACE_ID", "space1"),
            ("QUIZ_ACCESS_TOKEN", "token"),
            ("QUIZ_CDN_URL", "not a url"),
        ]));
        assert!(config.is_none());
    }

    #[test]
    fn step_entries_map_to_ordered_steps() {
        let body = r#"{
            "items": [
                {"sys": {"id": "step-2"}, "fields": {"questions": {"sys": {"id": "q-2"}}}},
                {"sys": {"id": "step-1"}, "fields": {"questions": {"sys": {"id": "q-1"}}}},
                {"sys": {"id": "orphan"}, "fields": {}}
            ]
        }"#;

        let response: EntriesResponse = serde_json::from_str(body).unwrap();
        let steps = response.into_steps();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].id(), &StepId::new("step-2"));
        assert_eq!(steps[0].question_ref(), Some(&QuestionRef::new("q-2")));
        assert_eq!(steps[1].id(), &StepId::new("step-1"));
        assert_eq!(steps[2].id(), &StepId::new("orphan"));
        assert_eq!(steps[2].question_ref(), None);
    }

    #[test]
    fn question_entry_maps_fields() {
        let body = r#"{
            "sys": {"id": "q-1"},
            "fields": {
                "questionText": "Pick B",
                "questionType": "multiple choice",
                "answers": "A, B ,C",
                "correctAnswer": "B"
            }
        }"#;

        let entry: QuestionEntry = serde_json::from_str(body).unwrap();
        let question = entry.fields.into_question();

        assert_eq!(question.text(), "Pick B");
        assert_eq!(question.kind(), &QuestionKind::MultipleChoice);
        assert_eq!(question.choices(), ["A", "B", "C"]);
        assert_eq!(question.correct_choice(), "B");
    }

    #[tokio::test]
    async fn unconfigured_source_reports_not_configured() {
        let source = ContentfulSource::new(None);
        assert!(!source.enabled());
        assert_eq!(
            source.load_steps().await.unwrap_err(),
            ContentError::NotConfigured
        );
    }
}
