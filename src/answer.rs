//! Query result types and structured-reply parsing.
//!
//! The synthesis stage asks the completion service for a JSON object; this
//! module holds the well-typed result shapes and the validated
//! deserialization step that turns the raw reply into them, with explicit
//! defaults for every optional field.

use serde::{Deserialize, Serialize};

use crate::error::{DocQaError, Result};

/// Answer text substituted when synthesis fails or produces nothing.
pub const NO_ANSWER: &str = "No answer generated.";

/// Per-document extraction result from Stage 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentResponse {
    /// Identifier of the source document.
    pub doc_id: String,
    /// The extracted answer text.
    pub answer: String,
    /// Formatted page/paragraph reference, e.g. `"Page 2, Para ?"`.
    pub citation: String,
}

/// A `{doc_id, page}` reference supporting a [`Theme`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportingDoc {
    /// Identifier of the supporting document.
    #[serde(default)]
    pub doc_id: String,
    /// Page number cited by the synthesis stage.
    #[serde(default)]
    pub page: u64,
}

/// A cross-document theme identified by the synthesis stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    /// Theme title.
    #[serde(default)]
    pub name: String,
    /// Short explanation of the theme.
    #[serde(default)]
    pub description: String,
    /// Documents supporting the theme, in the order the service listed them.
    #[serde(default)]
    pub supporting_docs: Vec<SupportingDoc>,
}

/// The aggregate result of one query: a synthesized answer, its themes, and
/// the per-document extraction rows.
///
/// Entirely transient; held only for the duration of rendering a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    /// The multi-paragraph synthesized answer.
    pub answer: String,
    /// Themes identified across the retrieved documents.
    pub themes: Vec<Theme>,
    /// Per-document extraction results from Stage 1.
    pub doc_responses: Vec<DocumentResponse>,
}

impl QueryResult {
    /// A degraded result carrying the default answer and no themes, keeping
    /// whatever Stage-1 rows were produced.
    pub fn degraded(doc_responses: Vec<DocumentResponse>) -> Self {
        Self { answer: NO_ANSWER.to_string(), themes: Vec::new(), doc_responses }
    }
}

/// The structured JSON shape requested from the synthesis call.
#[derive(Debug, Deserialize)]
pub(crate) struct SynthesisReply {
    #[serde(default = "default_answer")]
    pub answer: String,
    #[serde(default)]
    pub themes: Vec<Theme>,
}

fn default_answer() -> String {
    NO_ANSWER.to_string()
}

/// Parse the synthesis reply, tolerating surrounding markdown code fences.
///
/// Missing fields fall back to explicit defaults; anything that is not a JSON
/// object of the expected shape is a [`DocQaError::MalformedResponse`].
pub(crate) fn parse_synthesis_reply(raw: &str) -> Result<SynthesisReply> {
    let body = strip_code_fences(raw);
    serde_json::from_str(body)
        .map_err(|e| DocQaError::MalformedResponse(format!("invalid synthesis JSON: {e}")))
}

/// Strip a leading/trailing markdown code fence, which some models wrap
/// around JSON replies even in structured output mode.
fn strip_code_fences(s: &str) -> &str {
    let trimmed = s.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
