//! Turns the service's response body into answer text.
//!
//! Deployments answer in one of two shapes: a flat `{ "answer": ... }` object,
//! or a structured list of retrieved passages. The shape is picked while
//! decoding, never at request time.

use std::fmt::Write as _;

use serde::{Deserialize, Deserializer};

pub const NO_RESULTS_MESSAGE: &str = "No relevant results were found for your query.";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QueryResponse {
    Flat { answer: String },
    Structured(StructuredResponse),
}

#[derive(Debug, Default, Deserialize)]
struct StructuredResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    success: bool,
    #[serde(default)]
    total_results: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    results: Vec<ResultEntry>,
    #[serde(default)]
    search_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResultEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub metadata: Option<SourceMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SourceMetadata {
    #[serde(default, rename = "empresa", alias = "organization")]
    pub organization: Option<String>,
    #[serde(default, rename = "departamento", alias = "department")]
    pub department: Option<String>,
    #[serde(default, rename = "arquivo_original", alias = "original_file")]
    pub original_file: Option<String>,
}

/// Reads an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Builds the answer text for a successful response body.
pub fn synthesize_answer(body: &serde_json::Value) -> Result<String, serde_json::Error> {
    let response = QueryResponse::deserialize(body)?;
    Ok(match response {
        QueryResponse::Flat { answer } => answer,
        QueryResponse::Structured(structured) => render_structured(&structured),
    })
}

fn render_structured(response: &StructuredResponse) -> String {
    if !response.success || response.results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let total = response
        .total_results
        .unwrap_or(response.results.len() as u64);
    let mut out = format!("**Found {total} relevant result(s):**\n\n");
    for (index, entry) in response.results.iter().enumerate() {
        let _ = write!(out, "**{}.** {}\n\n", index + 1, entry.content);
        if let Some(meta) = &entry.metadata {
            out.push_str(&source_line(meta));
            out.push_str("\n\n");
        }
    }

    let scope = match response.search_type.as_deref() {
        Some("global") => "Global",
        _ => "Scoped",
    };
    let _ = write!(out, "---\n*Search scope: {scope}*");
    out
}

fn source_line(meta: &SourceMetadata) -> String {
    let mut line = format!(
        "*Source: {} - {}",
        meta.organization.as_deref().unwrap_or("N/A"),
        meta.department.as_deref().unwrap_or("N/A")
    );
    if let Some(file) = &meta.original_file {
        let _ = write!(line, " ({file})");
    }
    line.push('*');
    line
}
