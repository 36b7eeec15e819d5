//! Two-stage synthesis: degraded outputs, omission policy, and structured
//! reply parsing.

mod common;

use std::sync::Arc;

use common::ScriptedCompletion;
use docqa::answer::NO_ANSWER;
use docqa::config::DocQaConfig;
use docqa::document::{Chunk, SearchResult};
use docqa::synthesizer::AnswerSynthesizer;

fn retrieved(doc_id: &str, chunk_index: usize, text: &str) -> SearchResult {
    SearchResult { chunk: Chunk::new(doc_id, chunk_index, text), score: 1.0 }
}

fn synthesizer(model: Arc<ScriptedCompletion>) -> AnswerSynthesizer {
    AnswerSynthesizer::new(model, DocQaConfig::default())
}

#[tokio::test]
async fn empty_retrieval_returns_default_without_calling_service() {
    let model = Arc::new(ScriptedCompletion::new("{}"));
    let result = synthesizer(model.clone()).process_query("anything", &[]).await.unwrap();

    assert_eq!(result.answer, NO_ANSWER);
    assert!(result.themes.is_empty());
    assert!(result.doc_responses.is_empty());
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn answers_query_with_citations_and_themes() {
    let reply = r#"{
        "answer": "Grass is green because of chlorophyll.",
        "themes": [{
            "name": "Colors in nature",
            "description": "Both documents describe colors of natural things.",
            "supporting_docs": [{"doc_id": "notes.txt", "page": 1}]
        }]
    }"#;
    let model = Arc::new(ScriptedCompletion::new(reply));

    let docs = [retrieved("notes.txt", 0, "The sky is blue. Grass is green.")];
    let result = synthesizer(model.clone()).process_query("What color is grass?", &docs).await.unwrap();

    assert_eq!(result.doc_responses.len(), 1);
    assert_eq!(result.doc_responses[0].doc_id, "notes.txt");
    assert!(result.doc_responses[0].answer.contains("green"));
    assert_eq!(result.doc_responses[0].citation, "Page 1, Para ?");

    assert!(result.answer.contains("green"));
    assert_eq!(result.themes.len(), 1);
    assert_eq!(result.themes[0].name, "Colors in nature");
    assert_eq!(result.themes[0].supporting_docs[0].doc_id, "notes.txt");
    assert_eq!(result.themes[0].supporting_docs[0].page, 1);

    // One extraction call per chunk plus one synthesis call
    let calls = model.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].json_output);
    assert!(calls.last().unwrap().json_output);
}

#[tokio::test]
async fn synthesis_prompt_includes_provenance_for_every_chunk() {
    let model = Arc::new(ScriptedCompletion::new("{}"));
    let docs = [
        retrieved("a.txt", 0, "Alpha content."),
        retrieved("b.txt", 2, "Beta content."),
    ];
    synthesizer(model.clone()).process_query("query", &docs).await.unwrap();

    let calls = model.calls();
    let synthesis = calls.iter().find(|c| c.json_output).unwrap();
    assert!(synthesis.prompt.contains("Document a.txt, Page 1:"));
    assert!(synthesis.prompt.contains("Document b.txt, Page 3:"));
    assert!(synthesis.prompt.contains("Alpha content."));
    assert!(synthesis.prompt.contains("Beta content."));
}

#[tokio::test]
async fn stage_two_failure_keeps_stage_one_rows() {
    let model = Arc::new(ScriptedCompletion::failing_synthesis());
    let docs = [retrieved("notes.txt", 0, "Grass is green.")];

    let result = synthesizer(model).process_query("What color is grass?", &docs).await.unwrap();

    assert_eq!(result.answer, NO_ANSWER);
    assert!(result.themes.is_empty());
    assert_eq!(result.doc_responses.len(), 1);
    assert!(result.doc_responses[0].answer.contains("green"));
}

#[tokio::test]
async fn failed_extraction_is_omitted_not_fatal() {
    let model = Arc::new(
        ScriptedCompletion::new(r#"{"answer": "Synthesized.", "themes": []}"#)
            .with_failing_extractions_containing("Beta"),
    );
    let docs = [
        retrieved("a.txt", 0, "Alpha content."),
        retrieved("b.txt", 0, "Beta content."),
        retrieved("c.txt", 0, "Gamma content."),
    ];

    let result = synthesizer(model).process_query("query", &docs).await.unwrap();

    assert_eq!(result.answer, "Synthesized.");
    let ids: Vec<&str> = result.doc_responses.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(ids, ["a.txt", "c.txt"]);
}

#[tokio::test]
async fn unparsable_synthesis_reply_degrades_to_default() {
    let model = Arc::new(ScriptedCompletion::new("this is not json"));
    let docs = [retrieved("a.txt", 0, "Alpha content.")];

    let result = synthesizer(model).process_query("query", &docs).await.unwrap();

    assert_eq!(result.answer, NO_ANSWER);
    assert!(result.themes.is_empty());
    assert_eq!(result.doc_responses.len(), 1);
}

#[tokio::test]
async fn fenced_json_reply_is_accepted() {
    let reply = "```json\n{\"answer\": \"Fenced but valid.\", \"themes\": []}\n```";
    let model = Arc::new(ScriptedCompletion::new(reply));
    let docs = [retrieved("a.txt", 0, "Alpha content.")];

    let result = synthesizer(model).process_query("query", &docs).await.unwrap();

    assert_eq!(result.answer, "Fenced but valid.");
}

#[tokio::test]
async fn missing_fields_fall_back_to_defaults() {
    let model = Arc::new(ScriptedCompletion::new("{}"));
    let docs = [retrieved("a.txt", 0, "Alpha content.")];

    let result = synthesizer(model).process_query("query", &docs).await.unwrap();

    assert_eq!(result.answer, NO_ANSWER);
    assert!(result.themes.is_empty());
    assert_eq!(result.doc_responses.len(), 1);
}
