//! Prompt templates for grounded answer generation

use crate::types::RetrievedDocument;

/// Substituted for the context block when retrieval found nothing
pub const NO_CONTEXT_SENTINEL: &str =
    "No specific information found in the knowledge base for this query.";

/// System message sent ahead of the rendered prompt
pub const SYSTEM_MESSAGE: &str =
    "You are a helpful AI assistant designed to answer questions based on provided context.";

/// Prompt builder for knowledge base questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved texts, best match first, separated by blank lines
    pub fn build_context(context: &[RetrievedDocument]) -> String {
        if context.is_empty() {
            return NO_CONTEXT_SENTINEL.to_string();
        }

        context
            .iter()
            .map(|doc| doc.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Render the full grounding prompt
    pub fn build(query: &str, context: &[RetrievedDocument]) -> String {
        format!(
            r#"You are an empathetic and helpful AI assistant. Your primary goal is to assist users with their questions based *only* on the information provided in the "Knowledge Base Context" below.
If the context does not contain the answer to the question, clearly state that you don't have enough information from the knowledge base. Do not make up information or answer from your general knowledge.
Be calm, polite, understanding and non-judgmental, and aim to provide clear and concise answers.

Knowledge Base Context:
---
{context}
---

User's Question: {query}

Helpful and Empathetic Answer (based *only* on the Knowledge Base Context):
"#,
            context = Self::build_context(context),
            query = query
        )
    }
}
