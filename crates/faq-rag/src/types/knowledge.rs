//! Knowledge base entries and their indexed forms

use serde::{Deserialize, Serialize};

/// A single question/answer pair authored for the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Author-assigned identifier, unique within the source
    pub id: String,
    /// The question as a user might phrase it
    pub question: String,
    /// The canonical answer
    pub answer: String,
}

impl KnowledgeEntry {
    /// Create a new entry
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Canonical text embedded for this entry
    pub fn canonical_text(&self) -> String {
        format!("Question: {} Answer: {}", self.question, self.answer)
    }
}

/// Metadata stored alongside every indexed vector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub original_question: String,
    pub original_answer: String,
    pub entry_id: String,
}

/// A knowledge entry normalized into embeddable text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddableDocument {
    /// `"Question: {q} Answer: {a}"`
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl From<&KnowledgeEntry> for EmbeddableDocument {
    fn from(entry: &KnowledgeEntry) -> Self {
        Self {
            text: entry.canonical_text(),
            metadata: DocumentMetadata {
                original_question: entry.question.clone(),
                original_answer: entry.answer.clone(),
                entry_id: entry.id.clone(),
            },
        }
    }
}

/// A document with its embedding, as stored in the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedVector {
    /// Storage key, unique within a collection
    pub id: String,
    pub embedding: Vec<f32>,
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl IndexedVector {
    /// Attach an embedding to a document
    pub fn new(id: impl Into<String>, document: EmbeddableDocument, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            embedding,
            text: document.text,
            metadata: document.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_text() {
        let entry = KnowledgeEntry::new(
            "faq001",
            "What are my payment options?",
            "You can pay online, by direct debit, or by phone.",
        );

        let doc = EmbeddableDocument::from(&entry);
        assert_eq!(
            doc.text,
            "Question: What are my payment options? Answer: You can pay online, by direct debit, or by phone."
        );
        assert_eq!(doc.metadata.entry_id, "faq001");
        assert_eq!(doc.metadata.original_question, entry.question);
        assert_eq!(doc.metadata.original_answer, entry.answer);
    }
}
