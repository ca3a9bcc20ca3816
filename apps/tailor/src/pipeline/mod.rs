// Parse pipeline: fetch document text, normalize, redact, aggregate skills,
// then lay the results out as evidence documents for the embedding step.
// Collaborators (text extraction, entity detection) sit behind async traits.

pub mod embedding;
pub mod extraction;
pub mod parse;
pub mod redaction;

pub use extraction::{DirectoryDocumentSource, DocumentSource, InlineDocumentSource};
pub use parse::{ParseRequest, ParseStage};
pub use redaction::PiiRedactor;
