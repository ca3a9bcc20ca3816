// JSON data contracts exchanged with the extraction, generation, retrieval and
// rendering collaborators. All external field names are camelCase.

pub mod document;
pub mod generation;
pub mod job;
pub mod resume;
pub mod retrieval;
pub mod style;
