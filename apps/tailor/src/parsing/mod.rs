// Text parsing: tokenization, section segmentation, role/project extraction,
// document normalization and skill aggregation.
// Everything here is pure and synchronous; callers decide where it runs.

pub mod experience;
pub mod normalize;
pub mod sections;
pub mod skills;
pub mod tokenizer;
