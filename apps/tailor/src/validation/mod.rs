// Rule-based checks over generated output. Validation never fails; a report
// with issues is an ordinary result.

pub mod patterns;
pub mod validator;

pub use validator::ResumeValidator;
