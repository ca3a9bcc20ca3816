// Style inference and style-driven text layout.
// The builder reads a sample resume; the formatter applies the resulting profile.

pub mod formatter;
pub mod style_profile;

pub use formatter::LayoutFormatter;
pub use style_profile::build_style_profile;
