//! Data models for Daybook

mod archive;
mod goal;
mod habit;
mod note;
mod user;

pub use archive::*;
pub use goal::*;
pub use habit::*;
pub use note::*;
pub use user::*;

/// Trim a mandatory text field, rejecting blank values.
pub(crate) fn required_text(field: &'static str, value: Option<&str>) -> crate::Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(crate::Error::validation(format!("{field} is required"))),
    }
}
