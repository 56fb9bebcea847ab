//! vb-project: request documents, tolerant number input, and display preferences.

pub mod convert;
pub mod evaluate;
pub mod numeric;
pub mod preferences;
pub mod schema;
pub mod validate;

pub use evaluate::{Outcome, evaluate};
pub use numeric::{NumericInput, parse_numeric};
pub use preferences::{DecimalSeparator, Language, Preferences, format_number, format_with};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_document, validate_request};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Walther(#[from] vb_walther::WaltherError),

    #[error(transparent)]
    Blend(#[from] vb_blend::BlendError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<RequestDocument> {
    let content = std::fs::read_to_string(path)?;
    let doc: RequestDocument = serde_yaml::from_str(&content)?;
    validate_document(&doc)?;
    Ok(doc)
}

pub fn save_yaml(path: &std::path::Path, doc: &RequestDocument) -> ProjectResult<()> {
    validate_document(doc)?;
    let content = serde_yaml::to_string(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<RequestDocument> {
    let content = std::fs::read_to_string(path)?;
    let doc: RequestDocument = serde_json::from_str(&content)?;
    validate_document(&doc)?;
    Ok(doc)
}

pub fn save_json(path: &std::path::Path, doc: &RequestDocument) -> ProjectResult<()> {
    validate_document(doc)?;
    let content = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a document, choosing the format from the file extension (`.json`, else YAML).
pub fn load(path: &std::path::Path) -> ProjectResult<RequestDocument> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
