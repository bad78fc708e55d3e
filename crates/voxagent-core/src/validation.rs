//! Attachment file-type validation.

use crate::constants::ACCEPTED_EXTENSIONS;
use crate::error::UploadError;

/// Final dot-delimited suffix of a file name, lowercased.
///
/// Returns `None` when the name has no dot. A trailing dot yields an empty
/// extension.
pub fn file_extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_lowercase())
}

/// Whether a file with this name may become an upload job.
pub fn is_accepted_file_name(file_name: &str) -> bool {
    file_extension(file_name)
        .map(|extension| ACCEPTED_EXTENSIONS.contains(&extension.as_str()))
        .unwrap_or(false)
}

/// Like [`is_accepted_file_name`], naming the rejected file on failure.
pub fn check_file_name(file_name: &str) -> Result<(), UploadError> {
    if is_accepted_file_name(file_name) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedFileType(file_name.to_string()))
    }
}

/// Media type conventionally reported for an accepted extension.
pub fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        "csv" => Some("text/csv"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "xls" => Some("application/vnd.ms-excel"),
        _ => None,
    }
}
