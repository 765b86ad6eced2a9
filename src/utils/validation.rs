//! Centralized validation and helper functions.

/// Maximum number of sample columns accepted from a single file
pub const MAX_SAMPLES: usize = 10_000;

/// Input files larger than this are skipped during discovery
pub const MAX_INPUT_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Security-related constants for output naming
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Check a file's declared sample count against the maximum allowed.
///
/// Returns an error message if `count` exceeds the limit, None if it fits.
#[must_use]
pub fn check_sample_limit(count: usize) -> Option<String> {
    if count > MAX_SAMPLES {
        Some(format!("Too many samples: {count} exceeds maximum of {MAX_SAMPLES}"))
    } else {
        None
    }
}

/// Validation error types
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path separators or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
    #[error("File content appears to be binary")]
    BinaryContent,
}

/// Validate the stem of a data file written to the output directory.
///
/// Data file stems come from module keys and config, so they must be plain
/// names: no separators, no traversal, no control characters.
///
/// # Examples
///
/// ```
/// use seglh_qc::utils::validation::validate_data_file_name;
///
/// assert!(validate_data_file_name("multiqc_tso500").is_ok());
/// assert!(validate_data_file_name("../multiqc_tso500").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the name is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains anything other than
/// ASCII alphanumerics, `.`, `-` and `_`, or starts with a dot.
pub fn validate_data_file_name(name: &str) -> Result<&str, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if name.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    if name.starts_with('.')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(name)
}

/// Reject content that is clearly not a text metrics file
///
/// # Errors
///
/// Returns `ValidationError::BinaryContent` if the content contains NUL bytes
/// or more than 5% non-printable characters.
pub fn validate_text_content(content: &[u8]) -> Result<(), ValidationError> {
    if content.contains(&0) {
        return Err(ValidationError::BinaryContent);
    }

    let non_printable_count = content
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32) || b == 127)
        .count();

    // Allow up to 5% non-printable characters for text files
    if content.len() > 100 && non_printable_count > content.len() / 20 {
        return Err(ValidationError::BinaryContent);
    }

    Ok(())
}
