use crate::FileMeta;

/// Upload ceiling: 10 MiB.
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    pub allowed_mime_types: Vec<String>,
    pub max_size_bytes: u64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            allowed_mime_types: vec![
                "application/pdf".to_string(),
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
            ],
            max_size_bytes: MAX_FILE_SIZE_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file type ({mime_type}). Please upload PDF, JPG, or PNG files only.")]
    InvalidFileType { mime_type: String },
    #[error(
        "File too large ({}). Please upload files smaller than {}.",
        size_label(.size_bytes),
        size_label(.max_bytes)
    )]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
}

fn size_label(bytes: &u64) -> String {
    crate::format_file_size(*bytes)
}

/// Pre-submission checks. Type is checked before size.
pub fn validate_file(file: &FileMeta, rules: &ValidationRules) -> Result<(), ValidationError> {
    if !rules.allowed_mime_types.contains(&file.mime_type) {
        return Err(ValidationError::InvalidFileType {
            mime_type: file.mime_type.clone(),
        });
    }

    if file.size_bytes > rules.max_size_bytes {
        return Err(ValidationError::FileTooLarge {
            size_bytes: file.size_bytes,
            max_bytes: rules.max_size_bytes,
        });
    }

    Ok(())
}
