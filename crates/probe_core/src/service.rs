use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Backend OCR engine the remote API should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrService {
    Tesseract,
    #[default]
    Google,
    Aws,
}

impl OcrService {
    pub const ALL: [OcrService; 3] = [OcrService::Tesseract, OcrService::Google, OcrService::Aws];

    /// Identifier sent on the wire as `{"service": ...}`.
    pub fn as_str(self) -> &'static str {
        match self {
            OcrService::Tesseract => "tesseract",
            OcrService::Google => "google",
            OcrService::Aws => "aws",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OcrService::Tesseract => "Tesseract (Local)",
            OcrService::Google => "Google Vision API",
            OcrService::Aws => "AWS Textract",
        }
    }
}

impl fmt::Display for OcrService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown OCR service '{0}' (expected one of: tesseract, google, aws)")]
pub struct UnknownService(pub String);

impl FromStr for OcrService {
    type Err = UnknownService;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        OcrService::ALL
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownService(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::OcrService;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Google".parse::<OcrService>().unwrap(), OcrService::Google);
        assert_eq!(" aws ".parse::<OcrService>().unwrap(), OcrService::Aws);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "azure".parse::<OcrService>().unwrap_err();
        assert_eq!(err.0, "azure");
    }

    #[test]
    fn default_is_google() {
        assert_eq!(OcrService::default(), OcrService::Google);
    }
}
