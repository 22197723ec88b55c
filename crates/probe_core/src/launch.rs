use url::Url;

/// Backend used when the page has no network origin of its own.
pub const LOCAL_API_BASE: &str = "http://127.0.0.1:5000";

/// Options carried by the launch URL's query string (`?api=...&demo=true`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchParams {
    pub api: Option<String>,
    pub demo: bool,
}

impl LaunchParams {
    pub fn from_page_url(page: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in page.query_pairs() {
            match key.as_ref() {
                "api" if !value.trim().is_empty() => params.api = Some(value.trim().to_string()),
                "demo" => params.demo = value == "true",
                _ => {}
            }
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("invalid API base URL '{value}': {message}")]
    InvalidApiUrl { value: String, message: String },
    #[error("API base URL '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// Resolves the API base URL: an explicit override wins, then the page's own
/// http(s) origin, then [`LOCAL_API_BASE`].
pub fn resolve_api_base(
    api_override: Option<&str>,
    page: Option<&Url>,
) -> Result<Url, LaunchError> {
    if let Some(raw) = api_override {
        let parsed = Url::parse(raw.trim()).map_err(|err| LaunchError::InvalidApiUrl {
            value: raw.to_string(),
            message: err.to_string(),
        })?;
        if !is_network_scheme(&parsed) {
            return Err(LaunchError::UnsupportedScheme(raw.to_string()));
        }
        return Ok(parsed);
    }

    if let Some(page) = page.filter(|page| is_network_scheme(page)) {
        let origin = page.origin().ascii_serialization();
        if let Ok(url) = Url::parse(&origin) {
            return Ok(url);
        }
    }

    Url::parse(LOCAL_API_BASE).map_err(|err| LaunchError::InvalidApiUrl {
        value: LOCAL_API_BASE.to_string(),
        message: err.to_string(),
    })
}

fn is_network_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
