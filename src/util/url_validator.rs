use thiserror::Error;
use url::Url;

/// Reasons an API base URL is rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BaseUrlError {
    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("Base URL must not carry a query string or fragment")]
    QueryOrFragment,
}

/// Validates the backend base URL and normalizes it for endpoint joining.
///
/// Unlike feed URLs, loopback and private hosts are allowed here: the backend
/// normally runs next to the client (`http://localhost:5000` by default).
///
/// The returned URL always ends with a `/` so that `Url::join("api/blogs")`
/// keeps any path prefix (`https://example.com/legal/` → `.../legal/api/blogs`).
///
/// ```
/// use lexfeed::util::validate_base_url;
///
/// let url = validate_base_url("https://example.com/legal").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/legal/");
///
/// assert!(validate_base_url("ftp://example.com").is_err());
/// assert!(validate_base_url("not a url").is_err());
/// ```
pub fn validate_base_url(raw: &str) -> Result<Url, BaseUrlError> {
    let mut url = Url::parse(raw.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(BaseUrlError::UnsupportedScheme(other.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(BaseUrlError::MissingHost),
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(BaseUrlError::QueryOrFragment);
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_default_accepted() {
        let url = validate_base_url("http://localhost:5000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_trailing_slash_preserved() {
        let url = validate_base_url("https://api.example.com/").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/");
    }

    #[test]
    fn test_path_prefix_kept_for_join() {
        let url = validate_base_url("https://example.com/legal").unwrap();
        let joined = url.join("api/blogs").unwrap();
        assert_eq!(joined.as_str(), "https://example.com/legal/api/blogs");
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert!(validate_base_url("  http://127.0.0.1:8080  ").is_ok());
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert_eq!(
            validate_base_url("file:///etc/passwd"),
            Err(BaseUrlError::UnsupportedScheme("file".to_string()))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            validate_base_url("localhost:5000/api"),
            Err(BaseUrlError::UnsupportedScheme(_)) | Err(BaseUrlError::Parse(_))
        ));
        assert!(matches!(
            validate_base_url(""),
            Err(BaseUrlError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_query_and_fragment() {
        assert_eq!(
            validate_base_url("http://localhost:5000/?debug=1"),
            Err(BaseUrlError::QueryOrFragment)
        );
        assert_eq!(
            validate_base_url("http://localhost:5000/#top"),
            Err(BaseUrlError::QueryOrFragment)
        );
    }
}
