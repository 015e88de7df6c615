use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Reasons a configured feed URL is refused.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("Private or loopback address not allowed: {0}")]
    PrivateHost(String),
}

/// Validates a feed source URL.
///
/// Only `http` and `https` are accepted. Unless `allow_private` is set,
/// `localhost`, loopback, link-local and private-range IP literals are
/// rejected so a config file cannot point the server at internal services.
///
/// # Arguments
///
/// * `url_str` - The URL string to validate
/// * `allow_private` - Accept loopback and private-network hosts
///
/// # Returns
///
/// The parsed [`Url`] on success.
///
/// # Errors
///
/// Returns [`UrlValidationError`] if:
/// - The URL cannot be parsed ([`UrlValidationError::InvalidUrl`])
/// - The scheme is not `http` or `https` ([`UrlValidationError::UnsupportedScheme`])
/// - The URL has no host ([`UrlValidationError::MissingHost`])
/// - The host is loopback or private and `allow_private` is off
///   ([`UrlValidationError::PrivateHost`])
///
/// # Examples
///
/// ```
/// use jobfeed::util::validate_url;
///
/// assert!(validate_url("https://remoteok.com/remote-jobs.rss", false).is_ok());
/// assert!(validate_url("http://192.168.1.1/feed", false).is_err());
/// assert!(validate_url("http://127.0.0.1:8080/feed", true).is_ok());
/// assert!(validate_url("file:///etc/passwd", true).is_err());
/// ```
pub fn validate_url(url_str: &str, allow_private: bool) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    let host = url.host_str().ok_or(UrlValidationError::MissingHost)?;
    if allow_private {
        return Ok(url);
    }

    if host.eq_ignore_ascii_case("localhost") {
        return Err(UrlValidationError::PrivateHost(host.to_owned()));
    }

    // IPv6 hosts come back bracketed from host_str()
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    if let Ok(ip) = bare.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(UrlValidationError::PrivateHost(ip.to_string()));
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local, fe80::/10 link local
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80
        }
    }
}
