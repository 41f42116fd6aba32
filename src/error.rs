use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("failed to send the api request")]
    RequestError(#[from] reqwest::Error),

    #[error("failed to parse the api response")]
    ParseError(#[from] serde_json::Error),

    #[error("invalid header value")]
    HeaderValueError(#[from] reqwest::header::InvalidHeaderValue),

    #[error("invalid chart url")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to write the chart")]
    Io(#[from] std::io::Error),

    #[error("no chart configured, call set_config first")]
    MissingChart,

    #[error("account id and api key are required to sign urls")]
    MissingCredentials,

    #[error("short urls must use the quickchart.io host, not {host}")]
    HostPolicy { host: String },

    #[error(
        "{endpoint} request failed with status code {status}{}",
        .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
    )]
    BadStatus {
        endpoint: &'static str,
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("received failure response from chart shorturl endpoint")]
    ShortUrlRejected,

    #[error("chart shorturl response is missing the url")]
    MissingShortUrl,
}

impl Error {
    /// HTTP status of a failed request, if the failure came from the service.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::BadStatus { status, .. } => Some(*status),
            Error::RequestError(err) => err.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_status_message() {
        let err = Error::BadStatus {
            endpoint: "shorturl",
            status: StatusCode::BAD_GATEWAY,
            detail: None,
        };
        assert_eq!(
            err.to_string(),
            "shorturl request failed with status code 502 Bad Gateway"
        );
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));

        let err = Error::BadStatus {
            endpoint: "render",
            status: StatusCode::BAD_REQUEST,
            detail: Some("foo bar".to_string()),
        };
        assert!(err.to_string().ends_with(": foo bar"));
    }

    #[test]
    fn test_host_policy_message() {
        let err = Error::HostPolicy {
            host: "charts.example.com".to_string(),
        };
        assert!(err.to_string().contains("charts.example.com"));
        assert_eq!(err.status(), None);
    }
}
