use reqwest::StatusCode;
use shared::{FieldError, Problem};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("wrong_credentials")]
    WrongCredentials,
    #[error("missing_refresh_token")]
    MissingRefreshToken,
    #[error("api_error status={status} detail={detail}")]
    Api {
        status: StatusCode,
        detail: String,
        errors: Vec<FieldError>,
    },
    #[error("http_error")]
    Http(#[from] reqwest::Error),
    #[error("storage_error")]
    Storage(#[from] std::io::Error),
    #[error("json_error")]
    Json(#[from] serde_json::Error),
}

impl Error {
    // The API answers errors with RFC 9457 problem details, except for a
    // few auth paths that emit a bare `{"detail": "..."}`. Anything else
    // (proxies, crashes) surfaces as raw text.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let fallback = || {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_owned()
            } else {
                trimmed.to_owned()
            }
        };
        match serde_json::from_str::<Problem>(body) {
            Ok(problem) => {
                let detail = problem.detail.or(problem.title).unwrap_or_else(fallback);
                Error::Api {
                    status,
                    detail,
                    errors: problem.errors,
                }
            }
            Err(_) => Error::Api {
                status,
                detail: fallback(),
                errors: Vec::new(),
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        match self {
            Error::WrongCredentials => true,
            Error::Api { status, .. } => *status == StatusCode::UNAUTHORIZED,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}
