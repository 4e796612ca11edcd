use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result code carried next to every piece of returned content.
///
/// `Success` (1) is the only value for which the content is valid. Every
/// other value is zero or negative and means the content is absent or
/// partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum DomainStatus {
    /// HTTP 200, 201 or 204.
    Success = 1,
    /// Any other non-2xx answer.
    #[default]
    Unclassified = 0,
    /// No HTTP exchange completed.
    TransportFailure = -1,
    /// HTTP 404.
    NotFound = -2,
    /// HTTP 412: the ETag sent with the request is stale.
    PreconditionFailed = -4,
    /// HTTP 401, even after the pre-call refresh.
    Unauthorized = -8,
    /// HTTP 400 on an index-addressed request.
    BadRequestIndex = -9,
    /// HTTP 400 on a favorite add or delete.
    BadRequestFavorite = -11,
}

impl DomainStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == DomainStatus::Success
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(DomainStatus::Success),
            0 => Some(DomainStatus::Unclassified),
            -1 => Some(DomainStatus::TransportFailure),
            -2 => Some(DomainStatus::NotFound),
            -4 => Some(DomainStatus::PreconditionFailed),
            -8 => Some(DomainStatus::Unauthorized),
            -9 => Some(DomainStatus::BadRequestIndex),
            -11 => Some(DomainStatus::BadRequestFavorite),
            _ => None,
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DomainStatus::Success => "success",
            DomainStatus::Unclassified => "unclassified failure",
            DomainStatus::TransportFailure => "transport failure",
            DomainStatus::NotFound => "resource not found",
            DomainStatus::PreconditionFailed => "precondition failed",
            DomainStatus::Unauthorized => "unauthorized",
            DomainStatus::BadRequestIndex => "bad request (invalid index)",
            DomainStatus::BadRequestFavorite => "bad request (favorite)",
        };
        write!(f, "{} ({})", text, self.code())
    }
}

/// What happened at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// An HTTP exchange completed with this status code.
    Completed(u16),
    /// No HTTP exchange completed.
    Failed,
}

/// Which kind of request produced the answer. Only HTTP 400 depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestContext {
    #[default]
    General,
    /// Requests addressing a playlist entry by index.
    Index,
    /// Adding or removing a user favorite.
    Favorite,
}

/// Error document returned by the API alongside a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default, alias = "sub_status")]
    pub sub_status: Option<u64>,
    #[serde(default)]
    pub user_message: Option<String>,
}

impl ErrorBody {
    /// Decodes an error document, returning `None` for empty or non-JSON bodies.
    pub fn parse(body: &[u8]) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        serde_json::from_slice(body).ok()
    }
}

/// Maps a transport outcome and HTTP status to a [`DomainStatus`].
///
/// Total over every input: unknown statuses fall into `Unclassified`. The
/// error body never changes the code, it only feeds diagnostics.
pub fn classify(
    outcome: Outcome,
    context: RequestContext,
    error_body: Option<&ErrorBody>,
) -> DomainStatus {
    let status = match outcome {
        Outcome::Failed => DomainStatus::TransportFailure,
        Outcome::Completed(200 | 201 | 204) => DomainStatus::Success,
        Outcome::Completed(400) => match context {
            RequestContext::Favorite => DomainStatus::BadRequestFavorite,
            RequestContext::Index | RequestContext::General => DomainStatus::BadRequestIndex,
        },
        Outcome::Completed(401) => DomainStatus::Unauthorized,
        Outcome::Completed(404) => DomainStatus::NotFound,
        Outcome::Completed(412) => DomainStatus::PreconditionFailed,
        Outcome::Completed(_) => DomainStatus::Unclassified,
    };

    debug!(
        ?outcome,
        ?context,
        code = status.code(),
        user_message = error_body.and_then(|b| b.user_message.as_deref()),
        "classified response"
    );

    status
}

/// Human readable diagnostic for a failed call.
pub fn describe(status: DomainStatus, resource_id: Option<&str>, body: Option<&ErrorBody>) -> String {
    let mut message = match (status, resource_id) {
        (DomainStatus::NotFound, Some(id)) => format!("resource {} not found", id),
        (DomainStatus::PreconditionFailed, Some(id)) => format!("resource {} eTag invalid", id),
        (_, Some(id)) => format!("{} for {}", status, id),
        (_, None) => status.to_string(),
    };

    if let Some(user_message) = body.and_then(|b| b.user_message.as_deref()) {
        message.push_str(": ");
        message.push_str(user_message);
    }

    message
}
