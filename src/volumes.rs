//! Volume lookup and the retype action.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::auth::Session;
use crate::error::{http_reason, CliError};

/// Optional modifiers for a retype request.
#[derive(Debug, Default, Clone)]
pub struct RetypeRequest {
    pub new_type: Option<String>,
    pub availability_zone: Option<String>,
}

/// Classified result of an action request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected {
        status: u16,
        reason: String,
        detail: String,
    },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Accepted => 0,
            Self::Rejected { .. } => 1,
        }
    }
}

/// Resolve a user-supplied volume ID or name to a unique volume ID.
///
/// The server decides whether the input is an ID: a 200 on the direct lookup
/// returns the input unchanged. Anything else falls back to a name search,
/// which must produce exactly one match.
pub async fn find_volume(session: &Session, id_or_name: &str) -> Result<String, CliError> {
    let url = format!("{}/volumes/{}", session.endpoint, id_or_name);
    let reply = session.get(&url).await?;
    if reply.status() == StatusCode::OK {
        return Ok(id_or_name.to_string());
    }

    let name: String = form_urlencoded::byte_serialize(id_or_name.as_bytes()).collect();
    let url = format!("{}/volumes?name={}", session.endpoint, name);
    let reply = session.get(&url).await?;
    let status = reply.status();
    if !status.is_success() {
        return Err(CliError::Search {
            status: status.as_u16(),
            reason: http_reason(status),
        });
    }

    #[derive(Deserialize)]
    struct VolumeList {
        volumes: Vec<VolumeRef>,
    }
    #[derive(Deserialize)]
    struct VolumeRef {
        id: String,
    }

    let list: VolumeList = reply.json().await?;
    let mut volumes = list.volumes;
    if volumes.len() > 1 {
        return Err(CliError::AmbiguousName(id_or_name.to_string()));
    }
    match volumes.pop() {
        Some(volume) => Ok(volume.id),
        None => Err(CliError::VolumeNotFound(id_or_name.to_string())),
    }
}

/// Issue an `os-retype` action for an already-resolved volume.
///
/// Not retried on failure: a retype issued twice could enqueue two
/// migrations, so rejection is surfaced to the operator as-is.
pub async fn retype(
    session: &Session,
    volume_id: &str,
    request: &RetypeRequest,
) -> Result<Outcome, CliError> {
    #[derive(Serialize)]
    struct ActionBody<'a> {
        #[serde(rename = "os-retype")]
        os_retype: Retype<'a>,
    }
    #[derive(Serialize)]
    struct Retype<'a> {
        migration_policy: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        new_type: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        availability_zone: Option<&'a str>,
    }

    let url = format!("{}/volumes/{}/action", session.endpoint, volume_id);
    let body = ActionBody {
        os_retype: Retype {
            migration_policy: "on-demand",
            new_type: request.new_type.as_deref(),
            availability_zone: request.availability_zone.as_deref(),
        },
    };
    let reply = session.post_json(&url, &body).await?;
    let status = reply.status();
    if status.is_success() {
        return Ok(Outcome::Accepted);
    }
    let text = reply.text().await.unwrap_or_default();
    Ok(Outcome::Rejected {
        status: status.as_u16(),
        reason: http_reason(status),
        detail: error_detail(&text),
    })
}

/// Pull `error.message` out of a JSON error body, falling back to the raw
/// text when the body is not JSON or has a different shape.
fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorInner,
    }
    #[derive(Deserialize)]
    struct ErrorInner {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.to_string(),
    }
}
