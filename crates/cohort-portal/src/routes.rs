//! HTTP routes
//!
//! JSON API over the core's operations. Subject-facing routes are open
//! (login is itself the check); admin and assistant routes re-verify the
//! role headers `x-role-id` / `x-role-secret` on every request - there are
//! no sessions.

use cohort_core::{
    admin, auth, credentials, sequence, AllocationEngine, CoreError, GroupAssignment, Role,
    RoleCredentials,
};
use cohort_messages::MessageGenerator;
use cohort_store::StudyStore;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use warp::http::StatusCode;
use warp::{Filter, Reply};

/// Shared portal state behind every route
pub struct Portal {
    /// Allocation engine over the deployment's store
    pub engine: AllocationEngine<Arc<dyn StudyStore>>,
    /// Fixed role credential pairs
    pub roles: RoleCredentials,
    /// Confirmation-message generator
    pub generator: Box<dyn MessageGenerator>,
    /// Neutral fallback sentence
    pub fallback: String,
    /// Bound on a generation call
    pub message_timeout: Duration,
}

impl Portal {
    /// Store handle shared with the engine
    fn store(&self) -> &Arc<dyn StudyStore> {
        self.engine.store()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    subject_id: String,
    access_code: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    ok: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RevealRequest {
    subject_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RevealResponse {
    group: GroupAssignment,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SequenceResponse {
    sequence: Vec<GroupAssignment>,
    distinct_groups: Vec<GroupAssignment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueRequest {
    subject_id: String,
    forced_group: Option<GroupAssignment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueResponse {
    access_code: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

fn json_reply<T: Serialize>(status: StatusCode, body: &T) -> JsonReply {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> JsonReply {
    json_reply(
        status,
        &ErrorBody {
            error: message.into(),
        },
    )
}

fn core_error_reply(err: &CoreError) -> JsonReply {
    let status = match err {
        CoreError::InvalidSequence(_) => StatusCode::BAD_REQUEST,
        CoreError::EmptySequence => StatusCode::CONFLICT,
        CoreError::Store(_) | CoreError::Malformed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!(error = %err, "request failed");
    error_reply(status, err.to_string())
}

/// Build the full route tree
pub fn routes(
    portal: Arc<Portal>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let api = warp::path("api");

    let login = api
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_portal(Arc::clone(&portal)))
        .and(warp::body::json())
        .and_then(handle_login);

    let reveal = api
        .and(warp::path("reveal"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_portal(Arc::clone(&portal)))
        .and(warp::body::json())
        .and_then(handle_reveal);

    let sequence_get = api
        .and(warp::path!("admin" / "sequence"))
        .and(warp::get())
        .and(with_portal(Arc::clone(&portal)))
        .and(role_headers())
        .and_then(handle_sequence_get);

    let sequence_post = api
        .and(warp::path!("admin" / "sequence"))
        .and(warp::post())
        .and(with_portal(Arc::clone(&portal)))
        .and(role_headers())
        .and(warp::body::content_length_limit(1 << 20))
        .and(warp::body::bytes())
        .and_then(handle_sequence_post);

    let issue = api
        .and(warp::path!("admin" / "credentials"))
        .and(warp::post())
        .and(with_portal(Arc::clone(&portal)))
        .and(role_headers())
        .and(warp::body::json())
        .and_then(handle_issue);

    let reset = api
        .and(warp::path!("admin" / "reset"))
        .and(warp::post())
        .and(with_portal(Arc::clone(&portal)))
        .and(role_headers())
        .and_then(handle_reset);

    let roster = api
        .and(warp::path!("assistant" / "roster"))
        .and(warp::get())
        .and(with_portal(portal))
        .and(role_headers())
        .and_then(handle_roster);

    login
        .or(reveal)
        .or(sequence_get)
        .or(sequence_post)
        .or(issue)
        .or(reset)
        .or(roster)
        .with(warp::trace::request())
}

fn with_portal(
    portal: Arc<Portal>,
) -> impl Filter<Extract = (Arc<Portal>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&portal))
}

fn role_headers(
) -> impl Filter<Extract = (Option<String>, Option<String>), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("x-role-id")
        .and(warp::header::optional::<String>("x-role-secret"))
}

fn check_role(
    portal: &Portal,
    role: Role,
    id: Option<String>,
    secret: Option<String>,
) -> Result<(), JsonReply> {
    let ok = match (id, secret) {
        (Some(id), Some(secret)) => portal.roles.verify(role, &id, &secret),
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(error_reply(StatusCode::UNAUTHORIZED, "invalid role credentials"))
    }
}

async fn handle_login(
    portal: Arc<Portal>,
    req: LoginRequest,
) -> Result<JsonReply, warp::Rejection> {
    match auth::verify_subject(portal.store(), req.subject_id.trim(), req.access_code.trim()) {
        Ok(ok) => {
            let status = if ok { StatusCode::OK } else { StatusCode::UNAUTHORIZED };
            Ok(json_reply(status, &LoginResponse { ok }))
        }
        Err(e) => Ok(core_error_reply(&e)),
    }
}

async fn handle_reveal(
    portal: Arc<Portal>,
    req: RevealRequest,
) -> Result<JsonReply, warp::Rejection> {
    let enrollment = match portal.engine.enroll(req.subject_id.trim()) {
        Ok(enrollment) => enrollment,
        Err(e) => return Ok(core_error_reply(&e)),
    };

    // The enrollment is already recorded; the message is decoration and
    // must never fail the request.
    let message = cohort_messages::generate_or_fallback(
        portal.generator.as_ref(),
        &enrollment.group.group_name,
        &portal.fallback,
        portal.message_timeout,
    )
    .await;

    Ok(json_reply(
        StatusCode::OK,
        &RevealResponse {
            group: enrollment.group,
            message,
        },
    ))
}

async fn handle_sequence_get(
    portal: Arc<Portal>,
    id: Option<String>,
    secret: Option<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(denied) = check_role(&portal, Role::Administrator, id, secret) {
        return Ok(denied);
    }
    match sequence::load_sequence(portal.store()) {
        Ok(seq) => {
            let distinct = sequence::distinct_groups(&seq);
            Ok(json_reply(
                StatusCode::OK,
                &SequenceResponse {
                    sequence: seq,
                    distinct_groups: distinct,
                },
            ))
        }
        Err(e) => Ok(core_error_reply(&e)),
    }
}

async fn handle_sequence_post(
    portal: Arc<Portal>,
    id: Option<String>,
    secret: Option<String>,
    body: bytes::Bytes,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(denied) = check_role(&portal, Role::Administrator, id, secret) {
        return Ok(denied);
    }
    let Ok(payload) = std::str::from_utf8(&body) else {
        return Ok(error_reply(StatusCode::BAD_REQUEST, "body must be UTF-8"));
    };
    match sequence::replace_sequence_json(portal.store(), payload) {
        Ok(seq) => {
            let distinct = sequence::distinct_groups(&seq);
            Ok(json_reply(
                StatusCode::OK,
                &SequenceResponse {
                    sequence: seq,
                    distinct_groups: distinct,
                },
            ))
        }
        Err(e) => Ok(core_error_reply(&e)),
    }
}

async fn handle_issue(
    portal: Arc<Portal>,
    id: Option<String>,
    secret: Option<String>,
    req: IssueRequest,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(denied) = check_role(&portal, Role::Administrator, id, secret) {
        return Ok(denied);
    }
    match credentials::issue(portal.store(), req.subject_id.trim(), req.forced_group) {
        Ok(access_code) => Ok(json_reply(StatusCode::OK, &IssueResponse { access_code })),
        Err(e) => Ok(core_error_reply(&e)),
    }
}

async fn handle_reset(
    portal: Arc<Portal>,
    id: Option<String>,
    secret: Option<String>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(denied) = check_role(&portal, Role::Administrator, id, secret) {
        return Ok(denied);
    }
    match admin::reset_all(portal.store()) {
        Ok(()) => Ok(json_reply(StatusCode::OK, &serde_json::json!({ "ok": true }))),
        Err(e) => Ok(core_error_reply(&e)),
    }
}

async fn handle_roster(
    portal: Arc<Portal>,
    id: Option<String>,
    secret: Option<String>,
) -> Result<JsonReply, warp::Rejection> {
    // The assistant's own pair or the administrator's works here; the
    // roster is read-only either way.
    let assistant = check_role(&portal, Role::ResearchAssistant, id.clone(), secret.clone());
    if assistant.is_err() {
        if let Err(denied) = check_role(&portal, Role::Administrator, id, secret) {
            return Ok(denied);
        }
    }
    match admin::roster(portal.store()) {
        Ok(roster) => Ok(json_reply(StatusCode::OK, &roster)),
        Err(e) => Ok(core_error_reply(&e)),
    }
}
