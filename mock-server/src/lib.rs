//! In-memory stand-in for the FC middleware and the translation service.
//!
//! Claims live in a shared map keyed by their ICS reference. Validation
//! failures are answered with CISL payloads so clients see the same error
//! shape as in production. Every `/v1/fcs` route requires either a `cookie`
//! or an `Authorization` header.
//!
//! Claim creation, property and person bodies are the bare object; claim
//! mutations and comments arrive wrapped in a `claim` / `comment` envelope.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{patch, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(default)]
    pub ics_ref_no: String,
    #[serde(default)]
    pub policy_number: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub person_id: String,
    #[serde(default)]
    pub ics_ref_no: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default)]
    pub property_id: String,
    #[serde(default)]
    pub ics_ref_no: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub comment_id: String,
    #[serde(default)]
    pub ics_ref_no: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct ClaimEnvelope {
    pub claim: Claim,
}

#[derive(Deserialize)]
pub struct CommentEnvelope {
    pub comment: Comment,
}

#[derive(Deserialize)]
pub struct TranslateRequest {
    pub q: String,
    pub source: String,
    pub target: String,
}

#[derive(Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    #[serde(default)]
    pub client_id: String,
}

#[derive(Default)]
pub struct Store {
    pub claims: HashMap<String, Claim>,
    pub comments: Vec<Comment>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult = Result<Json<Value>, Response>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/v1/fcs/claim", post(create_claim))
        .route(
            "/v1/fcs/claim/{ics_ref_no}",
            patch(mutate_claim).get(get_claim).put(replace_claim).delete(delete_claim),
        )
        .route("/v1/fcs/claim/child/property", patch(mutate_property))
        .route("/v1/fcs/claim/child/person", patch(mutate_person))
        .route("/v1/fcs/claim/child/comment", post(create_comment))
        .route("/translate", post(translate))
        .route("/oauth/token", post(issue_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A CISL validation failure with one violation per `(path, message)`.
pub fn cisl_violations(violations: &[(&str, &str)]) -> Response {
    let violations: Vec<Value> = violations
        .iter()
        .map(|(path, message)| {
            json!({
                "classId": "ConstraintViolation",
                "errorCode": "VALIDATION",
                "message": message,
                "messageType": "ERROR",
                "propertyPath": path,
                "severity": "ERROR",
            })
        })
        .collect();
    let body = json!({
        "classId": "ValidationError",
        "count": violations.len(),
        "violations": violations,
    });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn not_found(ics_ref_no: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("claim {ics_ref_no} not found")).into_response()
}

fn require_auth(headers: &HeaderMap) -> Result<(), Response> {
    if headers.contains_key(header::COOKIE) || headers.contains_key(header::AUTHORIZATION) {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "missing credentials").into_response())
    }
}

async fn create_claim(State(db): State<Db>, headers: HeaderMap, Json(mut claim): Json<Claim>) -> ApiResult {
    require_auth(&headers)?;
    if claim.policy_number.is_empty() {
        return Err(cisl_violations(&[("claim.policyNumber", "must not be blank")]));
    }
    claim.ics_ref_no = format!("ICS-{}", Uuid::new_v4());
    claim.status = "OPEN".to_string();
    db.write().await.claims.insert(claim.ics_ref_no.clone(), claim.clone());
    tracing::info!(ics_ref_no = %claim.ics_ref_no, "claim created");
    Ok(Json(json!({ "claim": claim })))
}

async fn get_claim(State(db): State<Db>, headers: HeaderMap, Path(ics_ref_no): Path<String>) -> ApiResult {
    require_auth(&headers)?;
    let store = db.read().await;
    let claim = store.claims.get(&ics_ref_no).ok_or_else(|| not_found(&ics_ref_no))?;
    Ok(Json(json!({ "claim": claim })))
}

async fn mutate_claim(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(ics_ref_no): Path<String>,
    Json(input): Json<ClaimEnvelope>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut store = db.write().await;
    let claim = store.claims.get_mut(&ics_ref_no).ok_or_else(|| not_found(&ics_ref_no))?;
    if !input.claim.policy_number.is_empty() {
        claim.policy_number = input.claim.policy_number;
    }
    claim.rest.extend(input.claim.rest);
    Ok(Json(json!({ "claim": claim })))
}

async fn replace_claim(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(ics_ref_no): Path<String>,
    Json(input): Json<ClaimEnvelope>,
) -> ApiResult {
    require_auth(&headers)?;
    let mut store = db.write().await;
    let existing = store.claims.get_mut(&ics_ref_no).ok_or_else(|| not_found(&ics_ref_no))?;
    let mut claim = input.claim;
    claim.ics_ref_no = ics_ref_no;
    claim.status = existing.status.clone();
    *existing = claim.clone();
    Ok(Json(json!({ "claim": claim })))
}

/// Unknown references answer with a CISL class id but no violations.
async fn delete_claim(State(db): State<Db>, headers: HeaderMap, Path(ics_ref_no): Path<String>) -> ApiResult {
    require_auth(&headers)?;
    match db.write().await.claims.remove(&ics_ref_no) {
        Some(claim) => Ok(Json(json!({ "claim": claim }))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"classId": "ClaimNotFound", "count": 0, "violations": []})),
        )
            .into_response()),
    }
}

async fn mutate_property(State(db): State<Db>, headers: HeaderMap, Json(mut property): Json<Property>) -> ApiResult {
    require_auth(&headers)?;
    let mut store = db.write().await;
    let claim = store
        .claims
        .get_mut(&property.ics_ref_no)
        .ok_or_else(|| cisl_violations(&[("property.icsRefNo", "unknown claim reference")]))?;
    if property.property_id.is_empty() {
        property.property_id = Uuid::new_v4().to_string();
    }
    claim.properties.retain(|p| p.property_id != property.property_id);
    claim.properties.push(property.clone());
    Ok(Json(json!({ "property": property })))
}

async fn mutate_person(State(db): State<Db>, headers: HeaderMap, Json(mut person): Json<Person>) -> ApiResult {
    require_auth(&headers)?;
    let mut store = db.write().await;
    let claim = store
        .claims
        .get_mut(&person.ics_ref_no)
        .ok_or_else(|| cisl_violations(&[("person.icsRefNo", "unknown claim reference")]))?;
    if person.person_id.is_empty() {
        person.person_id = Uuid::new_v4().to_string();
    }
    claim.persons.retain(|p| p.person_id != person.person_id);
    claim.persons.push(person.clone());
    Ok(Json(json!({ "person": person })))
}

async fn create_comment(State(db): State<Db>, headers: HeaderMap, Json(input): Json<CommentEnvelope>) -> ApiResult {
    require_auth(&headers)?;
    let mut comment = input.comment;
    let mut store = db.write().await;
    if !store.claims.contains_key(&comment.ics_ref_no) {
        return Err(cisl_violations(&[
            ("comment.icsRefNo", "unknown claim reference"),
            ("comment.text", "cannot be attached"),
        ]));
    }
    comment.comment_id = Uuid::new_v4().to_string();
    store.comments.push(comment.clone());
    Ok(Json(json!({ "comment": comment })))
}

/// Prefixes the text with the target language instead of translating it.
async fn translate(Json(input): Json<TranslateRequest>) -> Response {
    if input.source != "en" {
        return (StatusCode::BAD_REQUEST, format!("unsupported source language {}", input.source)).into_response();
    }
    Json(json!({ "translatedText": format!("[{}] {}", input.target, input.q) })).into_response()
}

async fn issue_token(Form(input): Form<TokenRequest>) -> Response {
    if input.grant_type != "client_credentials" {
        return (StatusCode::BAD_REQUEST, "unsupported grant_type").into_response();
    }
    Json(json!({
        "access_token": format!("token-{}", input.client_id),
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_keeps_unknown_fields() {
        let claim: Claim =
            serde_json::from_str(r#"{"policyNumber":"P-1","description":"hail","dateOfLoss":"2024-05-01"}"#).unwrap();
        assert_eq!(claim.policy_number, "P-1");
        assert_eq!(claim.rest["description"], "hail");

        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["dateOfLoss"], "2024-05-01");
        assert_eq!(json["icsRefNo"], "");
    }

    #[test]
    fn envelope_requires_claim_key() {
        let result: Result<ClaimEnvelope, _> = serde_json::from_str(r#"{"policyNumber":"P-1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn token_request_defaults_client_id() {
        let input: TokenRequest = serde_json::from_str(r#"{"grant_type":"client_credentials"}"#).unwrap();
        assert!(input.client_id.is_empty());
    }
}
