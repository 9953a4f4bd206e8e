//! Typed request builder for the FC middleware.
//!
//! # Design
//! `FcsObject` closes the set of objects the middleware accepts, so every
//! variant has exactly one handler and no "unsupported type" case exists.
//! Building the call (`FcsObject::rpc_call`) is separate from performing it
//! (`fcs_request_builder`), which keeps routing testable without I/O.
//!
//! Claims are the only branching case: a non-empty `ics_ref_no` means the
//! claim already exists and is mutated in place, otherwise it is created.
//!
//! Property, person and new-claim bodies are the bare object. Only claim
//! mutations and comments travel inside a `{"claim"|"comment": ...}` envelope.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::rpc::RpcClient;
use crate::types::{
    Claim, Comment, CreateClaimCommentRequest, CreateClaimCommentResponse, CreateClaimResponse,
    MutateClaimPersonResponse, MutateClaimPropertyResponse, MutateClaimRequest, Person, Property,
};

pub const CREATE_CLAIM_PATH: &str = "/v1/fcs/claim";
pub const MUTATE_PROPERTY_PATH: &str = "/v1/fcs/claim/child/property";
pub const MUTATE_PERSON_PATH: &str = "/v1/fcs/claim/child/person";
pub const DOC_UPLOAD_PATH: &str = "/v1/document/upload";
pub const CREATE_COMMENT_PATH: &str = "/v1/fcs/claim/child/comment";

/// Everything but RFC 3986 unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Path of an existing claim, with the reference escaped as one segment.
pub fn claim_path(ics_ref_no: &str) -> String {
    format!("{CREATE_CLAIM_PATH}/{}", utf8_percent_encode(ics_ref_no, PATH_SEGMENT))
}

/// An object the FC middleware knows how to store.
#[derive(Debug, Clone, PartialEq)]
pub enum FcsObject {
    Property(Property),
    Person(Person),
    Claim(Claim),
    Comment(Comment),
}

impl From<Property> for FcsObject {
    fn from(value: Property) -> Self {
        FcsObject::Property(value)
    }
}

impl From<Person> for FcsObject {
    fn from(value: Person) -> Self {
        FcsObject::Person(value)
    }
}

impl From<Claim> for FcsObject {
    fn from(value: Claim) -> Self {
        FcsObject::Claim(value)
    }
}

impl From<Comment> for FcsObject {
    fn from(value: Comment) -> Self {
        FcsObject::Comment(value)
    }
}

/// Outcome of `fcs_request_builder`, one variant per `FcsObject` variant.
///
/// Comments only yield the id the middleware assigned.
#[derive(Debug, Clone, PartialEq)]
pub enum FcsResponse {
    Property(MutateClaimPropertyResponse),
    Person(MutateClaimPersonResponse),
    Claim(CreateClaimResponse),
    CommentId(String),
}

/// Method, path and encoded body for one middleware call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: String,
}

impl RpcCall {
    fn new<B: Serialize>(method: HttpMethod, path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(Self {
            method,
            path: path.into(),
            body,
        })
    }
}

impl FcsObject {
    /// Route this object to its middleware call.
    pub fn rpc_call(&self) -> Result<RpcCall, ApiError> {
        match self {
            FcsObject::Property(property) => RpcCall::new(HttpMethod::Patch, MUTATE_PROPERTY_PATH, property),
            FcsObject::Person(person) => RpcCall::new(HttpMethod::Patch, MUTATE_PERSON_PATH, person),
            FcsObject::Claim(claim) if !claim.ics_ref_no.is_empty() => RpcCall::new(
                HttpMethod::Patch,
                claim_path(&claim.ics_ref_no),
                &MutateClaimRequest { claim },
            ),
            FcsObject::Claim(claim) => RpcCall::new(HttpMethod::Post, CREATE_CLAIM_PATH, claim),
            FcsObject::Comment(comment) => RpcCall::new(
                HttpMethod::Post,
                CREATE_COMMENT_PATH,
                &CreateClaimCommentRequest { comment },
            ),
        }
    }
}

/// Build and perform the middleware call for `object`.
pub async fn fcs_request_builder<R>(ctx: &RequestContext, rpc: &R, object: &FcsObject) -> Result<FcsResponse, ApiError>
where
    R: RpcClient + ?Sized,
{
    let call = object.rpc_call()?;
    tracing::debug!(method = %call.method, path = %call.path, "dispatching fcs call");

    match object {
        FcsObject::Property(_) => Ok(FcsResponse::Property(perform(ctx, rpc, call).await?)),
        FcsObject::Person(_) => Ok(FcsResponse::Person(perform(ctx, rpc, call).await?)),
        FcsObject::Claim(_) => Ok(FcsResponse::Claim(perform(ctx, rpc, call).await?)),
        FcsObject::Comment(_) => {
            let response: CreateClaimCommentResponse = perform(ctx, rpc, call).await?;
            Ok(FcsResponse::CommentId(response.comment_id().to_string()))
        }
    }
}

async fn perform<T, R>(ctx: &RequestContext, rpc: &R, call: RpcCall) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    R: RpcClient + ?Sized,
{
    let value = rpc.call(ctx, call.method, &call.path, call.body).await?;
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
}
