//! Claim-domain DTOs exchanged with the FC middleware.
//!
//! # Design
//! The field set follows the middleware's JSON contract (camelCase keys,
//! every field optional on input). The adapter only inspects
//! `Claim::ics_ref_no` and the comment id in `CreateClaimCommentResponse`;
//! everything else passes through untouched.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Claim {
    /// Reference assigned by the middleware once the claim exists.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ics_ref_no: String,
    pub policy_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_loss: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub persons: Vec<Person>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub person_id: String,
    pub ics_ref_no: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub property_id: String,
    pub ics_ref_no: String,
    pub property_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment_id: String,
    pub ics_ref_no: String,
    pub author: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

// Request envelopes. Property, person and new-claim bodies go out bare.

#[derive(Debug, Clone, Serialize)]
pub struct MutateClaimRequest<'a> {
    pub claim: &'a Claim,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateClaimCommentRequest<'a> {
    pub comment: &'a Comment,
}

// Responses.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateClaimResponse {
    pub claim: Option<Claim>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutateClaimPropertyResponse {
    pub property: Option<Property>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutateClaimPersonResponse {
    pub person: Option<Person>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateClaimCommentResponse {
    pub comment: Option<Comment>,
}

impl CreateClaimCommentResponse {
    /// Id of the created comment, empty when the middleware sent none.
    pub fn comment_id(&self) -> &str {
        self.comment.as_ref().map(|c| c.comment_id.as_str()).unwrap_or_default()
    }
}
