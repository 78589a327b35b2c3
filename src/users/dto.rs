use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo_types::{User, UserPatch};
use crate::users::timestamp;

/// Body of `POST /create`. Every field is optional here so that a missing
/// one is reported as a validation failure rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Body of `PUT /update/:email`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Empty strings count as "not supplied".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            password_hash: non_empty(req.password_hash),
            full_name: non_empty(req.full_name),
            phone_number: non_empty(req.phone_number),
            address: non_empty(req.address),
            profile_picture_url: non_empty(req.profile_picture_url),
            is_active: req.is_active,
            is_verified: req.is_verified,
            updated_at: req.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "totalStudents")]
    pub total_students: usize,
    pub data: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserDetailsResponse {
    pub success: bool,
    #[serde(rename = "userDetails")]
    pub user_details: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_false_survives_and_empty_strings_drop() {
        let req: UpdateUserRequest = serde_json::from_str(
            r#"{"full_name":"","address":"new","is_active":false}"#,
        )
        .unwrap();
        let patch = UserPatch::from(req);
        assert_eq!(patch.full_name, None);
        assert_eq!(patch.address.as_deref(), Some("new"));
        assert_eq!(patch.is_active, Some(false));
        assert_eq!(patch.is_verified, None);
    }

    #[test]
    fn unknown_and_immutable_fields_are_ignored_on_update() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"email":"b@x.com","created_at":"2024-01-01"}"#).unwrap();
        assert!(UserPatch::from(req).is_empty());
    }

    #[test]
    fn list_envelope_uses_wire_names() {
        let body = serde_json::to_value(UserListResponse {
            success: true,
            message: "All students Records",
            total_students: 0,
            data: vec![],
        })
        .unwrap();
        assert_eq!(body["totalStudents"], 0);
        assert!(body["data"].as_array().unwrap().is_empty());
    }
}
