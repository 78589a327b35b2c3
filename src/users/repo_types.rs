use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
    pub profile_picture_url: String,
    pub is_active: bool,
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fully validated insert values, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
    pub profile_picture_url: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl NewUser {
    pub fn into_user(self, user_id: i64) -> User {
        User {
            user_id,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            phone_number: self.phone_number,
            address: self.address,
            profile_picture_url: self.profile_picture_url,
            is_active: self.is_active,
            is_verified: self.is_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Bindable value of one assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Timestamp(OffsetDateTime),
}

/// One `column = value` pair of a partial update. The variant fixes both
/// the column and the kind of value it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    PasswordHash(String),
    FullName(String),
    PhoneNumber(String),
    Address(String),
    ProfilePictureUrl(String),
    IsActive(bool),
    IsVerified(bool),
    UpdatedAt(OffsetDateTime),
}

impl Assignment {
    pub fn column(&self) -> &'static str {
        match self {
            Assignment::PasswordHash(_) => "password_hash",
            Assignment::FullName(_) => "full_name",
            Assignment::PhoneNumber(_) => "phone_number",
            Assignment::Address(_) => "address",
            Assignment::ProfilePictureUrl(_) => "profile_picture_url",
            Assignment::IsActive(_) => "is_active",
            Assignment::IsVerified(_) => "is_verified",
            Assignment::UpdatedAt(_) => "updated_at",
        }
    }

    pub fn value(&self) -> FieldValue {
        match self {
            Assignment::PasswordHash(v)
            | Assignment::FullName(v)
            | Assignment::PhoneNumber(v)
            | Assignment::Address(v)
            | Assignment::ProfilePictureUrl(v) => FieldValue::Text(v.clone()),
            Assignment::IsActive(v) | Assignment::IsVerified(v) => FieldValue::Flag(*v),
            Assignment::UpdatedAt(v) => FieldValue::Timestamp(*v),
        }
    }

    /// Writes the value into the matching field of `user`.
    pub fn apply(&self, user: &mut User) {
        match self {
            Assignment::PasswordHash(v) => user.password_hash = v.clone(),
            Assignment::FullName(v) => user.full_name = v.clone(),
            Assignment::PhoneNumber(v) => user.phone_number = v.clone(),
            Assignment::Address(v) => user.address = v.clone(),
            Assignment::ProfilePictureUrl(v) => user.profile_picture_url = v.clone(),
            Assignment::IsActive(v) => user.is_active = *v,
            Assignment::IsVerified(v) => user.is_verified = *v,
            Assignment::UpdatedAt(v) => user.updated_at = *v,
        }
    }
}

/// Mutable fields the caller actually supplied. `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    pub updated_at: Option<OffsetDateTime>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none()
            && self.full_name.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.profile_picture_url.is_none()
            && self.is_active.is_none()
            && self.is_verified.is_none()
            && self.updated_at.is_none()
    }

    /// Supplied fields in table column order.
    pub fn assignments(&self) -> Vec<Assignment> {
        [
            self.password_hash.clone().map(Assignment::PasswordHash),
            self.full_name.clone().map(Assignment::FullName),
            self.phone_number.clone().map(Assignment::PhoneNumber),
            self.address.clone().map(Assignment::Address),
            self.profile_picture_url
                .clone()
                .map(Assignment::ProfilePictureUrl),
            self.is_active.map(Assignment::IsActive),
            self.is_verified.map(Assignment::IsVerified),
            self.updated_at.map(Assignment::UpdatedAt),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Parameterized `SET` list for an update keyed on `email`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub fragments: Vec<String>,
    pub values: Vec<FieldValue>,
    /// Placeholder index bound to the `email` predicate.
    pub key_placeholder: usize,
}

impl SetClause {
    pub fn build(assignments: &[Assignment]) -> Self {
        let fragments = assignments
            .iter()
            .enumerate()
            .map(|(i, a)| format!("{} = ${}", a.column(), i + 1))
            .collect();
        let values = assignments.iter().map(Assignment::value).collect();
        Self {
            fragments,
            values,
            key_placeholder: assignments.len() + 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn to_sql(&self) -> String {
        format!(
            "UPDATE users SET {} WHERE email = ${}",
            self.fragments.join(", "),
            self.key_placeholder
        )
    }
}
