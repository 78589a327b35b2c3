use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::users::dto::{non_empty, CreateUserRequest, UpdateUserRequest};
use crate::users::repo::UserStore;
use crate::users::repo_types::{NewUser, User, UserPatch};

pub const MSG_LISTED: &str = "All students Records";
pub const MSG_CREATED: &str = "New user record created successfully";
pub const MSG_UPDATED: &str = "User details updated successfully";
pub const MSG_DELETED: &str = "User deleted successfully";

pub const MSG_NO_RECORDS: &str = "No Records found";
pub const MSG_NO_RECORD: &str = "No records found";
pub const MSG_MISSING_FIELDS: &str = "Please provide all fields";
pub const MSG_INSERT_FAILED: &str = "Error in inserting new user";
pub const MSG_MISSING_EMAIL: &str = "Invalid or missing email";
pub const MSG_NO_UPDATE_FIELDS: &str = "Please provide at least one field to update";
pub const MSG_UPDATE_NO_MATCH: &str = "User not found or no changes made";
pub const MSG_MISSING_ID: &str = "Invalid or missing user ID";
pub const MSG_USER_NOT_FOUND: &str = "User not found";

pub const MSG_LIST_FAILED: &str = "Error in Get all user API";
pub const MSG_GET_FAILED: &str = "Error in get user by id API";
pub const MSG_CREATE_FAILED: &str = "Error in create user API";
pub const MSG_UPDATE_FAILED: &str = "Error in update user API";
pub const MSG_DELETE_FAILED: &str = "Error in delete user API";

#[derive(Debug, Clone, PartialEq)]
pub struct UserList {
    pub records: Vec<User>,
    pub count: usize,
}

/// Validates requests and maps one store call per operation onto a result.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn list_users(&self) -> ApiResult<UserList> {
        let records = self.store.query_all().await.map_err(|e| {
            error!(error = %e, "list users failed");
            ApiError::store(MSG_LIST_FAILED, &e)
        })?;
        if records.is_empty() {
            return Err(ApiError::not_found(MSG_NO_RECORDS));
        }
        let count = records.len();
        Ok(UserList { records, count })
    }

    pub async fn get_user_by_id(&self, id: &str) -> ApiResult<User> {
        // A non-numeric id cannot match any row.
        let Some(user_id) = parse_id(id) else {
            return Err(ApiError::not_found(MSG_NO_RECORD));
        };
        let rows = self.store.query_by_id(user_id).await.map_err(|e| {
            error!(error = %e, user_id, "get user by id failed");
            ApiError::store(MSG_GET_FAILED, &e)
        })?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found(MSG_NO_RECORD))
    }

    pub async fn create_user(&self, req: CreateUserRequest) -> ApiResult<()> {
        let new_user = match validate_new_user(req) {
            Ok(user) => user,
            Err(e) => {
                warn!("create user: missing fields");
                return Err(e);
            }
        };

        let affected = self.store.insert(&new_user).await.map_err(|e| {
            error!(error = %e, email = %new_user.email, "create user failed");
            ApiError::store(MSG_CREATE_FAILED, &e)
        })?;
        if affected == 0 {
            error!(email = %new_user.email, "insert affected no rows");
            return Err(ApiError::StoreFailure {
                message: MSG_INSERT_FAILED.into(),
                detail: None,
            });
        }

        info!(email = %new_user.email, "user created");
        Ok(())
    }

    pub async fn update_user(&self, email: &str, req: UpdateUserRequest) -> ApiResult<()> {
        if email.is_empty() {
            return Err(ApiError::invalid(MSG_MISSING_EMAIL));
        }

        let patch = UserPatch::from(req);
        if patch.is_empty() {
            warn!(email, "update user: no fields supplied");
            return Err(ApiError::invalid(MSG_NO_UPDATE_FIELDS));
        }
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return Err(ApiError::invalid(MSG_NO_UPDATE_FIELDS));
        }

        let affected = self.store.update(email, &assignments).await.map_err(|e| {
            error!(error = %e, email, "update user failed");
            ApiError::store(MSG_UPDATE_FAILED, &e)
        })?;
        if affected == 0 {
            return Err(ApiError::not_found(MSG_UPDATE_NO_MATCH));
        }

        info!(email, fields = assignments.len(), "user updated");
        Ok(())
    }

    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        if id.is_empty() {
            return Err(ApiError::invalid(MSG_MISSING_ID));
        }
        let Some(user_id) = parse_id(id) else {
            return Err(ApiError::not_found(MSG_USER_NOT_FOUND));
        };

        let affected = self.store.delete(user_id).await.map_err(|e| {
            error!(error = %e, user_id, "delete user failed");
            ApiError::store(MSG_DELETE_FAILED, &e)
        })?;
        if affected == 0 {
            return Err(ApiError::not_found(MSG_USER_NOT_FOUND));
        }

        info!(user_id, "user deleted");
        Ok(())
    }
}

fn parse_id(id: &str) -> Option<i64> {
    id.trim().parse::<i64>().ok()
}

/// Strings must be non-empty; booleans and timestamps only need to be present.
fn validate_new_user(req: CreateUserRequest) -> ApiResult<NewUser> {
    let (
        Some(email),
        Some(password_hash),
        Some(full_name),
        Some(phone_number),
        Some(address),
        Some(profile_picture_url),
        Some(is_active),
        Some(is_verified),
        Some(created_at),
        Some(updated_at),
    ) = (
        non_empty(req.email),
        non_empty(req.password_hash),
        non_empty(req.full_name),
        non_empty(req.phone_number),
        non_empty(req.address),
        non_empty(req.profile_picture_url),
        req.is_active,
        req.is_verified,
        req.created_at,
        req.updated_at,
    )
    else {
        return Err(ApiError::invalid(MSG_MISSING_FIELDS));
    };

    Ok(NewUser {
        email,
        password_hash,
        full_name,
        phone_number,
        address,
        profile_picture_url,
        is_active,
        is_verified,
        created_at,
        updated_at,
    })
}
