use serde::Deserialize;
use serde_json::Value;

use super::{FieldSpec, Schema, ValidationError};
use crate::sql::FieldMap;

pub const USER_AUTH: Schema = Schema::new(&[
    FieldSpec::text("username").required(),
    FieldSpec::text("password").required(),
]);

pub const USER_REGISTER: Schema = Schema::new(&[
    FieldSpec::text("username").min(1.0).max(30.0).required(),
    FieldSpec::text("password").min(5.0).max(20.0).required(),
    FieldSpec::text("firstName").min(1.0).max(30.0).required(),
    FieldSpec::text("lastName").min(1.0).max(30.0).required(),
    FieldSpec::email("email").min(6.0).max(60.0).required(),
]);

pub const NEW_USER: Schema = Schema::new(&[
    FieldSpec::text("username").min(1.0).max(30.0).required(),
    FieldSpec::text("password").min(5.0).max(20.0).required(),
    FieldSpec::text("firstName").min(1.0).max(30.0).required(),
    FieldSpec::text("lastName").min(1.0).max(30.0).required(),
    FieldSpec::email("email").min(6.0).max(60.0).required(),
    FieldSpec::boolean("isAdmin"),
]);

pub const USER_UPDATE: Schema = Schema::new(&[
    FieldSpec::text("password").min(5.0).max(20.0),
    FieldSpec::text("firstName").min(1.0).max(30.0),
    FieldSpec::text("lastName").min(1.0).max(30.0),
    FieldSpec::email("email").min(6.0).max(60.0),
]);

#[derive(Debug, Clone, Deserialize)]
pub struct UserAuth {
    pub username: String,
    pub password: String,
}

impl UserAuth {
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let fields = USER_AUTH.validate_body(body)?;
        serde_json::from_value(Value::Object(fields)).map_err(|e| ValidationError(e.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl NewUser {
    /// Admin-created user; may itself be an admin.
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let fields = NEW_USER.validate_body(body)?;
        serde_json::from_value(Value::Object(fields)).map_err(|e| ValidationError(e.to_string()))
    }

    /// Self-registration; never an admin.
    pub fn from_registration(body: &Value) -> Result<Self, ValidationError> {
        let fields = USER_REGISTER.validate_body(body)?;
        let mut user: Self =
            serde_json::from_value(Value::Object(fields)).map_err(|e| ValidationError(e.to_string()))?;
        user.is_admin = false;
        Ok(user)
    }
}

pub fn user_update(body: &Value) -> Result<FieldMap, ValidationError> {
    USER_UPDATE.validate_body(body)
}
