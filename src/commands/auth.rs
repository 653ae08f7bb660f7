use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::user_message;
use crate::models::{NewUser, ProfileUpdate, User};
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
}

fn validate_registration(request: &RegisterRequest) -> Result<NewUser, String> {
    let username = request.username.trim();
    let name = request.name.trim();
    let email = request.email.trim();

    if username.is_empty() {
        return Err("Please enter a username.".to_string());
    }
    if request.password.is_empty() {
        return Err("Please enter a password.".to_string());
    }
    if request.password != request.confirm_password {
        return Err("Passwords do not match.".to_string());
    }
    if name.is_empty() {
        return Err("Please enter your name.".to_string());
    }
    if email.is_empty() || !email.contains('@') {
        return Err("Please enter a valid email address.".to_string());
    }

    Ok(NewUser {
        username: username.to_string(),
        password: request.password.clone(),
        name: name.to_string(),
        email: email.to_string(),
        date_of_birth: request.date_of_birth,
        address: request.address.trim().to_string(),
    })
}

pub fn register(state: &AppState, request: RegisterRequest) -> Result<i64, String> {
    let user = validate_registration(&request)?;
    state.store.create_user(&user).map_err(user_message)
}

pub fn login(state: &AppState, username: &str, password: &str) -> Result<i64, String> {
    state
        .store
        .authenticate(username.trim(), password)
        .map_err(user_message)?
        .ok_or_else(|| "Invalid username or password.".to_string())
}

pub fn get_profile(state: &AppState, user_id: i64) -> Result<User, String> {
    state
        .store
        .get_user(user_id)
        .map_err(user_message)?
        .ok_or_else(|| "User not found.".to_string())
}

pub fn update_profile(state: &AppState, user_id: i64, profile: ProfileUpdate) -> Result<(), String> {
    if profile.name.trim().is_empty() {
        return Err("Please enter your name.".to_string());
    }
    let profile = ProfileUpdate {
        name: profile.name.trim().to_string(),
        email: profile.email.trim().to_string(),
        date_of_birth: profile.date_of_birth,
        address: profile.address.trim().to_string(),
    };
    state.store.update_profile(user_id, &profile).map_err(user_message)
}

pub fn change_password(
    state: &AppState,
    user_id: i64,
    old_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<(), String> {
    if new_password.is_empty() {
        return Err("Please enter a new password.".to_string());
    }
    if new_password != confirm_password {
        return Err("Passwords do not match.".to_string());
    }
    state
        .store
        .change_password(user_id, old_password, new_password)
        .map_err(user_message)
}

/// Requires the current password; removes the user's schedules and summaries too.
pub fn delete_account(state: &AppState, user_id: i64, password: &str) -> Result<(), String> {
    let user = get_profile(state, user_id)?;
    match state.store.authenticate(&user.username, password).map_err(user_message)? {
        Some(id) if id == user_id => state.store.delete_user(user_id).map_err(user_message),
        _ => Err("Password is incorrect.".to_string()),
    }
}
