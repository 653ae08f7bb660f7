use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    /// Plaintext; hashed before it reaches the database.
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
}
