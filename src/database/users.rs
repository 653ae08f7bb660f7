use chrono::NaiveDate;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};

use super::error::LogContext;
use super::{Store, StoreError};
use crate::models::{NewUser, ProfileUpdate, User};
use crate::utils::password::{hash_password, verify_password};

const USER_COLUMNS: &str = "id, username, name, email, dateOfBirth, address";

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    // Older databases may hold NULL or free-form birth dates; treat those as unknown.
    let date_of_birth = row
        .get::<_, Option<String>>(4)?
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        email: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        date_of_birth,
        address: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

impl Store {
    pub fn create_user(&self, user: &NewUser) -> Result<i64, StoreError> {
        let password_hash = hash_password(&user.password);
        let conn = self.conn();

        let result = conn.execute(
            "INSERT INTO users (username, password, name, email, dateOfBirth, address)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.username,
                password_hash,
                user.name,
                user.email,
                user.date_of_birth,
                user.address,
            ],
        );

        match result {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                log::info!("Registered user '{}' with id {}", user.username, id);
                Ok(id)
            }
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                log::warn!("Registration rejected: username '{}' already exists", user.username);
                Err(StoreError::DuplicateUsername(user.username.clone()))
            }
            Err(e) => {
                log::error!("Failed to create user '{}': {}", user.username, e);
                Err(e.into())
            }
        }
    }

    /// Returns the user id when the credentials match, `None` otherwise.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<i64>, StoreError> {
        let stored: Option<(i64, String)> = self
            .conn()
            .query_row(
                "SELECT id, password FROM users WHERE username = ?1",
                [username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .log_context("Failed to look up user for login")?;

        match stored {
            Some((id, hash)) if verify_password(password, &hash) => {
                log::info!("User '{}' logged in", username);
                Ok(Some(id))
            }
            Some(_) => {
                log::warn!("Wrong password for user '{}'", username);
                Ok(None)
            }
            None => {
                log::warn!("Login attempt for unknown user '{}'", username);
                Ok(None)
            }
        }
    }

    pub fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        self.conn()
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                [user_id],
                row_to_user,
            )
            .optional()
            .log_context("Failed to load user")
    }

    pub fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        self.conn()
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
                [username],
                |row| row.get(0),
            )
            .log_context("Failed to check username")
    }

    pub fn update_profile(&self, user_id: i64, profile: &ProfileUpdate) -> Result<(), StoreError> {
        let updated = self
            .conn()
            .execute(
                "UPDATE users SET name = ?1, email = ?2, dateOfBirth = ?3, address = ?4 WHERE id = ?5",
                params![
                    profile.name,
                    profile.email,
                    profile.date_of_birth,
                    profile.address,
                    user_id,
                ],
            )
            .log_context("Failed to update profile")?;

        if updated == 0 {
            log::warn!("Profile update for missing user {}", user_id);
            return Err(StoreError::NotFound("user"));
        }
        Ok(())
    }

    /// The old password must verify before the new hash is written.
    pub fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), StoreError> {
        let conn = self.conn();

        let stored: Option<String> = conn
            .query_row("SELECT password FROM users WHERE id = ?1", [user_id], |row| row.get(0))
            .optional()
            .log_context("Failed to load password hash")?;

        let Some(stored) = stored else {
            return Err(StoreError::NotFound("user"));
        };

        if !verify_password(old_password, &stored) {
            log::warn!("Password change for user {} rejected: old password mismatch", user_id);
            return Err(StoreError::InvalidCredentials);
        }

        conn.execute(
            "UPDATE users SET password = ?1 WHERE id = ?2",
            params![hash_password(new_password), user_id],
        )
        .log_context("Failed to store new password")?;

        log::info!("Password changed for user {}", user_id);
        Ok(())
    }

    /// Schedules and cached summaries go with the user via ON DELETE CASCADE.
    pub fn delete_user(&self, user_id: i64) -> Result<(), StoreError> {
        let deleted = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", [user_id])
            .log_context("Failed to delete user")?;

        if deleted == 0 {
            return Err(StoreError::NotFound("user"));
        }
        log::info!("Deleted user {} and dependent data", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, password: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1995, 3, 14),
            address: "서울특별시 강남구".to_string(),
        }
    }

    #[test]
    fn create_and_authenticate() {
        let store = Store::open_in_memory().unwrap();
        let id = store.create_user(&new_user("alice", "pw123")).unwrap();

        assert_eq!(store.authenticate("alice", "pw123").unwrap(), Some(id));
        assert_eq!(store.authenticate("alice", "wrong").unwrap(), None);
        assert_eq!(store.authenticate("nobody", "pw123").unwrap(), None);
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        store.create_user(&new_user("alice", "pw")).unwrap();

        let err = store.create_user(&new_user("alice", "other")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername(name) if name == "alice"));
    }

    #[test]
    fn stored_password_is_hashed() {
        let store = Store::open_in_memory().unwrap();
        let id = store.create_user(&new_user("alice", "pw123")).unwrap();

        let stored: String = store
            .conn()
            .query_row("SELECT password FROM users WHERE id = ?1", [id], |row| row.get(0))
            .unwrap();
        assert_ne!(stored, "pw123");
        assert!(stored.contains(':'));
    }

    #[test]
    fn get_user_returns_profile() {
        let store = Store::open_in_memory().unwrap();
        let id = store.create_user(&new_user("alice", "pw")).unwrap();

        let user = store.get_user(id).unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.date_of_birth, NaiveDate::from_ymd_opt(1995, 3, 14));
        assert!(store.get_user(id + 100).unwrap().is_none());
    }

    #[test]
    fn username_exists_reflects_registration() {
        let store = Store::open_in_memory().unwrap();
        assert!(!store.username_exists("alice").unwrap());
        store.create_user(&new_user("alice", "pw")).unwrap();
        assert!(store.username_exists("alice").unwrap());
    }

    #[test]
    fn update_profile_changes_fields() {
        let store = Store::open_in_memory().unwrap();
        let id = store.create_user(&new_user("alice", "pw")).unwrap();

        let update = ProfileUpdate {
            name: "Alice Kim".to_string(),
            email: "kim@example.com".to_string(),
            date_of_birth: None,
            address: "부산광역시 해운대구".to_string(),
        };
        store.update_profile(id, &update).unwrap();

        let user = store.get_user(id).unwrap().unwrap();
        assert_eq!(user.name, "Alice Kim");
        assert_eq!(user.date_of_birth, None);
        assert_eq!(user.address, "부산광역시 해운대구");

        assert!(matches!(
            store.update_profile(id + 1, &update),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn change_password_requires_old_password() {
        let store = Store::open_in_memory().unwrap();
        let id = store.create_user(&new_user("alice", "old")).unwrap();

        assert!(matches!(
            store.change_password(id, "guess", "new"),
            Err(StoreError::InvalidCredentials)
        ));
        assert_eq!(store.authenticate("alice", "old").unwrap(), Some(id));

        store.change_password(id, "old", "new").unwrap();
        assert_eq!(store.authenticate("alice", "old").unwrap(), None);
        assert_eq!(store.authenticate("alice", "new").unwrap(), Some(id));
    }

    #[test]
    fn legacy_free_form_birth_date_reads_as_unknown() {
        let store = Store::open_in_memory().unwrap();
        let id = store.create_user(&new_user("alice", "pw")).unwrap();
        store
            .conn()
            .execute("UPDATE users SET dateOfBirth = '' WHERE id = ?1", [id])
            .unwrap();

        let user = store.get_user(id).unwrap().unwrap();
        assert_eq!(user.date_of_birth, None);
    }

    #[test]
    fn delete_missing_user_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(store.delete_user(42), Err(StoreError::NotFound(_))));
    }
}
