//! `users` table: lookup by email or id, and sign-up.

use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::row::{FromRow, RowExt};
use crate::sql::query;
use crate::validate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl FromRow for User {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
            email: row.try_get_column("email")?,
            password: row.try_get_column("password")?,
        })
    }
}

/// Sign-up payload. `password` is stored as given; hashing belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> DbResult<()> {
        validate::require_non_blank("name", &self.name)?;
        validate::require_non_blank("password", &self.password)?;
        if !validate::is_email(&self.email) {
            return Err(DbError::validation(format!(
                "email {:?} is not a valid address",
                self.email
            )));
        }
        Ok(())
    }
}

/// The user with this email, or `None` if there is no such user.
pub async fn get_user_with_email(
    conn: &impl GenericClient,
    email: &str,
) -> DbResult<Option<User>> {
    query("SELECT * FROM users WHERE email = $1")
        .tag("users.by_email")
        .bind(email.to_string())
        .fetch_opt_as(conn)
        .await
}

/// The user with this id, or `None` if there is no such user.
pub async fn get_user_with_id(conn: &impl GenericClient, id: i32) -> DbResult<Option<User>> {
    query("SELECT * FROM users WHERE id = $1")
        .tag("users.by_id")
        .bind(id)
        .fetch_opt_as(conn)
        .await
}

/// Insert a user and return the stored row.
pub async fn add_user(conn: &impl GenericClient, user: &NewUser) -> DbResult<User> {
    user.validate()?;
    query("INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING *")
        .tag("users.insert")
        .bind(user.name.clone())
        .bind(user.email.clone())
        .bind(user.password.clone())
        .fetch_one_as(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingClient;

    fn new_user() -> NewUser {
        NewUser {
            name: "Eva Stanley".into(),
            email: "sebastianguerra@ymail.com".into(),
            password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".into(),
        }
    }

    #[test]
    fn validation_rejects_bad_email() {
        let mut user = new_user();
        user.email = "not-an-email".into();
        assert!(user.validate().unwrap_err().to_string().contains("email"));
    }

    #[test]
    fn validation_rejects_blank_name() {
        let mut user = new_user();
        user.name = " ".into();
        assert!(user.validate().is_err());
        assert!(new_user().validate().is_ok());
    }

    #[tokio::test]
    async fn lookup_by_email_binds_email_once() {
        let client = RecordingClient::new();
        let user = get_user_with_email(&client, "a@b.co").await.unwrap();
        assert!(user.is_none());

        let seen = client.statements();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].sql, "SELECT * FROM users WHERE email = $1");
        assert_eq!(seen[0].params, vec!["\"a@b.co\""]);
    }

    #[tokio::test]
    async fn lookup_by_id_reports_absence_as_none() {
        let client = RecordingClient::new();
        assert_eq!(get_user_with_id(&client, 42).await.unwrap(), None);
        assert_eq!(client.statements()[0].params, vec!["42"]);
    }

    #[tokio::test]
    async fn add_user_inserts_three_fields_in_order() {
        let client = RecordingClient::new();
        // The recording client returns no row, so the insert surfaces NotFound.
        let err = add_user(&client, &new_user()).await.unwrap_err();
        assert!(err.is_not_found());

        let seen = client.statements();
        assert_eq!(
            seen[0].sql,
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING *"
        );
        assert_eq!(seen[0].params[0], "\"Eva Stanley\"");
        assert_eq!(seen[0].params[1], "\"sebastianguerra@ymail.com\"");
    }

    #[tokio::test]
    async fn add_user_invalid_input_sends_nothing() {
        let client = RecordingClient::new();
        let mut user = new_user();
        user.password.clear();
        assert!(add_user(&client, &user).await.is_err());
        assert!(client.statements().is_empty());
    }
}
