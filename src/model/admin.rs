use std::ops::{Deref, DerefMut};

use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::mongodb::{Coll, Id};

/// Core admin user data.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCore {
    pub username: String,
    pub password_hash: String,
}

impl AdminCore {
    /// An admin with the given credentials, hashing the password.
    pub fn new(username: String, password: &str) -> Result<Self> {
        let salt: [u8; 16] = rand::random();
        let password_hash =
            argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())?;
        Ok(Self {
            username,
            password_hash,
        })
    }

    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // Unwrap safe: the only way to create an AdminCore is via `new`,
        // so the hash is always well-formed.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap()
    }
}

/// An admin without an ID.
pub type NewAdmin = AdminCore;

/// An admin user from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub admin: AdminCore,
}

impl Deref for Admin {
    type Target = AdminCore;

    fn deref(&self) -> &Self::Target {
        &self.admin
    }
}

impl DerefMut for Admin {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.admin
    }
}

/// Login credentials, as submitted by the login form.
#[derive(Debug, FromForm, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Ensure the configured admin account exists, creating it if missing.
///
/// This operation is idempotent and runs once at startup.
pub async fn ensure_admin_exists(
    admins: &Coll<NewAdmin>,
    username: &str,
    password: &str,
) -> Result<()> {
    let with_username = doc! {
        "username": username,
    };
    if admins.find_one(with_username, None).await?.is_none() {
        let admin = AdminCore::new(username.to_string(), password)?;
        admins.insert_one(admin, None).await?;
        info!("Created admin account '{username}'");
    }
    Ok(())
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl AdminCredentials {
        pub fn example() -> Self {
            Self {
                username: "coordinator".to_string(),
                password: "correct horse battery staple".to_string(),
            }
        }
    }

    impl AdminCore {
        pub fn example() -> Self {
            let credentials = AdminCredentials::example();
            Self::new(credentials.username, &credentials.password).unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passwords_verify_against_their_hash() {
        let admin = AdminCore::example();
        assert!(admin.verify_password(&AdminCredentials::example().password));
        assert!(!admin.verify_password("wrong password"));
    }
}
