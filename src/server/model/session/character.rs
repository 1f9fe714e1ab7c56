//! Session storage for the logged in character.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{model::auth::UserDto, server::error::Error};

/// Session key for the logged in character.
pub const SESSION_CHARACTER_KEY: &str = "capsuleer:auth:character";

/// The logged in character, the session's principal.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SessionCharacter {
    /// EVE Online character ID
    pub character_id: i64,
    /// Character name as stored when it logged in
    pub character_name: String,
    /// Account owning the character
    pub account_id: i32,
}

impl SessionCharacter {
    /// Stores the character as the session's principal, replacing any previous one.
    pub async fn insert(&self, session: &Session) -> Result<(), Error> {
        session.insert(SESSION_CHARACTER_KEY, self).await?;

        Ok(())
    }

    /// Gets the logged in character, `None` when nobody is logged in.
    pub async fn get(session: &Session) -> Result<Option<Self>, Error> {
        Ok(session.get(SESSION_CHARACTER_KEY).await?)
    }

    /// Logs the character out of the session, returning who was logged in.
    pub async fn remove(session: &Session) -> Result<Option<Self>, Error> {
        Ok(session.remove(SESSION_CHARACTER_KEY).await?)
    }
}

impl From<SessionCharacter> for UserDto {
    fn from(character: SessionCharacter) -> Self {
        Self {
            account_id: character.account_id,
            character_id: character.character_id,
            character_name: character.character_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use capsuleer_test_utils::prelude::*;

    use crate::server::model::session::character::SessionCharacter;

    fn principal() -> SessionCharacter {
        SessionCharacter {
            character_id: 2114794365,
            character_name: "Hyziri".to_string(),
            account_id: 1,
        }
    }

    #[tokio::test]
    async fn get_returns_inserted_principal() -> Result<(), TestError> {
        let test = test_setup_with_tables!()?;

        principal().insert(&test.session).await.unwrap();
        let result = SessionCharacter::get(&test.session).await.unwrap();

        assert_eq!(result, Some(principal()));

        Ok(())
    }

    #[tokio::test]
    async fn get_returns_none_for_anonymous_session() -> Result<(), TestError> {
        let test = test_setup_with_tables!()?;

        let result = SessionCharacter::get(&test.session).await.unwrap();

        assert!(result.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn remove_clears_principal() -> Result<(), TestError> {
        let test = test_setup_with_tables!()?;
        principal().insert(&test.session).await.unwrap();

        let removed = SessionCharacter::remove(&test.session).await.unwrap();

        assert_eq!(removed, Some(principal()));
        assert!(SessionCharacter::get(&test.session).await.unwrap().is_none());

        Ok(())
    }
}
