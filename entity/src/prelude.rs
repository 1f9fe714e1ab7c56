pub use super::account::Entity as Account;
pub use super::eve_alliance::Entity as EveAlliance;
pub use super::eve_character::Entity as EveCharacter;
pub use super::eve_corporation::Entity as EveCorporation;
