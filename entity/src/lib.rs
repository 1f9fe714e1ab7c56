//! sea-orm entities for the capsuleer database.

pub mod prelude;

pub mod account;
pub mod eve_alliance;
pub mod eve_character;
pub mod eve_corporation;
