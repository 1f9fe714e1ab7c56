//! Database repositories.
//!
//! Repositories wrap sea-orm queries for one table each and are generic over
//! `ConnectionTrait` so they work with both connections and transactions.

pub mod account;
pub mod eve;
