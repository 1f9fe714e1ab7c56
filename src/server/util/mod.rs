//! Utility functions shared across services and controllers.

pub mod time;
