mod auth;
mod docs;
mod eve;
