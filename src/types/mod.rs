pub mod account;
pub mod filter;
pub mod note;
pub mod profile;
