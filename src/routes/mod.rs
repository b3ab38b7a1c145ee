pub mod admin;
pub mod blog;
pub mod comment;
pub mod user;
