pub mod greet;
pub mod pages;
pub mod user;
