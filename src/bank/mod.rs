pub mod question;
pub mod repository;
pub mod selector;
