pub mod discover;
pub mod error;
pub mod matcher;
pub mod page_model;
pub mod token;
