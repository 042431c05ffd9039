pub mod activate;
pub mod delete;
pub mod error;
pub mod settle;
pub mod upload;
