pub mod cache;
pub mod crypto;
pub mod repositories;
