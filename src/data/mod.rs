pub mod api;
pub mod health;
pub mod search;
pub mod threads;
