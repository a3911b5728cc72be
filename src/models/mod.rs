pub mod error;
pub mod event;
pub mod health;
pub mod openai;
pub mod retry;
pub mod slack;
pub mod status;
