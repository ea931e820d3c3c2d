pub mod access;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod entities;
pub mod error;
pub mod filter;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod storage;

pub use app::{router, AppState};

#[cfg(test)]
pub mod testing;
