pub mod app_state;
pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod document;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

#[cfg(test)]
pub mod test_utils;
