// File: manager/src/lib.rs
pub mod config;
pub mod constants;
pub mod database;
pub mod dispatch;
pub mod errors;
pub mod jira;
pub mod scheduler;
pub mod slack;
pub mod web;
