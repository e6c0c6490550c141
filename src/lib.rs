pub mod api;
pub mod config;
pub mod db;
pub mod extraction;
pub mod gemini;
pub mod models;
pub mod report;
pub mod state;
