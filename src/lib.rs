pub mod admin;
pub mod backend;
pub mod config;
pub mod listing;
pub mod models;
pub mod site;
