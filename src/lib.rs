pub mod analytics;
pub mod cli;
pub mod dashboard_service;
pub mod database;
pub mod database_factory;
pub mod date_provider;
pub mod entries;
pub mod error;
pub mod export;
pub mod format;
pub mod gui;
pub mod heuristics;
pub mod local_store;
pub mod materials;
pub mod month;
pub mod row_factories;
pub mod validation;
