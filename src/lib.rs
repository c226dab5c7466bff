//! Afflink - affiliate link attribution and click metrics engine
//!
//! This library provides the core functionality for the Afflink service:
//! product catalog intake, campaign management, short-coded affiliate links,
//! durable click logging at redirect time, and dashboard aggregation.
//!
//! # Architecture
//! - `storage`: SeaORM-backed persistence (SQLite / MySQL / PostgreSQL)
//! - `analytics`: click event sink abstraction
//! - `services`: business logic shared by all HTTP handlers
//! - `api`: HTTP services (actix-web)
//! - `config`: configuration management
//! - `system`: logging and process utilities

pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
