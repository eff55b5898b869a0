//! Greenroom - companion-site backend for a serialized media franchise
//!
//! This library provides the core functionality for the Greenroom site,
//! including database operations, checkout session creation, webhook
//! reconciliation, and API handlers.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod id;
pub mod middleware;
pub mod models;
pub mod payments;
