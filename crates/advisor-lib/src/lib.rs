//! Advisor library for cloud instance recommendations
//!
//! This crate provides the core functionality for:
//! - Rule tables describing workload archetypes and service triggers
//! - Translating project descriptions into resource requirements
//! - Filtering, scoring and ranking catalog instances
//! - Catalog ingestion and access
//! - Health checks and observability

pub mod catalog;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod filter;
pub mod health;
pub mod models;
pub mod observability;
pub mod rules;
pub mod scoring;
pub mod suggestions;
pub mod translator;

pub use catalog::{CatalogError, CatalogRepository, InMemoryCatalog};
pub use engine::Recommender;
pub use error::{RecommendError, RecommendResult};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{AdvisorMetrics, StructuredLogger};
pub use rules::{RuleTables, RulesError};
