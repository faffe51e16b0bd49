//! Contact Enrichment API Library
//!
//! This library provides the core functionality for the contact enrichment
//! pipeline: CSV ingestion, name and address normalization, per-contact
//! lookups against the remote Contact/Enrich service, and aggregate match
//! reporting.
//!
//! # Modules
//!
//! - `address`: Address line composition.
//! - `batch`: Row-wise batch orchestration.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `ingest`: CSV parsing and column coercion.
//! - `models`: Core data models and wire types.
//! - `name`: Display-name splitting.
//! - `report`: Match-rate and cost statistics.
//! - `services`: Remote enrichment service client.

pub mod address;
pub mod batch;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod name;
pub mod report;
pub mod services;
