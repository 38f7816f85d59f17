//! # mcp-discovery
//!
//! A Rust service for discovering and recommending MCP tool servers by
//! querying several independent backends and merging their results into one
//! ranked, deduplicated list. Tolerates partial backend failure and fails
//! over between a primary and secondary full-text backend.
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────┐
//!                      │ SearchQuery   │
//!                      └──────┬───────┘
//!                             │ fan out (concurrent)
//!       ┌──────────────┬──────┴───────┬──────────────┐
//!       ▼              ▼              ▼              ▼
//! ┌───────────┐ ┌────────────┐ ┌────────────┐ ┌────────────┐
//! │ recommend  │ │  fulltext  │ │  registry  │ │  offline   │
//! │ (HTTP API) │ │ (resilient │ │ (service   │ │ (vector    │
//! │            │ │  failover) │ │  registry) │ │  store)    │
//! └─────┬─────┘ └─────┬──────┘ └─────┬──────┘ └─────┬──────┘
//!       │ failures isolated per provider (empty set) │
//!       └──────────────┴──────┬───────┴──────────────┘
//!                             ▼
//!                  ┌────────────────────┐
//!                  │      Reranker      │
//!                  │ score → dedup →    │
//!                  │ filter → sort →    │
//!                  │ truncate           │
//!                  └─────────┬──────────┘
//!                            ▼
//!                  ┌────────────────────┐
//!                  │  Ranked results    │
//!                  └────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration, backend + fallback resolution
//! - [`models`] - Shared data types: `SearchQuery`, `CandidateResult`, API types
//! - [`cache`] - Single-slot TTL cache with lazy expiry
//! - [`catalog`] - Bulk catalog loading with per-source failure isolation
//! - [`embedding`] - Swappable text embedders (HTTP API or deterministic hash)
//! - [`search::normalize`] - L2 normalization and cosine similarity
//! - [`search::vector`] - In-memory vector store (vector-DB-shaped responses)
//! - [`search::remote_vector`] - Persisted vector backend contract + wrapper
//! - [`search::fulltext`] - Full-text engine wire contract and HTTP client
//! - [`search::resilient`] - Primary/fallback failover wrapper
//! - [`search::rerank`] - Merge, dedup, filter, sort, truncate
//! - [`search::orchestrator`] - Concurrent provider fan-out
//! - [`providers`] - Provider adapters over the concrete backends
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod embedding;
pub mod models;
pub mod providers;
pub mod search;
pub mod state;
