//! Server-side API backend and business logic.
//!
//! This module contains the complete backend implementation: API endpoints, identity
//! linking, data access and infrastructure. The backend uses Axum as the web framework,
//! SeaORM for database operations and tower-sessions for login sessions.
//!
//! # Architecture
//!
//! The server follows a layered architecture with clear separation of concerns:
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, access control, and DTO conversion
//! - **Service Layer** (`service/`) - Identity linking and the Steam/Discord login exchanges
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and provider profile parameters
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Typed session access and the authentication guard
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (DB, HTTP clients, link mode)
//! - **Startup** (`startup`) - Initialization of database, sessions and clients
//! - **Router** (`router`) - Axum route configuration and API documentation
//!
//! # Request Flow
//!
//! 1. **Router** receives HTTP request and routes to appropriate controller
//! 2. **Middleware** resolves the session principal
//! 3. **Controller** validates access, calls service
//! 4. **Service** runs the provider exchange and resolves the identity
//! 5. **Data** queries database, converts entities to domain models
//! 6. **Controller** stores the principal or converts the domain model to a DTO

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
