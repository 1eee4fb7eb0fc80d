//! Port implementations: thread-safe in-memory stores for tests and local
//! development, and the HTTP client for the hosted backend.

pub mod in_memory;
pub mod postgrest;
