//! Host-provided functions and type members.
//!
//! The fixed builtin table is registered into a root context/environment
//! pair through the core's two registration operations (`Context::define`
//! and `Environment::define` plus their type-member equivalents) before any
//! user program is parsed.

pub mod builtins;
