//! Fabric - network-fabric provisioning adapter
//!
//! This library resolves human-supplied selection criteria (a location name,
//! a cloud on-ramp description) to concrete catalog entries, and reconciles
//! declared ports, virtual routers, appliances and cross-connects against a
//! remote provisioning API.

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod declarative;
pub mod error;
pub mod logging;
pub mod provision;
pub mod resolve;
