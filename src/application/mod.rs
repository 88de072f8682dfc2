//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `WalletEngine`, the primary entry point for wallet
//! operations, and the per-user lock registry that serializes every balance
//! mutation so concurrent requests on one wallet cannot interleave.

pub mod approval;
pub mod engine;
pub mod locks;
