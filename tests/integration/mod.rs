//! Integration test suite for the feature builder
//!
//! Exercises the public surface the way a merge engine and its callers use
//! it: assembling contexts, forking them for nested includes, dispatching
//! extensions to handlers and loading settings from TOML.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **context_assembly**: Builder validation, defaults and overwrite layering
//! - **fork_semantics**: What a forked context carries and what it resets
//! - **handler_invocation**: Merge and post-process dispatch, phase flags, failures
//! - **launchpad**: Per-handler configuration switching one handler's behavior
//! - **settings**: TOML settings layered onto a builder

mod fork_semantics;
mod handler_invocation;
