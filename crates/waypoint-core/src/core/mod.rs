// crates/waypoint-core/src/core/mod.rs
// ============================================================================
// Module: Core Model Modules
// Description: Module tree for the Waypoint domain model.
// Purpose: Group identity, policy, authorization, and wire-type modules.
// Dependencies: crate submodules
// ============================================================================

//! ## Overview
//! Submodules of the Waypoint domain model. See the crate root for the
//! curated re-export surface.

pub mod audit;
pub mod authz;
pub mod context;
pub mod error;
pub mod identity;
pub mod intent;
pub mod policy;
pub mod time;
pub mod wire;
