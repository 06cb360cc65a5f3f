//! Etymon Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Etymon crates.
//! It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Definition**: The word decomposition model ([`definition`] module)
//! - **Nodes**: Graph nodes and edges derived from a definition ([`node`] module)
//! - **Diagnostics**: Advisory findings about a definition ([`diagnostic`] module)

pub mod definition;
pub mod diagnostic;
pub mod geometry;
pub mod identifier;
pub mod node;
