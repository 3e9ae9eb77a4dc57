//! Core domain types for the tradegate risk/ledger stack.
//!
//! This crate provides fundamental types used throughout the system:
//! - `Money`, `Quantity`: integer fixed-point types (minor units / asset units)
//! - `Symbol`: instrument identifier
//! - `OrderIntent`, `OrderSide`, `OrderType`: pre-trade order description
//! - `ExecutionEvent`, `EventType`: post-trade raw execution stream
//!
//! Every monetary field that can reach a persisted or hashed artifact is a
//! `Money` (i64 minor units). Floats are structurally inexpressible in these
//! types; a float in the input stream fails deserialization instead of being
//! rounded.

pub mod error;
pub mod event;
pub mod money;
pub mod order;
pub mod symbol;

pub use error::{CoreError, Result};
pub use event::{EventType, ExecutionEvent};
pub use money::{Money, Quantity};
pub use order::{OrderIntent, OrderSide, OrderType};
pub use symbol::Symbol;
