//! Rill Core - record values and structural equality for the rill multiset engine.
//!
//! This crate provides the foundational types shared by the engine:
//!
//! - `Value`: a structurally-comparable record value (scalars, arrays,
//!   field->value objects)
//! - `Equivalence`: the pluggable equality strategy used to locate "one copy"
//!   of a record inside a multiset
//! - `Error`: error types for engine operations
//!
//! # Example
//!
//! ```rust
//! use rill_core::{Structural, Equivalence, Value};
//!
//! let a = Value::object([("name", Value::from("sphinx")), ("eyes", Value::from(2))]);
//! let b = Value::object([("eyes", Value::from(2)), ("name", Value::from("sphinx"))]);
//!
//! // Field order does not matter: equality is structural.
//! assert!(Structural.eq(&a, &b));
//! assert_eq!(a.get("eyes"), Some(&Value::from(2)));
//! ```

#![no_std]

extern crate alloc;

mod equiv;
mod error;
mod value;

pub use equiv::{EquivRef, Equivalence, Structural};
pub use error::{Error, Result};
pub use value::Value;
