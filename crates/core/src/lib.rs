//! Pet Store Core - Shared types library.
//!
//! This crate provides the domain records served by the Pet Store API:
//! - [`Pet`] - animals listed in the store, keyed by [`PetId`]
//! - [`Order`] - purchase orders referencing a pet, keyed by [`OrderId`]
//! - [`User`] - registered customers, looked up by username
//!
//! # Architecture
//!
//! The core crate contains only types and the request-body validation layer -
//! no I/O, no locking, no HTTP. The server crate owns the in-memory stores
//! and the router.
//!
//! # Modules
//!
//! - [`types`] - Typed ids and the resource records
//! - [`validation`] - Field-by-field body validation that reports every violation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{ErrorKind, FieldError, FromBody, Loc, LocSegment, ValidationErrors, parse_body};
