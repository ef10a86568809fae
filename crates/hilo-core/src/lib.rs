//! # hilo-core: Foundational Types for the Hilo Auth Layer
//!
//! Pure data and pure functions shared by every other crate in the
//! workspace. No I/O, no cryptography, no transport types; only `serde`,
//! `thiserror` and `chrono` from the external ecosystem.
//!
//! - [`Claims`] and [`ClaimsBuilder`]: the signed payload of a token.
//! - [`NumericDate`]: whole-second UTC instants as carried on the wire.
//! - [`check_expiry`]: the valid/expired state of decoded claims.
//! - [`authorize`]: prefix matching of a request path against permissions.
//! - [`AuthError`]: the classified failure a request guard produces.

pub mod claims;
pub mod error;
pub mod lifecycle;
pub mod permission;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use claims::{Claims, ClaimsBuilder};
pub use error::{AuthError, AuthFailure};
pub use lifecycle::{check_expiry, check_expiry_at, TokenState};
pub use permission::{authorize, matching_permission};
pub use temporal::NumericDate;
