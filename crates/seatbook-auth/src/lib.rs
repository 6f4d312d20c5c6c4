//! # seatbook-auth
//!
//! Verifies the bearer tokens that identify SeatBook users. Tokens are
//! issued by an external identity provider sharing the HMAC secret; the
//! encoder exists for tooling and tests.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
