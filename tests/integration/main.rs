//! End-to-end tests against the full router with in-memory backends.

mod booking_test;
mod helpers;
mod seat_test;
mod ws_test;
