//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories used without a database
//! - **payment**: Razorpay HTTP client and an in-process simulated gateway
//! - **password**: Argon2id password hashing
//! - **mail**: in-process mailer that logs reset codes
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod mail;
pub mod memory;
pub mod password;
pub mod payment;
pub mod persistence;
