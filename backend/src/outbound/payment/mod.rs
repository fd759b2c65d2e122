//! Payment gateway adapters.
//!
//! - **razorpay_http**: reqwest client for the hosted Razorpay orders API
//! - **simulated**: in-process gateway for local runs and tests, where orders
//!   are settled explicitly

mod dto;
mod razorpay_http;
mod simulated;

pub use razorpay_http::{DEFAULT_RAZORPAY_BASE_URL, RazorpayCredentials, RazorpayHttpGateway};
pub use simulated::SimulatedGateway;
