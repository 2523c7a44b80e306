//! # nowpayments - NOWPayments API client
//!
//! An async Rust client for the [NOWPayments](https://nowpayments.io) API.
//! Each API operation is a method on [`NowPaymentsClient`]; the client fills
//! in the endpoint URL, attaches the `x-api-key` header, sends the request
//! and hands back the decoded JSON body.
//!
//! ```no_run
//! use nowpayments::{NowPaymentsClient, PaymentRequest};
//!
//! # async fn run() -> nowpayments::Result<()> {
//! let client = NowPaymentsClient::new("abc1234-def5678-ghi9012-jkl3456", true, false)?;
//! let estimate = client.estimate(100, "usd", "btc").await?;
//! println!("{:?}", estimate.json());
//!
//! let payment = PaymentRequest::new(100, "usd", "btc").with_order_id("order-1");
//! let created = client.create_payment(&payment).await?;
//! println!("{:?}", created.json());
//! # Ok(())
//! # }
//! ```
//!
//! With debug mode on, operations return the URL they would have requested
//! ([`ApiResponse::Url`]) and never touch the network.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use client::{ApiResponse, NowPaymentsClient};
pub use config::{ApiKey, ClientConfig, Environment};
pub use endpoint::Endpoint;
pub use error::{NowPaymentsError, Result};
pub use types::*;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
