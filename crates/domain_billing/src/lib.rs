//! Billing Domain - Bill Builder
//!
//! Turns the occurrences of a closed encounter into an immutable [`Bill`].
//!
//! # Rounding
//!
//! Each line total is `unit price x quantity` rounded half-up to currency
//! precision. The grand total is a running sum in chronological order that
//! is rounded again after every addition, so three lines of 0.005 each
//! produce 0.03, not the 0.02 a single rounding of 0.015 would give.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::BillBuilder;
//!
//! encounter.close();
//! let builder = BillBuilder::new(&encounter, Currency::SGD)?;
//! let bill = builder.build()?;
//! assert_eq!(bill, builder.build()?);
//! ```

pub mod bill;
pub mod builder;
pub mod ports;
pub mod error;

pub use bill::{Bill, BillLineItem};
pub use builder::BillBuilder;
pub use ports::BillSinkPort;
pub use error::BillingError;
