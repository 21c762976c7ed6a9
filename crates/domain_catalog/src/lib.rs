//! Code Registry Domain
//!
//! Read-only lookup from a code identifier (ICD-10 diagnosis, ICD-10-PCS
//! procedure, or a hospital service such as a ward day or consultation) to
//! its description, benefit category and unit price.
//!
//! The registry is populated once at startup from a [`CodeCatalogPort`] and
//! then shared by reference; nothing mutates a [`Code`] after load.
//!
//! ```rust,ignore
//! let registry = CodeRegistry::load(&catalog_port, Currency::SGD).await?;
//! let code = registry.lookup("WARD-B1")?;
//! ```

pub mod code;
pub mod category;
pub mod registry;
pub mod ports;
pub mod error;

pub use code::{Code, CodeKind, CatalogEntry};
pub use category::BenefitCategory;
pub use registry::CodeRegistry;
pub use ports::CodeCatalogPort;
pub use error::CatalogError;
