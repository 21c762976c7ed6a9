//! Encounter Aggregator
//!
//! Collects the billable events of one patient visit (ward stay,
//! consultations, procedures, diagnostics) into a chronologically ordered
//! list of chargeable occurrences. An [`Encounter`] accepts new occurrences
//! until it is closed; after that it only feeds the bill builder.

pub mod occurrence;
pub mod encounter;
pub mod visit;
pub mod ports;
pub mod error;

pub use occurrence::ChargeableOccurrence;
pub use encounter::{Encounter, EncounterStatus};
pub use visit::{Visit, OccurrenceRecord, WardStayRecord};
pub use ports::VisitPort;
pub use error::EncounterError;
