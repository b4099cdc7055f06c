pub mod config;
pub mod domain;
pub mod errors;
pub mod estimator;
pub mod frames;
pub mod gate;
pub mod handoff;
pub mod perf_audit;
pub mod site;
pub mod summary;

pub use domain::catalog::{Catalog, DesignTier, FeatureKey, FeatureOption, TierId};
pub use domain::inquiry::ContactInquiry;
pub use domain::quote::{PageCount, PricingTraceStep, Quote, QuoteInput};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use estimator::{estimate, DeterministicPricingEngine, PricingEngine};
pub use gate::{ExitIntentGate, GateOutcome, GateState, InMemorySessionStore, SessionStore};
pub use handoff::MessagingLink;
pub use perf_audit::{AuditClient, AuditError, AuditReport, AuditState};
pub use summary::SummaryCopy;
