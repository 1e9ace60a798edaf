//! Resolution of human-supplied selection criteria to concrete catalog
//! entries.
//!
//! Every resolver is pure over a catalog snapshot and ends in exactly one
//! selected entry or one named [`ResolveError`].

pub mod adjudicate;
pub mod error;
pub mod filter;
pub mod location;
pub mod partner_port;

pub use adjudicate::{adjudicate, adjudicate_first_of_equals, Adjudication};
pub use error::ResolveError;
pub use filter::{FilterPipeline, FilterStage, Rejected, Strictness};
pub use location::{resolve_location, LocationQuery};
pub use partner_port::{
    partner_port_pipeline, resolve_internet_port, resolve_partner_port, PartnerPortQuery,
};
