//! Shared types of the ExtraFields service: aggregates, DTOs and the response
//! envelopes produced by processors and the connector.

pub mod domain;
pub mod shared;
