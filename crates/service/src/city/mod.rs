//! City module: three-layer architecture (domain, repository, service).
//!
//! Holds the city/state business rules and the municipality bulk import.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod repo;
pub mod service;
pub mod source;

pub use errors::CityError;
pub use service::CityService;
