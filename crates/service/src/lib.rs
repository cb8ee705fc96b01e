//! Service layer providing the city/state business operations on top of models.
//! - Separates business logic from data access behind repository traits.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Hosts the municipality bulk import and its remote source.

pub mod city;
pub mod pagination;
#[cfg(test)]
pub mod test_support;
