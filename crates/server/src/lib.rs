pub mod routes;
pub mod startup;
pub mod cities;
pub mod errors;
pub mod openapi;

pub use startup::run;
