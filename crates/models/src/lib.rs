pub mod errors;
pub mod db;
pub mod state;
pub mod city;

#[cfg(test)]
mod tests;
