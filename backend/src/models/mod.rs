//! Data models for the rental back office.
//!
//! Customers and vehicles live in the document store, contracts and billings
//! in the relational store. Each model carries its own store operations;
//! report row types live in `reports`.

pub mod billing;
pub mod contract;
pub mod customer;
pub mod reports;
pub mod vehicle;

// Re-export commonly used models
pub use billing::Billing;
pub use contract::Contract;
pub use customer::Customer;
pub use vehicle::Vehicle;
