//! Order-taking and billing back office for a beverage delivery business.
//!
//! Every record type (products, customers, orders, collections, invoices) is
//! owned by its own [`actor_framework::ResourceActor`]; the typed clients in
//! [`clients`] talk to those actors and handle the cross-record workflows.
//! Order arithmetic lives in [`pricing`].

pub mod actor_framework;
pub mod app_system;
pub mod billing_actor;
pub mod clients;
pub mod customer_actor;
pub mod domain;
pub mod order_actor;
pub mod pricing;
pub mod product_actor;

#[cfg(test)]
mod mock_framework;
