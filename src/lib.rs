//! Ledgerline - Subscription Commerce Billing Backend
//!
//! This crate implements the payment-orchestration core of a subscription
//! commerce platform: checkout, capture, refund and restore sagas driven by
//! normalized payment-provider events, with idempotent entitlement
//! activation across invoices, subscriptions, token ledgers and add-ons.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
