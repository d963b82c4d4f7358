//! Client for the Account REST API Service.

mod client;

pub use client::{Account, AccountClient, ClientError, NewAccount};
