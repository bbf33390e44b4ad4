//! Provider-facing descriptors.
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering HTTPS-only
//! endpoints and the API paths the identity chain and upload branch rely on.

pub mod descriptor;

pub use descriptor::*;
