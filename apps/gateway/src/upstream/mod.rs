//! Downstream service access: the reverse proxy and the GraphQL client.

pub mod graphql;
pub mod proxy;

pub use proxy::ProxyTarget;
