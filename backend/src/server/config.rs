//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use carefever_backend::domain::DispatchPolicy;
use carefever_backend::domain::ports::{ContactStore, MessageTransport};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) contacts: Arc<dyn ContactStore>,
    pub(crate) transport: Arc<dyn MessageTransport>,
    pub(crate) policy: DispatchPolicy,
}

impl ServerConfig {
    /// Construct a server configuration from resolved adapters.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        contacts: Arc<dyn ContactStore>,
        transport: Arc<dyn MessageTransport>,
    ) -> Self {
        Self {
            bind_addr,
            contacts,
            transport,
            policy: DispatchPolicy::default(),
        }
    }

    /// Override the dispatch limits.
    #[must_use]
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
