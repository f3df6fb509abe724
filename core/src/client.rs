//! Entry point holding the state shared by all namespaces.

use std::fmt;
use std::sync::Arc;

use crate::config::{ClientConfig, Credentials};
use crate::files::Files;
use crate::namespace::{Namespace, NamespaceConfig};
use crate::transport::{Transport, UreqTransport};

/// Immutable state every namespace reads from.
pub(crate) struct ClientContext {
    pub(crate) api_host: String,
    pub(crate) credentials: Credentials,
    pub(crate) user_agent: String,
    pub(crate) transport: Arc<dyn Transport>,
}

/// API client. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Client {
    context: Arc<ClientContext>,
}

impl Client {
    /// Client using the default `ureq` transport configured from `config.transport`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = Arc::new(UreqTransport::new(&config.transport));
        Self::with_transport(config, transport)
    }

    /// Client using a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let user_agent = config.user_agent();
        Self {
            context: Arc::new(ClientContext {
                api_host: config.api_host,
                credentials: config.credentials,
                user_agent,
                transport,
            }),
        }
    }

    /// A namespace with custom host, authentication or encoding.
    pub fn namespace(&self, config: NamespaceConfig) -> Namespace {
        Namespace::new(Arc::clone(&self.context), config)
    }

    pub fn files(&self) -> Files {
        Files::new(self)
    }

    pub fn user_agent(&self) -> &str {
        &self.context.user_agent
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_host", &self.context.api_host)
            .field("credentials", &self.context.credentials)
            .field("user_agent", &self.context.user_agent)
            .finish_non_exhaustive()
    }
}
