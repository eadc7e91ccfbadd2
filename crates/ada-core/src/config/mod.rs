//! Configuration Resolver: contexto inmutable por llamada.
pub mod context;
pub mod era;
pub mod network;
pub mod resolver;
pub mod source;

pub use context::{ContextBuilder, ContextStamp, OperationContext};
pub use era::{Era, GroupRendering, LEGACY_GROUP};
pub use network::Network;
pub use resolver::ContextResolver;
pub use source::{init_dotenv, is_truthy, ConfigSource, EnvSource, MapSource};
