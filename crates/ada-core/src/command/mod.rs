//! Command Builder: operaciones, argumentos y renderizado por generación de sintaxis.
pub mod args;
pub mod builder;
pub mod operation;
pub mod spec;

pub use args::{Arg, ArgKind, ArgSpec, Params, Presence};
pub use builder::CommandBuilder;
pub use operation::{Connectivity, Operation, OperationDescriptor};
pub use spec::CommandSpec;
