pub mod builder;
pub mod integrity;
pub mod operations;
pub mod schemas;
pub mod security;
pub mod types;

pub use builder::IrBuilder;
pub use integrity::{EntityKind, Finding};
pub use operations::*;
pub use schemas::*;
pub use security::*;
pub use types::{IR_VERSION, Ir, Meta, Server, ServerVariable, Service};
