//! Builtin registration: in-process capability implementations merged
//! into the same registries used by external plugins.

pub mod memory_component_store;
pub mod module;

pub use memory_component_store::{MemoryComponentVersionStore, OciMemoryModule};
pub use module::{BuiltinModule, register_builtin};
