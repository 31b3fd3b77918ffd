//! The contract a builtin implementation exposes so it can be merged into a
//! capability registry alongside external plugins.

use std::sync::Arc;

use ocm_plugins_core::Type;
use ocm_plugins_registry::Registry;

/// A builtin's declared scheme: the canonical type it implements, plus any
/// unversioned aliases that should also resolve to it.
pub trait BuiltinModule<T: ?Sized>: Send + Sync {
    /// The canonical (versioned) type this builtin handles.
    fn canonical_type(&self) -> Type;

    /// Unversioned or otherwise alternate types that should resolve to the
    /// same implementation. Resolved to the canonical type before lookup.
    fn aliases(&self) -> Vec<Type> {
        Vec::new()
    }

    /// The narrow capability interface implementation.
    fn implementation(&self) -> Arc<T>;
}

/// Merges `module`'s scheme into `registry`: the canonical type and every
/// alias all map to the same implementation instance.
pub fn register_builtin<T: ?Sized + Send + Sync + 'static>(registry: &Registry<T>, module: &dyn BuiltinModule<T>) {
    let implementation = module.implementation();
    registry.add_builtin(module.canonical_type(), implementation.clone());
    for alias in module.aliases() {
        registry.add_builtin(alias, implementation.clone());
    }
}
