//! Controller method tables.
//!
//! # Responsibilities
//! - Collect a controller type's exported methods at registration time
//! - Filter out names that do not follow the exported-identifier convention
//! - Index each accepted method by its method key
//!
//! # Design Decisions
//! - Signature shape (receiver + context, at most one result) is enforced by the
//!   [`Methods::add`] bound, so only the name is checked at runtime
//! - Every invocation runs on a fresh `T::default()` receiver
//! - Duplicate keys: last registration wins, with a warning

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::routing::context::{Context, Reply};
use crate::routing::naming::{method_key, DEFAULT_REQUEST_METHOD};

/// A controller type whose methods are dispatched by convention.
///
/// ```ignore
/// #[derive(Default)]
/// struct UserController;
///
/// impl Controller<JsonContext> for UserController {
///     fn methods(m: &mut Methods<Self, JsonContext>) {
///         m.add("Get", Self::show).add("DeleteUser", Self::delete_user);
///     }
/// }
/// ```
pub trait Controller<C: Context>: Default + 'static {
    /// Register the methods reachable through this controller.
    fn methods(methods: &mut Methods<Self, C>);
}

type MethodFn<C> = dyn Fn(&mut C) -> Option<<C as Context>::Value> + Send + Sync;

/// A registered controller method.
pub struct Method<C: Context> {
    name: String,
    call: Arc<MethodFn<C>>,
}

impl<C: Context> Method<C> {
    /// Exported method name as registered (`DeleteUser`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn invoke(&self, ctx: &mut C) -> Option<C::Value> {
        (self.call)(ctx)
    }
}

impl<C: Context> fmt::Debug for Method<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").field("name", &self.name).finish()
    }
}

/// Method key -> method mapping. Immutable once built.
pub struct MethodTable<C: Context> {
    methods: HashMap<String, Method<C>>,
}

impl<C: Context> MethodTable<C> {
    /// Build the table for controller type `T`.
    pub fn build<T: Controller<C>>() -> Self {
        let mut builder = Methods::<T, C>::new();
        T::methods(&mut builder);
        builder.table
    }

    pub fn get(&self, key: &str) -> Option<&Method<C>> {
        self.methods.get(key)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl<C: Context> fmt::Debug for MethodTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.methods.iter().map(|(k, m)| (k, &m.name)))
            .finish()
    }
}

/// Builder passed to [`Controller::methods`].
pub struct Methods<T, C: Context> {
    table: MethodTable<C>,
    _controller: PhantomData<fn() -> T>,
}

impl<T: Controller<C>, C: Context> Methods<T, C> {
    fn new() -> Self {
        Self {
            table: MethodTable {
                methods: HashMap::new(),
            },
            _controller: PhantomData,
        }
    }

    /// Register a method under its exported name.
    ///
    /// Names must start with an uppercase ASCII letter and contain only ASCII
    /// alphanumerics or `_`; anything else is skipped.
    pub fn add<R, F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&T, &mut C) -> R + Send + Sync + 'static,
        R: Reply<C::Value>,
    {
        if !is_exported(name) {
            tracing::warn!(
                controller = std::any::type_name::<T>(),
                method = name,
                "Skipping method that is not an exported identifier"
            );
            return self;
        }

        let key = method_key(name, DEFAULT_REQUEST_METHOD);
        let call = move |ctx: &mut C| f(&T::default(), ctx).into_reply();
        let method = Method {
            name: name.to_string(),
            call: Arc::new(call),
        };

        if let Some(previous) = self.table.methods.insert(key.clone(), method) {
            tracing::warn!(
                controller = std::any::type_name::<T>(),
                key = %key,
                replaced = %previous.name,
                method = name,
                "Duplicate method key, keeping the last registration"
            );
        }
        self
    }
}

fn is_exported(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
