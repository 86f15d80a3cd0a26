//! Route descriptors, handler identity and path variables.

use std::any::type_name;
use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("route has no path template")]
    MissingTemplate,
}

/// What is known about the handler bound to a route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HandlerIdentity {
    /// A function handler, by fully-qualified path.
    Function(String),
    /// A handler value of a named type (e.g. a `tower::Service` struct).
    Type(String),
    #[default]
    Unknown,
}

impl HandlerIdentity {
    /// Identity of a function item, e.g. `my_app::handlers::get_user`.
    pub fn function<F>(_handler: &F) -> Self {
        Self::Function(type_name::<F>().to_string())
    }

    /// Identity of a handler type, by its short name.
    pub fn of_type<T: ?Sized>() -> Self {
        Self::Type(short_type_name(type_name::<T>()).to_string())
    }

    pub fn type_of<T>(_handler: &T) -> Self {
        Self::of_type::<T>()
    }
}

/// `my_app::svc::UserService<Foo>` → `UserService`.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// The route matched for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteDescriptor {
    handler: HandlerIdentity,
    name: Option<String>,
    template: Option<String>,
}

impl RouteDescriptor {
    pub fn new(handler: HandlerIdentity) -> Self {
        Self {
            handler,
            name: None,
            template: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn handler(&self) -> &HandlerIdentity {
        &self.handler
    }

    /// Operator-supplied route name; empty names count as none.
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn path_template(&self) -> Result<&str, RoutingError> {
        self.template.as_deref().ok_or(RoutingError::MissingTemplate)
    }
}

/// Path variable bindings for one request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathVariables(BTreeMap<String, String>);

impl PathVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
