//! Route metadata to span fields.
//!
//! # Responsibilities
//! - One `gorilla.vars.<name>` field per path variable
//! - Handler identity, declared route name and path template
//! - A single resolved `name` following a fixed precedence
//!
//! # Design Decisions
//! - Depends only on routing state, never on the response
//! - Missing metadata omits fields; nothing here can fail

use serde_json::Value;

use crate::routing::{HandlerIdentity, PathVariables, RouteDescriptor};
use crate::trace::Span;

pub const PATH_VARIABLE_PREFIX: &str = "gorilla.vars.";

/// Where a candidate for the span `name` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    Function,
    Type,
    Declared,
}

/// Ordered `name` assignments; the last one wins.
///
/// Candidates are proposed as function name, then type name, then declared
/// route name, so an operator-supplied name always takes precedence over
/// identity inferred from the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCandidates(Vec<(NameSource, String)>);

impl NameCandidates {
    /// Empty names are not candidates.
    pub fn propose(&mut self, source: NameSource, name: &str) {
        if !name.is_empty() {
            self.0.push((source, name.to_string()));
        }
    }

    pub fn resolve(&self) -> Option<&str> {
        self.0.last().map(|(_, name)| name.as_str())
    }

    pub fn winner(&self) -> Option<NameSource> {
        self.0.last().map(|(source, _)| *source)
    }
}

/// Span fields derived from the matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMetadata {
    pub variables: PathVariables,
    pub handler_fnname: Option<String>,
    pub handler_name: Option<String>,
    pub handler_route: Option<String>,
    pub names: NameCandidates,
}

impl RouteMetadata {
    pub fn extract(route: Option<&RouteDescriptor>, variables: PathVariables) -> Self {
        let mut metadata = Self {
            variables,
            ..Self::default()
        };
        let Some(route) = route else {
            return metadata;
        };

        match route.handler() {
            HandlerIdentity::Function(fnname) => {
                metadata.handler_fnname = Some(fnname.clone());
                metadata.names.propose(NameSource::Function, fnname);
            }
            HandlerIdentity::Type(type_name) => {
                metadata.names.propose(NameSource::Type, type_name);
            }
            HandlerIdentity::Unknown => {}
        }

        if let Some(declared) = route.declared_name() {
            metadata.handler_name = Some(declared.to_string());
            metadata.names.propose(NameSource::Declared, declared);
        }

        if let Ok(template) = route.path_template() {
            metadata.handler_route = Some(template.to_string());
        }

        metadata
    }

    /// Resolved span name, if the route provided one.
    pub fn name(&self) -> Option<&str> {
        self.names.resolve()
    }

    pub fn fields(&self) -> Vec<(String, Value)> {
        let mut fields: Vec<(String, Value)> = self
            .variables
            .iter()
            .map(|(k, v)| (format!("{PATH_VARIABLE_PREFIX}{k}"), Value::from(v)))
            .collect();

        if let Some(fnname) = &self.handler_fnname {
            fields.push(("handler.fnname".into(), Value::from(fnname.as_str())));
        }
        if let Some(name) = &self.handler_name {
            fields.push(("handler.name".into(), Value::from(name.as_str())));
        }
        if let Some(route) = &self.handler_route {
            fields.push(("handler.route".into(), Value::from(route.as_str())));
        }
        if let Some(name) = self.name() {
            fields.push(("name".into(), Value::from(name)));
        }
        fields
    }

    pub fn apply(&self, span: &Span) {
        for (key, value) in self.fields() {
            span.add_field(key, value);
        }
    }
}
