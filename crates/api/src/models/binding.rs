use super::ast::{Ast, NodeId};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Reference into the resolver's binding table. Nodes only ever hold keys.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BindingKey(pub String);

impl BindingKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BindingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Type,
    Method,
    Variable,
    Package,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: BindingKey,
    pub kind: BindingKind,
    pub name: SmolStr,
}

/// Semantic lookup capability. Resolution is pull-based: nothing is computed
/// until a consumer asks for a node's binding.
pub trait BindingResolver: Send + Sync {
    fn resolve(&self, ast: &Ast, node: NodeId) -> Option<BindingKey>;

    fn binding(&self, key: &BindingKey) -> Option<Binding>;
}

/// Resolver for units compiled without semantic information.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBindings;

impl BindingResolver for NoBindings {
    fn resolve(&self, _ast: &Ast, _node: NodeId) -> Option<BindingKey> {
        None
    }

    fn binding(&self, _key: &BindingKey) -> Option<Binding> {
        None
    }
}
