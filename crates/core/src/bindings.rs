//! In-unit binding resolution.
//!
//! [`DeclarationBindings`] knows every declaration of one unit and resolves
//! declarations, their names, and simple references to them. Keys follow the
//! usual shapes: `Lp/A;` for types, `Lp/A;.m(I)V` for methods, `Lp/A;.f` for
//! fields, `Lp/A;.m(I)V#x` for locals and `p` for packages. Parameter and
//! return types use `Q<name>;` for class types, since nothing outside the
//! unit is known.

use dashmap::DashMap;
use jdt_bridge_api::{
    Ast, Binding, BindingKey, BindingKind, BindingResolver, NodeId, NodeKind, PrimitiveCode, Prop,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct DeclarationBindings {
    table: Arc<DashMap<BindingKey, Binding>>,
    declarations: HashMap<NodeId, BindingKey>,
}

/// Where the walk currently is.
#[derive(Clone, Default)]
struct Scope {
    package: String,
    type_binary: Option<String>,
    member_key: Option<String>,
}

impl DeclarationBindings {
    pub fn build(ast: &Ast, root: NodeId) -> Self {
        let mut bindings = Self::default();
        let mut counters: HashMap<String, u32> = HashMap::new();
        bindings.walk(ast, root, &Scope::default(), &mut counters);
        tracing::debug!("Declared {} bindings", bindings.table.len());
        bindings
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Key of a declaration node or of its name.
    pub fn declared_key(&self, node: NodeId) -> Option<&BindingKey> {
        self.declarations.get(&node)
    }

    fn register(&mut self, ast: &Ast, id: NodeId, key: String, kind: BindingKind, name: &str) {
        let key = BindingKey(key);
        self.declarations.insert(id, key.clone());
        if let Some(name_node) = ast.child(id, Prop::Name) {
            self.declarations.insert(name_node, key.clone());
        }
        self.table.insert(
            key.clone(),
            Binding {
                key,
                kind,
                name: name.into(),
            },
        );
    }

    fn walk(&mut self, ast: &Ast, id: NodeId, scope: &Scope, counters: &mut HashMap<String, u32>) {
        let name = ast
            .child(id, Prop::Name)
            .and_then(|n| ast.identifier(n))
            .unwrap_or_default()
            .to_string();
        let mut inner = scope.clone();

        match ast.kind(id) {
            NodeKind::PackageDeclaration => {
                let package = ast
                    .child(id, Prop::Name)
                    .and_then(|n| ast.name_text(n))
                    .unwrap_or_default();
                let key = package.replace('.', "/");
                self.register(ast, id, key, BindingKind::Package, &package);
                return;
            }
            NodeKind::CompilationUnit => {
                if let Some(package) = ast.child(id, Prop::Package) {
                    self.walk(ast, package, scope, counters);
                    inner.package = ast
                        .child(package, Prop::Name)
                        .and_then(|n| ast.name_text(n))
                        .map(|p| p.replace('.', "/"))
                        .unwrap_or_default();
                }
                for child in ast.children(id).filter(|&c| Some(c) != ast.child(id, Prop::Package)) {
                    self.walk(ast, child, &inner, counters);
                }
                return;
            }
            kind if kind.is_type_declaration() => {
                let binary = match (&scope.type_binary, &scope.member_key) {
                    (Some(outer), Some(_)) => {
                        let n = next(counters, outer);
                        format!("{outer}${n}{name}")
                    }
                    (Some(outer), None) => format!("{outer}${name}"),
                    (None, _) if scope.package.is_empty() => name.clone(),
                    (None, _) => format!("{}/{name}", scope.package),
                };
                self.register(ast, id, format!("L{binary};"), BindingKind::Type, &name);
                inner.type_binary = Some(binary);
                inner.member_key = None;
            }
            NodeKind::AnonymousClassDeclaration => {
                let outer = scope.type_binary.clone().unwrap_or_default();
                let n = next(counters, &outer);
                let binary = format!("{outer}${n}");
                self.register(ast, id, format!("L{binary};"), BindingKind::Type, "");
                inner.type_binary = Some(binary);
                inner.member_key = None;
            }
            NodeKind::MethodDeclaration { is_constructor, .. } => {
                let owner = scope.type_binary.clone().unwrap_or_default();
                let selector = if *is_constructor { "" } else { name.as_str() };
                let params: String = ast
                    .list(id, Prop::Parameters)
                    .filter_map(|p| parameter_signature(ast, p))
                    .collect();
                let ret = ast
                    .child(id, Prop::ReturnType)
                    .map(|t| signature(ast, t))
                    .unwrap_or_else(|| "V".to_string());
                let key = format!("L{owner};.{selector}({params}){ret}");
                self.register(ast, id, key.clone(), BindingKind::Method, &name);
                inner.member_key = Some(key);
            }
            NodeKind::AnnotationTypeMemberDeclaration => {
                let owner = scope.type_binary.clone().unwrap_or_default();
                let ret = ast
                    .child(id, Prop::Type)
                    .map(|t| signature(ast, t))
                    .unwrap_or_default();
                let key = format!("L{owner};.{name}(){ret}");
                self.register(ast, id, key, BindingKind::Method, &name);
                return;
            }
            NodeKind::Initializer => {
                let owner = scope.type_binary.clone().unwrap_or_default();
                let n = next(counters, &format!("{owner}#init"));
                inner.member_key = Some(format!("L{owner};.{{{n}}}"));
            }
            NodeKind::EnumConstantDeclaration => {
                let owner = scope.type_binary.clone().unwrap_or_default();
                self.register(ast, id, format!("L{owner};.{name}"), BindingKind::Variable, &name);
            }
            NodeKind::VariableDeclarationFragment { .. } | NodeKind::SingleVariableDeclaration { .. } => {
                let is_field = ast.parent(id).is_some_and(|p| {
                    matches!(ast.kind(p), NodeKind::FieldDeclaration)
                        || ast.location_in_parent(id) == Some(Prop::RecordComponents)
                });
                let key = match (&scope.member_key, &scope.type_binary) {
                    (Some(member), _) if !is_field => {
                        let base = format!("{member}#{name}");
                        if self.table.contains_key(&BindingKey(base.clone())) {
                            let n = next(counters, &base);
                            format!("{base}#{n}")
                        } else {
                            base
                        }
                    }
                    (_, Some(owner)) => format!("L{owner};.{name}"),
                    (_, None) => name.clone(),
                };
                self.register(ast, id, key, BindingKind::Variable, &name);
            }
            _ => {}
        }

        for child in ast.children(id) {
            self.walk(ast, child, &inner, counters);
        }
    }

    /// Declaration a simple reference names, searched outward from the
    /// reference through the enclosing scopes.
    fn resolve_reference(&self, ast: &Ast, name_node: NodeId, identifier: &str) -> Option<BindingKey> {
        let parent = ast.parent(name_node)?;
        let invoked = matches!(
            ast.kind(parent),
            NodeKind::MethodInvocation | NodeKind::SuperMethodInvocation
        ) && ast.location_in_parent(name_node) == Some(Prop::Name);
        let at = ast.range(name_node).start;

        for scope in ast.ancestors(name_node) {
            let ordered = matches!(
                ast.kind(scope),
                NodeKind::Block | NodeKind::SwitchStatement | NodeKind::SwitchExpression
            );
            for candidate in declared_in(ast, scope) {
                let Some(key) = self.declarations.get(&candidate) else {
                    continue;
                };
                let kind = self.table.get(key).map(|b| b.kind);
                let wanted = if invoked {
                    kind == Some(BindingKind::Method)
                } else {
                    kind == Some(BindingKind::Variable) || kind == Some(BindingKind::Type)
                };
                let visible = !ordered || ast.range(candidate).start < at;
                let same_name = ast
                    .child(candidate, Prop::Name)
                    .and_then(|n| ast.identifier(n))
                    == Some(identifier);
                if wanted && visible && same_name {
                    return Some(key.clone());
                }
            }
            // A type can name itself.
            if ast.kind(scope).is_type_declaration()
                && !invoked
                && ast.child(scope, Prop::Name).and_then(|n| ast.identifier(n)) == Some(identifier)
            {
                return self.declarations.get(&scope).cloned();
            }
        }
        None
    }
}

fn next(counters: &mut HashMap<String, u32>, key: &str) -> u32 {
    let counter = counters.entry(key.to_string()).or_insert(0);
    *counter += 1;
    *counter
}

/// Declarations introduced directly by `scope`, including fragments of
/// declaration statements.
fn declared_in(ast: &Ast, scope: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    for child in ast.children(scope) {
        match ast.kind(child) {
            NodeKind::FieldDeclaration
            | NodeKind::VariableDeclarationStatement
            | NodeKind::VariableDeclarationExpression => {
                out.extend(ast.list(child, Prop::Fragments));
            }
            NodeKind::TypeDeclarationStatement => {
                out.extend(ast.child(child, Prop::Declaration));
            }
            kind if kind.is_body_declaration()
                || matches!(
                    kind,
                    NodeKind::SingleVariableDeclaration { .. }
                        | NodeKind::VariableDeclarationFragment { .. }
                ) =>
            {
                out.push(child);
            }
            _ => {}
        }
    }
    out
}

fn parameter_signature(ast: &Ast, param: NodeId) -> Option<String> {
    let NodeKind::SingleVariableDeclaration {
        varargs,
        extra_dimensions,
    } = ast.kind(param)
    else {
        return None;
    };
    let ty = signature(ast, ast.child(param, Prop::Type)?);
    let dims = *extra_dimensions as usize + usize::from(*varargs);
    Some(format!("{}{ty}", "[".repeat(dims)))
}

/// Erased signature of a type node.
fn signature(ast: &Ast, ty: NodeId) -> String {
    match ast.kind(ty) {
        NodeKind::PrimitiveType { code } => match code {
            PrimitiveCode::Byte => "B",
            PrimitiveCode::Short => "S",
            PrimitiveCode::Char => "C",
            PrimitiveCode::Int => "I",
            PrimitiveCode::Long => "J",
            PrimitiveCode::Float => "F",
            PrimitiveCode::Double => "D",
            PrimitiveCode::Boolean => "Z",
            PrimitiveCode::Void => "V",
        }
        .to_string(),
        NodeKind::ArrayType => {
            let dims = ast.list_len(ty, Prop::Dimensions).max(1);
            let element = ast
                .child(ty, Prop::ElementType)
                .map(|e| signature(ast, e))
                .unwrap_or_default();
            format!("{}{element}", "[".repeat(dims))
        }
        NodeKind::ParameterizedType => ast
            .child(ty, Prop::Type)
            .map(|t| signature(ast, t))
            .unwrap_or_default(),
        _ => match jdt_bridge_api::legacy::type_name(ast, ty) {
            Some(name) => format!("Q{name};"),
            None => "Qjava.lang.Object;".to_string(),
        },
    }
}

impl BindingResolver for DeclarationBindings {
    fn resolve(&self, ast: &Ast, node: NodeId) -> Option<BindingKey> {
        if let Some(key) = self.declarations.get(&node) {
            return Some(key.clone());
        }
        match ast.kind(node) {
            NodeKind::SimpleName { identifier } => self.resolve_reference(ast, node, identifier),
            NodeKind::SimpleType => self.resolve(ast, ast.child(node, Prop::Name)?),
            NodeKind::MethodInvocation => self.resolve(ast, ast.child(node, Prop::Name)?),
            _ => None,
        }
    }

    fn binding(&self, key: &BindingKey) -> Option<Binding> {
        self.table.get(key).map(|b| b.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdt_bridge_api::SourceRange;

    fn name(ast: &mut Ast, text: &str, start: i32) -> NodeId {
        ast.alloc(
            NodeKind::SimpleName {
                identifier: text.into(),
            },
            SourceRange::new(start, text.len() as i32),
        )
    }

    /// package p; class A { int f; void m(int x) { x = f; } }
    fn sample() -> (Ast, NodeId, NodeId, NodeId) {
        let mut ast = Ast::new();
        let unit = ast.alloc(NodeKind::CompilationUnit, SourceRange::new(0, 60));
        let package = ast.alloc(NodeKind::PackageDeclaration, SourceRange::new(0, 10));
        let p = name(&mut ast, "p", 8);
        ast.add_child(package, Prop::Name, p);
        ast.add_child(unit, Prop::Package, package);

        let class = ast.alloc(NodeKind::TypeDeclaration { is_interface: false }, SourceRange::new(11, 49));
        let a = name(&mut ast, "A", 17);
        ast.add_child(class, Prop::Name, a);
        ast.add_child(unit, Prop::Types, class);

        let field = ast.alloc(NodeKind::FieldDeclaration, SourceRange::new(21, 6));
        let int_ty = ast.alloc(NodeKind::PrimitiveType { code: PrimitiveCode::Int }, SourceRange::new(21, 3));
        let fragment = ast.alloc(NodeKind::VariableDeclarationFragment { extra_dimensions: 0 }, SourceRange::new(25, 1));
        let f = name(&mut ast, "f", 25);
        ast.add_child(fragment, Prop::Name, f);
        ast.add_child(field, Prop::Type, int_ty);
        ast.add_child(field, Prop::Fragments, fragment);
        ast.add_child(class, Prop::BodyDeclarations, field);

        let method = ast.alloc(
            NodeKind::MethodDeclaration { is_constructor: false, extra_dimensions: 0 },
            SourceRange::new(28, 30),
        );
        let void = ast.alloc(NodeKind::PrimitiveType { code: PrimitiveCode::Void }, SourceRange::new(28, 4));
        let m = name(&mut ast, "m", 33);
        let param = ast.alloc(
            NodeKind::SingleVariableDeclaration { varargs: false, extra_dimensions: 0 },
            SourceRange::new(35, 5),
        );
        let param_ty = ast.alloc(NodeKind::PrimitiveType { code: PrimitiveCode::Int }, SourceRange::new(35, 3));
        let x = name(&mut ast, "x", 39);
        ast.add_child(param, Prop::Type, param_ty);
        ast.add_child(param, Prop::Name, x);
        ast.add_child(method, Prop::ReturnType, void);
        ast.add_child(method, Prop::Name, m);
        ast.add_child(method, Prop::Parameters, param);

        let body = ast.alloc(NodeKind::Block, SourceRange::new(42, 14));
        let stmt = ast.alloc(NodeKind::ExpressionStatement, SourceRange::new(44, 6));
        let assign = ast.alloc(
            NodeKind::Assignment { operator: jdt_bridge_api::AssignmentOperator::Assign },
            SourceRange::new(44, 5),
        );
        let x_ref = name(&mut ast, "x", 44);
        let f_ref = name(&mut ast, "f", 48);
        ast.add_child(assign, Prop::LeftHandSide, x_ref);
        ast.add_child(assign, Prop::RightHandSide, f_ref);
        ast.add_child(stmt, Prop::Expression, assign);
        ast.add_child(body, Prop::Statements, stmt);
        ast.add_child(method, Prop::Body, body);
        ast.add_child(class, Prop::BodyDeclarations, method);
        (ast, unit, x_ref, f_ref)
    }

    #[test]
    fn test_declaration_keys() {
        let (ast, unit, _, _) = sample();
        let bindings = DeclarationBindings::build(&ast, unit);
        let keys: Vec<String> = ast
            .preorder(unit)
            .into_iter()
            .filter(|&id| !matches!(ast.kind(id), NodeKind::SimpleName { .. }))
            .filter_map(|id| bindings.declared_key(id).map(|k| k.0.clone()))
            .collect();
        assert_eq!(keys, vec!["p", "Lp/A;", "Lp/A;.f", "Lp/A;.m(I)V", "Lp/A;.m(I)V#x"]);
    }

    #[test]
    fn test_references_resolve_outward() {
        let (ast, unit, x_ref, f_ref) = sample();
        let bindings = DeclarationBindings::build(&ast, unit);
        assert_eq!(
            bindings.resolve(&ast, x_ref).map(|k| k.0),
            Some("Lp/A;.m(I)V#x".to_string())
        );
        let field = bindings.resolve(&ast, f_ref).unwrap();
        assert_eq!(field.0, "Lp/A;.f");
        assert_eq!(bindings.binding(&field).unwrap().kind, BindingKind::Variable);
    }

    #[test]
    fn test_field_outside_a_type_is_keyed_by_name() {
        // A detached snippet: an initializer holding a field, with no type around it.
        let mut ast = Ast::new();
        let initializer = ast.alloc(NodeKind::Initializer, SourceRange::new(0, 12));
        let field = ast.alloc(NodeKind::FieldDeclaration, SourceRange::new(2, 6));
        let fragment = ast.alloc(
            NodeKind::VariableDeclarationFragment { extra_dimensions: 0 },
            SourceRange::new(6, 1),
        );
        let f = name(&mut ast, "f", 6);
        ast.add_child(fragment, Prop::Name, f);
        ast.add_child(field, Prop::Fragments, fragment);
        ast.add_child(initializer, Prop::BodyDeclarations, field);

        let bindings = DeclarationBindings::build(&ast, initializer);
        assert_eq!(bindings.declared_key(fragment).map(|k| k.0.as_str()), Some("f"));
        assert_eq!(bindings.declared_key(f).map(|k| k.0.as_str()), Some("f"));

        let detached = DeclarationBindings::build(&ast, field);
        assert_eq!(detached.declared_key(fragment).map(|k| k.0.as_str()), Some("f"));
    }
}

