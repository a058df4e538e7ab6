//! Lowers a tree-sitter-java concrete syntax tree into javac-shaped trees.

use super::nodes::{
    all, by_field, child_of_kind, end, has_token, is_comment, is_expression, is_statement, is_type,
    is_type_declaration, named, start, token_before, token_start,
};
use crate::diag::{DiagnosticArg, ForeignDiagnostic};
use crate::tree::{
    BoundKind, ClassKind, JcKind, JcTree, Modifiers, NOPOS, ReferenceMode, Tag, TreeFactory,
    TreeId, TypeTag, flags,
};
use tree_sitter::Node;

pub(crate) struct Lowering<'s> {
    source: &'s str,
    pub(crate) factory: TreeFactory,
    pub(crate) diagnostics: Vec<ForeignDiagnostic>,
    pending: Vec<usize>,
}

impl<'s> Lowering<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Self {
            source,
            factory: TreeFactory::new(),
            diagnostics: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn make(&mut self, node: Node<'_>, pos: i32, kind: JcKind) -> JcTree {
        self.factory.make(start(node), pos, end(node), kind)
    }

    fn spanning(&mut self, node: Node<'_>, kind: JcKind) -> JcTree {
        self.make(node, start(node), kind)
    }

    fn placeholder(&mut self, at: i32) -> JcTree {
        self.factory
            .make(at, at, at, JcKind::Erroneous { errs: Vec::new() })
    }

    /// Links diagnostics raised while lowering modifiers to the declaration that owns them.
    fn attach_pending(&mut self, owner: TreeId) {
        for index in self.pending.drain(..) {
            if let Some(diagnostic) = self.diagnostics.get_mut(index) {
                diagnostic.tree = Some(owner);
            }
        }
    }

    pub(crate) fn compilation_unit(&mut self, root: Node<'_>) -> JcTree {
        let mut package = None;
        let mut imports = Vec::new();
        let mut defs = Vec::new();
        for child in named(root) {
            match child.kind() {
                "package_declaration" => package = Some(Box::new(self.package(child))),
                "import_declaration" => imports.push(self.import(child)),
                "module_declaration" => defs.push(self.unsupported(
                    child,
                    "compiler.err.illegal.start.of.type",
                    "module declarations are not supported",
                )),
                kind if is_type_declaration(kind) => defs.push(self.class_decl(child)),
                _ => defs.push(self.erroneous(child)),
            }
        }
        self.factory.make(
            0,
            0,
            self.source.len() as i32,
            JcKind::CompilationUnit {
                package,
                imports,
                defs,
            },
        )
    }

    fn package(&mut self, node: Node<'_>) -> JcTree {
        let mut annotations = Vec::new();
        let mut pid = None;
        for child in named(node) {
            match child.kind() {
                "marker_annotation" | "annotation" => annotations.push(self.annotation(child)),
                _ => pid = Some(child),
            }
        }
        let pid = match pid {
            Some(name) => self.name(name),
            None => self.placeholder(end(node)),
        };
        let pos = token_start(node, "package").unwrap_or(start(node));
        self.make(
            node,
            pos,
            JcKind::Package {
                annotations,
                pid: Box::new(pid),
            },
        )
    }

    fn import(&mut self, node: Node<'_>) -> JcTree {
        let is_static = has_token(node, "static");
        let name_node = named(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"));
        let mut qualid = match name_node {
            Some(name) => self.name(name),
            None => self.placeholder(end(node)),
        };
        if let Some(star) = child_of_kind(node, "asterisk") {
            let dot = token_before(node, ".", start(star)).unwrap_or(start(star) - 1);
            qualid = self.factory.make(
                qualid.start,
                dot,
                end(star),
                JcKind::Select {
                    selected: Box::new(qualid),
                    name: "*".to_string(),
                },
            );
        }
        self.spanning(
            node,
            JcKind::Import {
                qualid: Box::new(qualid),
                is_static,
            },
        )
    }

    /// Dotted names: package names, import names, annotation names.
    fn name(&mut self, node: Node<'_>) -> JcTree {
        match node.kind() {
            "identifier" | "type_identifier" => {
                let name = self.text(node).to_string();
                self.spanning(node, JcKind::Ident { name })
            }
            "scoped_identifier" => {
                let scope = node.child_by_field_name("scope");
                let last = node.child_by_field_name("name");
                match (scope, last) {
                    (Some(scope), Some(last)) => {
                        let selected = self.name(scope);
                        let dot = token_before(node, ".", start(last)).unwrap_or(start(last) - 1);
                        let name = self.text(last).to_string();
                        self.make(
                            node,
                            dot,
                            JcKind::Select {
                                selected: Box::new(selected),
                                name,
                            },
                        )
                    }
                    _ => self.erroneous(node),
                }
            }
            _ => self.expr(node),
        }
    }

    fn modifiers(&mut self, node: Option<Node<'_>>) -> Modifiers {
        let Some(node) = node else {
            return Modifiers::empty();
        };
        let mut mods = Modifiers {
            flags: 0,
            annotations: Vec::new(),
            start: start(node),
            end: end(node),
        };
        for child in all(node) {
            match child.kind() {
                "marker_annotation" | "annotation" => mods.annotations.push(self.annotation(child)),
                _ if is_comment(&child) => {}
                _ => {
                    let keyword = self.text(child);
                    let Some(flag) = flags::from_keyword(keyword) else {
                        continue;
                    };
                    if mods.flags & flag != 0 {
                        self.report_pending(
                            ForeignDiagnostic::error(
                                "compiler.err.repeated.modifier",
                                "repeated modifier",
                            )
                            .at(start(child), start(child), end(child)),
                        );
                    }
                    mods.flags |= flag;
                }
            }
        }
        let visibility = mods.flags & (flags::PUBLIC | flags::PROTECTED | flags::PRIVATE);
        if visibility.count_ones() > 1 {
            let names: Vec<&str> = flags::KEYWORDS
                .iter()
                .filter(|(flag, _)| visibility & flag != 0)
                .map(|(_, text)| *text)
                .collect();
            let message = format!(
                "illegal combination of modifiers: {} and {}",
                names[0], names[1]
            );
            self.report_pending(
                ForeignDiagnostic::error("compiler.err.illegal.combination.of.modifiers", message)
                    .at(start(node), start(node), end(node))
                    .with_arg(DiagnosticArg::Text(names[0].to_string()))
                    .with_arg(DiagnosticArg::Text(names[1].to_string())),
            );
        }
        mods
    }

    fn report_pending(&mut self, diagnostic: ForeignDiagnostic) {
        self.pending.push(self.diagnostics.len());
        self.diagnostics.push(diagnostic);
    }

    fn annotation(&mut self, node: Node<'_>) -> JcTree {
        let annotation_type = match node.child_by_field_name("name") {
            Some(name) => self.name(name),
            None => self.placeholder(start(node)),
        };
        let mut args = Vec::new();
        if let Some(list) = node.child_by_field_name("arguments") {
            for arg in named(list) {
                if arg.kind() == "element_value_pair" {
                    let key = arg.child_by_field_name("key");
                    let value = arg.child_by_field_name("value");
                    let lhs = match key {
                        Some(key) => self.name(key),
                        None => self.placeholder(start(arg)),
                    };
                    let rhs = match value {
                        Some(value) => self.element_value(value),
                        None => self.placeholder(end(arg)),
                    };
                    let pos = token_start(arg, "=").unwrap_or(start(arg));
                    args.push(self.make(
                        arg,
                        pos,
                        JcKind::Assign {
                            lhs: Box::new(lhs),
                            rhs: Box::new(rhs),
                        },
                    ));
                } else {
                    args.push(self.element_value(arg));
                }
            }
        }
        self.spanning(
            node,
            JcKind::Annotation {
                annotation_type: Box::new(annotation_type),
                args,
            },
        )
    }

    fn element_value(&mut self, node: Node<'_>) -> JcTree {
        match node.kind() {
            "element_value_array_initializer" => {
                let elems = named(node)
                    .into_iter()
                    .map(|e| self.element_value(e))
                    .collect();
                self.spanning(
                    node,
                    JcKind::NewArray {
                        elemtype: None,
                        dims: Vec::new(),
                        extra_dims: 0,
                        elems: Some(elems),
                    },
                )
            }
            "marker_annotation" | "annotation" => self.annotation(node),
            _ => self.expr(node),
        }
    }

    // ---- declarations ----

    fn class_decl(&mut self, node: Node<'_>) -> JcTree {
        let (class_kind, keyword, implied) = match node.kind() {
            "interface_declaration" => (ClassKind::Interface, "interface", flags::INTERFACE),
            "enum_declaration" => (ClassKind::Enum, "enum", flags::ENUM),
            "record_declaration" => (ClassKind::Record, "record", flags::RECORD),
            "annotation_type_declaration" => (
                ClassKind::AnnotationType,
                "@interface",
                flags::ANNOTATION | flags::INTERFACE,
            ),
            _ => (ClassKind::Class, "class", 0),
        };
        let mut mods = self.modifiers(child_of_kind(node, "modifiers"));
        mods.flags |= implied;
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let typarams = node
            .child_by_field_name("type_parameters")
            .map(|tp| self.type_parameters(tp))
            .unwrap_or_default();
        let extending = node
            .child_by_field_name("superclass")
            .and_then(|sc| named(sc).into_iter().next())
            .map(|ty| Box::new(self.ty(ty)));
        let interfaces = node
            .child_by_field_name("interfaces")
            .or_else(|| child_of_kind(node, "extends_interfaces"));
        let implementing = interfaces
            .map(|list| self.type_list(list))
            .unwrap_or_default();
        let permitting = node
            .child_by_field_name("permits")
            .map(|list| self.type_list(list))
            .unwrap_or_default();

        let mut defs = Vec::new();
        if class_kind == ClassKind::Record {
            if let Some(params) = node.child_by_field_name("parameters") {
                for mut component in self.formal_parameters(params) {
                    if let JcKind::VarDef { mods, .. } = &mut component.kind {
                        mods.flags |= flags::RECORD | flags::PRIVATE | flags::FINAL;
                    }
                    defs.push(component);
                }
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            if class_kind == ClassKind::Enum {
                for child in named(body) {
                    match child.kind() {
                        "enum_constant" => defs.push(self.enum_constant(child, &name)),
                        "enum_body_declarations" => defs.extend(self.members(child)),
                        _ => defs.push(self.erroneous(child)),
                    }
                }
            } else {
                defs.extend(self.members(body));
            }
        }

        let pos = token_start(node, keyword).unwrap_or(start(node));
        let tree = self.make(
            node,
            pos,
            JcKind::ClassDef {
                mods,
                name,
                class_kind,
                typarams,
                extending,
                implementing,
                permitting,
                defs,
            },
        );
        self.attach_pending(tree.id);
        tree
    }

    fn type_list(&mut self, node: Node<'_>) -> Vec<JcTree> {
        let list = child_of_kind(node, "type_list").unwrap_or(node);
        named(list).into_iter().map(|ty| self.ty(ty)).collect()
    }

    fn members(&mut self, body: Node<'_>) -> Vec<JcTree> {
        let mut out = Vec::new();
        for child in named(body) {
            match child.kind() {
                "field_declaration" | "constant_declaration" => out.extend(self.variables(child)),
                "method_declaration" | "annotation_type_element_declaration" => {
                    out.push(self.method(child))
                }
                "constructor_declaration" | "compact_constructor_declaration" => {
                    out.push(self.constructor(child))
                }
                "block" => out.push(self.block(child)),
                "static_initializer" => {
                    let stats = match child_of_kind(child, "block") {
                        Some(block) => self.block_statements(block),
                        None => Vec::new(),
                    };
                    out.push(self.spanning(
                        child,
                        JcKind::Block {
                            is_static: true,
                            stats,
                        },
                    ));
                }
                kind if is_type_declaration(kind) => out.push(self.class_decl(child)),
                _ => out.push(self.erroneous(child)),
            }
        }
        out
    }

    fn enum_constant(&mut self, node: Node<'_>, enum_name: &str) -> JcTree {
        let mut mods = self.modifiers(child_of_kind(node, "modifiers"));
        mods.flags |= flags::PUBLIC | flags::STATIC | flags::FINAL | flags::ENUM;
        let name_node = node.child_by_field_name("name");
        let name = name_node
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let pos = name_node.map(start).unwrap_or(start(node));

        let vartype = self.factory.ident(NOPOS, enum_name);
        let clazz = self.factory.ident(NOPOS, enum_name);
        let args = node
            .child_by_field_name("arguments")
            .map(|list| self.arguments(list))
            .unwrap_or_default();
        let def = node
            .child_by_field_name("body")
            .map(|body| Box::new(self.anonymous_class(body)));
        let init = self.factory.make(
            pos,
            pos,
            end(node),
            JcKind::NewClass {
                encl: None,
                typeargs: Vec::new(),
                clazz: Box::new(clazz),
                args,
                def,
            },
        );
        self.make(
            node,
            pos,
            JcKind::VarDef {
                mods,
                name,
                vartype: Some(Box::new(vartype)),
                dims: 0,
                init: Some(Box::new(init)),
            },
        )
    }

    fn anonymous_class(&mut self, body: Node<'_>) -> JcTree {
        let defs = self.members(body);
        self.spanning(
            body,
            JcKind::ClassDef {
                mods: Modifiers::empty(),
                name: String::new(),
                class_kind: ClassKind::Class,
                typarams: Vec::new(),
                extending: None,
                implementing: Vec::new(),
                permitting: Vec::new(),
                defs,
            },
        )
    }

    /// Field, constant and local declarations: one `VarDef` per declarator, all
    /// sharing the declaration start. Only the last one's end covers the `;`.
    fn variables(&mut self, node: Node<'_>) -> Vec<JcTree> {
        let mods_node = child_of_kind(node, "modifiers");
        let type_node = node.child_by_field_name("type");
        let declarators = by_field(node, "declarator");
        if declarators.is_empty() {
            return vec![self.erroneous(node)];
        }
        let count = declarators.len();
        let mut out = Vec::with_capacity(count);
        for (i, declarator) in declarators.into_iter().enumerate() {
            let reported = self.diagnostics.len();
            let mods = self.modifiers(mods_node);
            if i > 0 {
                self.diagnostics.truncate(reported);
                self.pending.clear();
            }
            let vartype = type_node.map(|t| Box::new(self.ty(t)));
            let name_node = declarator.child_by_field_name("name");
            let name = name_node
                .map(|n| self.text(n).to_string())
                .unwrap_or_default();
            let dims = count_dims(declarator.child_by_field_name("dimensions"));
            let init = declarator
                .child_by_field_name("value")
                .map(|v| Box::new(self.initializer(v)));
            let pos = name_node.map(start).unwrap_or(start(declarator));
            let var_end = if i + 1 == count {
                end(node)
            } else {
                end(declarator)
            };
            let tree = self.factory.make(
                start(node),
                pos,
                var_end,
                JcKind::VarDef {
                    mods,
                    name,
                    vartype,
                    dims,
                    init,
                },
            );
            self.attach_pending(tree.id);
            out.push(tree);
        }
        out
    }

    fn initializer(&mut self, node: Node<'_>) -> JcTree {
        match node.kind() {
            "array_initializer" => self.array_initializer(node),
            _ => self.expr(node),
        }
    }

    fn array_initializer(&mut self, node: Node<'_>) -> JcTree {
        let elems = named(node)
            .into_iter()
            .map(|e| self.initializer(e))
            .collect();
        self.spanning(
            node,
            JcKind::NewArray {
                elemtype: None,
                dims: Vec::new(),
                extra_dims: 0,
                elems: Some(elems),
            },
        )
    }

    fn method(&mut self, node: Node<'_>) -> JcTree {
        let mods = self.modifiers(child_of_kind(node, "modifiers"));
        let typarams = node
            .child_by_field_name("type_parameters")
            .map(|tp| self.type_parameters(tp))
            .unwrap_or_default();
        let restype = node
            .child_by_field_name("type")
            .map(|t| Box::new(self.ty(t)));
        let name_node = node.child_by_field_name("name");
        let name = name_node
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.formal_parameters(p))
            .unwrap_or_default();
        let dims = count_dims(node.child_by_field_name("dimensions"));
        let thrown = self.thrown(node);
        let body = node
            .child_by_field_name("body")
            .map(|b| Box::new(self.block(b)));
        let default_value = node
            .child_by_field_name("value")
            .map(|v| Box::new(self.element_value(v)));
        let pos = name_node.map(start).unwrap_or(start(node));
        let tree = self.make(
            node,
            pos,
            JcKind::MethodDef {
                mods,
                name,
                restype,
                typarams,
                params,
                dims,
                thrown,
                body,
                default_value,
            },
        );
        self.attach_pending(tree.id);
        tree
    }

    fn constructor(&mut self, node: Node<'_>) -> JcTree {
        let mut mods = self.modifiers(child_of_kind(node, "modifiers"));
        if node.kind() == "compact_constructor_declaration" {
            mods.flags |= flags::COMPACT_RECORD_CONSTRUCTOR;
        }
        let typarams = node
            .child_by_field_name("type_parameters")
            .map(|tp| self.type_parameters(tp))
            .unwrap_or_default();
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.formal_parameters(p))
            .unwrap_or_default();
        let thrown = self.thrown(node);
        let body = node
            .child_by_field_name("body")
            .map(|b| Box::new(self.block(b)));
        let pos = node
            .child_by_field_name("name")
            .map(start)
            .unwrap_or(start(node));
        let tree = self.make(
            node,
            pos,
            JcKind::MethodDef {
                mods,
                name: "<init>".to_string(),
                restype: None,
                typarams,
                params,
                dims: 0,
                thrown,
                body,
                default_value: None,
            },
        );
        self.attach_pending(tree.id);
        tree
    }

    fn thrown(&mut self, node: Node<'_>) -> Vec<JcTree> {
        match child_of_kind(node, "throws") {
            Some(throws) => named(throws).into_iter().map(|t| self.ty(t)).collect(),
            None => Vec::new(),
        }
    }

    fn formal_parameters(&mut self, node: Node<'_>) -> Vec<JcTree> {
        let mut out = Vec::new();
        for param in named(node) {
            match param.kind() {
                "formal_parameter" => {
                    let mods = self.modifiers(child_of_kind(param, "modifiers"));
                    let vartype = param
                        .child_by_field_name("type")
                        .map(|t| Box::new(self.ty(t)));
                    let name_node = param.child_by_field_name("name");
                    let dims = count_dims(param.child_by_field_name("dimensions"));
                    out.push(self.parameter(param, mods, vartype, name_node, dims));
                }
                "spread_parameter" => {
                    let mut mods = self.modifiers(child_of_kind(param, "modifiers"));
                    mods.flags |= flags::VARARGS;
                    let vartype = named(param)
                        .into_iter()
                        .find(|c| is_type(c.kind()))
                        .map(|t| Box::new(self.ty(t)));
                    let declarator = child_of_kind(param, "variable_declarator");
                    let name_node = declarator.and_then(|d| d.child_by_field_name("name"));
                    let dims =
                        count_dims(declarator.and_then(|d| d.child_by_field_name("dimensions")));
                    out.push(self.parameter(param, mods, vartype, name_node, dims));
                }
                "receiver_parameter" => {
                    tracing::trace!("Dropping receiver parameter at {}", start(param));
                }
                _ => out.push(self.erroneous(param)),
            }
        }
        out
    }

    fn parameter(
        &mut self,
        node: Node<'_>,
        mods: Modifiers,
        vartype: Option<Box<JcTree>>,
        name_node: Option<Node<'_>>,
        dims: u32,
    ) -> JcTree {
        let name = name_node
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let pos = name_node.map(start).unwrap_or(start(node));
        let tree = self.make(
            node,
            pos,
            JcKind::VarDef {
                mods,
                name,
                vartype,
                dims,
                init: None,
            },
        );
        self.attach_pending(tree.id);
        tree
    }

    fn type_parameters(&mut self, node: Node<'_>) -> Vec<JcTree> {
        named(node)
            .into_iter()
            .filter(|c| c.kind() == "type_parameter")
            .map(|param| {
                let mut annotations = Vec::new();
                let mut name = String::new();
                let mut bounds = Vec::new();
                for child in named(param) {
                    match child.kind() {
                        "marker_annotation" | "annotation" => {
                            annotations.push(self.annotation(child))
                        }
                        "type_identifier" | "identifier" => name = self.text(child).to_string(),
                        "type_bound" => {
                            bounds.extend(named(child).into_iter().map(|b| self.ty(b)));
                        }
                        _ => {}
                    }
                }
                self.spanning(
                    param,
                    JcKind::TypeParameter {
                        name,
                        bounds,
                        annotations,
                    },
                )
            })
            .collect()
    }

    // ---- types ----

    fn ty(&mut self, node: Node<'_>) -> JcTree {
        match node.kind() {
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                match TypeTag::from_keyword(self.text(node)) {
                    Some(typetag) => self.spanning(node, JcKind::TypeIdent { typetag }),
                    None => self.erroneous(node),
                }
            }
            "type_identifier" | "identifier" => {
                let name = self.text(node).to_string();
                self.spanning(node, JcKind::Ident { name })
            }
            "scoped_type_identifier" => {
                let parts: Vec<Node<'_>> = named(node)
                    .into_iter()
                    .filter(|c| !matches!(c.kind(), "marker_annotation" | "annotation"))
                    .collect();
                match (parts.first(), parts.last()) {
                    (Some(&qualifier), Some(&last)) if parts.len() >= 2 => {
                        let selected = self.ty(qualifier);
                        let dot = token_before(node, ".", start(last)).unwrap_or(start(last) - 1);
                        let name = self.text(last).to_string();
                        self.make(
                            node,
                            dot,
                            JcKind::Select {
                                selected: Box::new(selected),
                                name,
                            },
                        )
                    }
                    _ => self.erroneous(node),
                }
            }
            "generic_type" => {
                let parts = named(node);
                let base = parts.iter().find(|c| c.kind() != "type_arguments").copied();
                let Some(base) = base else {
                    return self.erroneous(node);
                };
                let clazz = self.ty(base);
                let arguments = child_of_kind(node, "type_arguments")
                    .map(|args| self.type_arguments(args))
                    .unwrap_or_default();
                let pos = child_of_kind(node, "type_arguments")
                    .map(start)
                    .unwrap_or(start(node));
                self.make(
                    node,
                    pos,
                    JcKind::TypeApply {
                        clazz: Box::new(clazz),
                        arguments,
                    },
                )
            }
            "array_type" => {
                let Some(element) = node.child_by_field_name("element") else {
                    return self.erroneous(node);
                };
                let mut tree = self.ty(element);
                if let Some(dims) = node.child_by_field_name("dimensions") {
                    let mut open = NOPOS;
                    for token in all(dims) {
                        match token.kind() {
                            "[" => open = start(token),
                            "]" => {
                                tree = self.factory.make(
                                    start(node),
                                    open,
                                    end(token),
                                    JcKind::TypeArray {
                                        elemtype: Box::new(tree),
                                    },
                                );
                            }
                            _ => {}
                        }
                    }
                }
                tree
            }
            "annotated_type" => {
                let mut annotations = Vec::new();
                let mut underlying = None;
                for child in named(node) {
                    match child.kind() {
                        "marker_annotation" | "annotation" => {
                            annotations.push(self.annotation(child))
                        }
                        _ => underlying = Some(child),
                    }
                }
                let underlying = match underlying {
                    Some(u) => self.ty(u),
                    None => self.placeholder(end(node)),
                };
                self.spanning(
                    node,
                    JcKind::AnnotatedType {
                        annotations,
                        underlying: Box::new(underlying),
                    },
                )
            }
            "wildcard" => {
                let parts = named(node);
                let has_super = parts.iter().any(|c| c.kind() == "super");
                let kind = if has_token(node, "extends") {
                    BoundKind::Extends
                } else if has_super {
                    BoundKind::Super
                } else {
                    BoundKind::Unbound
                };
                let inner = match kind {
                    BoundKind::Unbound => None,
                    _ => parts
                        .iter()
                        .rev()
                        .find(|c| is_type(c.kind()) || c.kind() == "identifier")
                        .map(|t| Box::new(self.ty(*t))),
                };
                let pos = token_start(node, "?").unwrap_or(start(node));
                self.make(node, pos, JcKind::Wildcard { kind, inner })
            }
            "scoped_identifier" => self.name(node),
            _ => self.erroneous(node),
        }
    }

    fn type_arguments(&mut self, node: Node<'_>) -> Vec<JcTree> {
        named(node).into_iter().map(|t| self.ty(t)).collect()
    }

    // ---- statements ----

    fn block(&mut self, node: Node<'_>) -> JcTree {
        let stats = self.block_statements(node);
        self.spanning(
            node,
            JcKind::Block {
                is_static: false,
                stats,
            },
        )
    }

    fn block_statements(&mut self, node: Node<'_>) -> Vec<JcTree> {
        let mut stats = Vec::new();
        for child in all(node) {
            if is_comment(&child) || child.is_missing() {
                continue;
            }
            match child.kind() {
                "{" | "}" => {}
                ";" => stats.push(self.spanning(child, JcKind::Skip)),
                _ if child.is_named() => self.statement(child, &mut stats),
                _ => {}
            }
        }
        stats
    }

    /// Statement that must lower to exactly one tree.
    fn single_statement(&mut self, node: Node<'_>) -> JcTree {
        let mut out = Vec::new();
        self.statement(node, &mut out);
        if out.len() == 1 {
            if let Some(only) = out.pop() {
                return only;
            }
        }
        self.spanning(
            node,
            JcKind::Block {
                is_static: false,
                stats: out,
            },
        )
    }

    fn statement(&mut self, node: Node<'_>, out: &mut Vec<JcTree>) {
        let tree = match node.kind() {
            "block" => self.block(node),
            "local_variable_declaration" => {
                out.extend(self.variables(node));
                return;
            }
            ";" => self.spanning(node, JcKind::Skip),
            "expression_statement" => {
                let expr = match named(node).into_iter().next() {
                    Some(e) => self.expr(e),
                    None => self.placeholder(start(node)),
                };
                self.spanning(
                    node,
                    JcKind::Exec {
                        expr: Box::new(expr),
                    },
                )
            }
            "if_statement" => {
                let cond = self.required_expr(node, "condition");
                let thenpart = match node.child_by_field_name("consequence") {
                    Some(s) => self.single_statement(s),
                    None => self.placeholder(end(node)),
                };
                let elsepart = node
                    .child_by_field_name("alternative")
                    .map(|s| Box::new(self.single_statement(s)));
                self.spanning(
                    node,
                    JcKind::If {
                        cond: Box::new(cond),
                        thenpart: Box::new(thenpart),
                        elsepart,
                    },
                )
            }
            "while_statement" => {
                let cond = self.required_expr(node, "condition");
                let body = self.required_statement(node, "body");
                self.spanning(
                    node,
                    JcKind::WhileLoop {
                        cond: Box::new(cond),
                        body: Box::new(body),
                    },
                )
            }
            "do_statement" => {
                let body = self.required_statement(node, "body");
                let cond = self.required_expr(node, "condition");
                self.spanning(
                    node,
                    JcKind::DoLoop {
                        body: Box::new(body),
                        cond: Box::new(cond),
                    },
                )
            }
            "for_statement" => {
                let mut init = Vec::new();
                for part in by_field(node, "init") {
                    if part.kind() == "local_variable_declaration" {
                        init.extend(self.variables(part));
                    } else {
                        init.push(self.expression_statement(part));
                    }
                }
                let cond = node
                    .child_by_field_name("condition")
                    .map(|c| Box::new(self.expr(c)));
                let step = by_field(node, "update")
                    .into_iter()
                    .map(|u| self.expression_statement(u))
                    .collect();
                let body = self.required_statement(node, "body");
                self.spanning(
                    node,
                    JcKind::ForLoop {
                        init,
                        cond,
                        step,
                        body: Box::new(body),
                    },
                )
            }
            "enhanced_for_statement" => {
                let mods_node = child_of_kind(node, "modifiers");
                let mods = self.modifiers(mods_node);
                let type_node = node.child_by_field_name("type");
                let vartype = type_node.map(|t| Box::new(self.ty(t)));
                let name_node = node.child_by_field_name("name");
                let name = name_node
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                let dims_node = node.child_by_field_name("dimensions");
                let var_start = mods_node.or(type_node).map(start).unwrap_or(start(node));
                let var_end = dims_node.or(name_node).map(end).unwrap_or(var_start);
                let pos = name_node.map(start).unwrap_or(var_start);
                let var = self.factory.make(
                    var_start,
                    pos,
                    var_end,
                    JcKind::VarDef {
                        mods,
                        name,
                        vartype,
                        dims: count_dims(dims_node),
                        init: None,
                    },
                );
                let expr = self.required_expr(node, "value");
                let body = self.required_statement(node, "body");
                self.spanning(
                    node,
                    JcKind::ForeachLoop {
                        var: Box::new(var),
                        expr: Box::new(expr),
                        body: Box::new(body),
                    },
                )
            }
            "labeled_statement" => {
                let parts = named(node);
                let label = parts
                    .first()
                    .map(|l| self.text(*l).to_string())
                    .unwrap_or_default();
                let body = match parts.get(1) {
                    Some(s) => self.single_statement(*s),
                    None => self.placeholder(end(node)),
                };
                self.spanning(
                    node,
                    JcKind::Labelled {
                        label,
                        body: Box::new(body),
                    },
                )
            }
            "break_statement" => {
                let label = child_of_kind(node, "identifier").map(|l| self.text(l).to_string());
                self.spanning(node, JcKind::Break { label })
            }
            "continue_statement" => {
                let label = child_of_kind(node, "identifier").map(|l| self.text(l).to_string());
                self.spanning(node, JcKind::Continue { label })
            }
            "return_statement" => {
                let expr = named(node).into_iter().next().map(|e| Box::new(self.expr(e)));
                self.spanning(node, JcKind::Return { expr })
            }
            "yield_statement" => {
                let value = self.first_expr(node);
                self.spanning(
                    node,
                    JcKind::Yield {
                        value: Box::new(value),
                    },
                )
            }
            "throw_statement" => {
                let expr = self.first_expr(node);
                self.spanning(
                    node,
                    JcKind::Throw {
                        expr: Box::new(expr),
                    },
                )
            }
            "switch_expression" => {
                let selector = self.required_expr(node, "condition");
                let cases = match node.child_by_field_name("body") {
                    Some(body) => self.cases(body, false),
                    None => Vec::new(),
                };
                self.spanning(
                    node,
                    JcKind::Switch {
                        selector: Box::new(selector),
                        cases,
                    },
                )
            }
            "synchronized_statement" => {
                let lock = match child_of_kind(node, "parenthesized_expression") {
                    Some(lock) => self.expr(lock),
                    None => self.placeholder(start(node)),
                };
                let body = self.required_statement(node, "body");
                self.spanning(
                    node,
                    JcKind::Synchronized {
                        lock: Box::new(lock),
                        body: Box::new(body),
                    },
                )
            }
            "try_statement" | "try_with_resources_statement" => self.try_statement(node),
            "assert_statement" => {
                let parts = named(node);
                let cond = match parts.first() {
                    Some(c) => self.expr(*c),
                    None => self.placeholder(end(node)),
                };
                let detail = parts.get(1).map(|d| Box::new(self.expr(*d)));
                self.spanning(
                    node,
                    JcKind::Assert {
                        cond: Box::new(cond),
                        detail,
                    },
                )
            }
            "explicit_constructor_invocation" => self.constructor_call(node),
            kind if is_type_declaration(kind) => self.class_decl(node),
            kind if is_expression(kind) => self.expression_statement(node),
            _ => self.erroneous(node),
        };
        out.push(tree);
    }

    fn required_statement(&mut self, node: Node<'_>, field: &str) -> JcTree {
        match node.child_by_field_name(field) {
            Some(s) => self.single_statement(s),
            None => self.placeholder(end(node)),
        }
    }

    fn expression_statement(&mut self, node: Node<'_>) -> JcTree {
        let expr = self.expr(node);
        self.spanning(
            node,
            JcKind::Exec {
                expr: Box::new(expr),
            },
        )
    }

    /// `this(...)` and `super(...)` become an `Exec` of an `Apply`.
    fn constructor_call(&mut self, node: Node<'_>) -> JcTree {
        let ctor = node.child_by_field_name("constructor");
        let keyword = ctor.map(|c| self.text(c)).unwrap_or("super");
        let meth = match (node.child_by_field_name("object"), ctor) {
            (Some(object), Some(ctor)) => {
                let selected = self.expr(object);
                let dot = token_before(node, ".", start(ctor)).unwrap_or(start(ctor) - 1);
                self.factory.make(
                    start(object),
                    dot,
                    end(ctor),
                    JcKind::Select {
                        selected: Box::new(selected),
                        name: keyword.to_string(),
                    },
                )
            }
            (None, Some(ctor)) => self.factory.ident(start(ctor), keyword),
            _ => self.placeholder(start(node)),
        };
        let typeargs = node
            .child_by_field_name("type_arguments")
            .map(|t| self.type_arguments(t))
            .unwrap_or_default();
        let args_node = node.child_by_field_name("arguments");
        let args = args_node.map(|a| self.arguments(a)).unwrap_or_default();
        let apply_end = args_node.map(end).unwrap_or(end(node));
        let pos = args_node.map(start).unwrap_or(start(node));
        let apply = self.factory.make(
            start(node),
            pos,
            apply_end,
            JcKind::Apply {
                typeargs,
                meth: Box::new(meth),
                args,
            },
        );
        self.spanning(
            node,
            JcKind::Exec {
                expr: Box::new(apply),
            },
        )
    }

    fn try_statement(&mut self, node: Node<'_>) -> JcTree {
        let resources = match node.child_by_field_name("resources") {
            Some(spec) => named(spec)
                .into_iter()
                .filter(|r| r.kind() == "resource")
                .map(|r| self.resource(r))
                .collect(),
            None => Vec::new(),
        };
        let body = match node.child_by_field_name("body") {
            Some(b) => self.block(b),
            None => self.placeholder(end(node)),
        };
        let mut catchers = Vec::new();
        let mut finalizer = None;
        for child in named(node) {
            match child.kind() {
                "catch_clause" => catchers.push(self.catch_clause(child)),
                "finally_clause" => {
                    if let Some(block) = child_of_kind(child, "block") {
                        finalizer = Some(Box::new(self.block(block)));
                    }
                }
                _ => {}
            }
        }
        self.spanning(
            node,
            JcKind::Try {
                resources,
                body: Box::new(body),
                catchers,
                finalizer,
            },
        )
    }

    fn resource(&mut self, node: Node<'_>) -> JcTree {
        let Some(type_node) = node.child_by_field_name("type") else {
            return self.first_expr(node);
        };
        let mods = self.modifiers(child_of_kind(node, "modifiers"));
        let vartype = Some(Box::new(self.ty(type_node)));
        let name_node = node.child_by_field_name("name");
        let name = name_node
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let init = node
            .child_by_field_name("value")
            .map(|v| Box::new(self.expr(v)));
        let pos = name_node.map(start).unwrap_or(start(node));
        self.make(
            node,
            pos,
            JcKind::VarDef {
                mods,
                name,
                vartype,
                dims: count_dims(node.child_by_field_name("dimensions")),
                init,
            },
        )
    }

    fn catch_clause(&mut self, node: Node<'_>) -> JcTree {
        let param = match child_of_kind(node, "catch_formal_parameter") {
            Some(param) => {
                let mods = self.modifiers(child_of_kind(param, "modifiers"));
                let vartype = child_of_kind(param, "catch_type").map(|types| {
                    let mut alternatives: Vec<JcTree> =
                        named(types).into_iter().map(|t| self.ty(t)).collect();
                    if alternatives.len() == 1 {
                        Box::new(alternatives.remove(0))
                    } else {
                        Box::new(self.spanning(types, JcKind::TypeUnion { alternatives }))
                    }
                });
                let name_node = param.child_by_field_name("name");
                let dims = count_dims(param.child_by_field_name("dimensions"));
                self.parameter(param, mods, vartype, name_node, dims)
            }
            None => self.placeholder(start(node)),
        };
        let body = match node.child_by_field_name("body") {
            Some(b) => self.block(b),
            None => self.placeholder(end(node)),
        };
        self.spanning(
            node,
            JcKind::Catch {
                param: Box::new(param),
                body: Box::new(body),
            },
        )
    }

    /// Switch blocks become one `Case` per label. Grouped labels without
    /// statements of their own get empty cases.
    fn cases(&mut self, block: Node<'_>, in_expression: bool) -> Vec<JcTree> {
        let mut out = Vec::new();
        for child in named(block) {
            match child.kind() {
                "switch_block_statement_group" => {
                    let parts = named(child);
                    let labels: Vec<Node<'_>> = parts
                        .iter()
                        .copied()
                        .filter(|p| p.kind() == "switch_label")
                        .collect();
                    let statements: Vec<Node<'_>> = parts
                        .iter()
                        .copied()
                        .filter(|p| p.kind() != "switch_label")
                        .collect();
                    let count = labels.len();
                    for (i, label) in labels.into_iter().enumerate() {
                        let (label_trees, is_default) = self.case_labels(label);
                        let last = i + 1 == count;
                        let mut stats = Vec::new();
                        if last {
                            for statement in &statements {
                                if statement.kind() == ";" {
                                    stats.push(self.spanning(*statement, JcKind::Skip));
                                } else {
                                    self.statement(*statement, &mut stats);
                                }
                            }
                        }
                        let colon_end = all(child)
                            .into_iter()
                            .find(|c| c.kind() == ":" && start(*c) >= end(label))
                            .map(end)
                            .unwrap_or(end(label));
                        let case_end = match (last, statements.last()) {
                            (true, Some(s)) => end(*s),
                            _ => colon_end,
                        };
                        out.push(self.factory.make(
                            start(label),
                            start(label),
                            case_end,
                            JcKind::Case {
                                labels: label_trees,
                                is_default,
                                rule: false,
                                stats,
                            },
                        ));
                    }
                }
                "switch_rule" => {
                    let (labels, is_default) = match child_of_kind(child, "switch_label") {
                        Some(label) => self.case_labels(label),
                        None => (Vec::new(), false),
                    };
                    let body = named(child)
                        .into_iter()
                        .filter(|c| c.kind() != "switch_label")
                        .last();
                    let mut stats = Vec::new();
                    if let Some(body) = body {
                        if in_expression && body.kind() == "expression_statement" {
                            let value = self.first_expr(body);
                            stats.push(self.spanning(
                                body,
                                JcKind::Yield {
                                    value: Box::new(value),
                                },
                            ));
                        } else {
                            self.statement(body, &mut stats);
                        }
                    }
                    out.push(self.spanning(
                        child,
                        JcKind::Case {
                            labels,
                            is_default,
                            rule: true,
                            stats,
                        },
                    ));
                }
                _ => out.push(self.erroneous(child)),
            }
        }
        out
    }

    fn case_labels(&mut self, label: Node<'_>) -> (Vec<JcTree>, bool) {
        let is_default = all(label).iter().any(|c| c.kind() == "default");
        let mut labels = Vec::new();
        for part in named(label) {
            match part.kind() {
                "guard" => tracing::debug!("Ignoring case guard at {}", start(part)),
                _ => labels.push(self.pattern_or_expr(part)),
            }
        }
        (labels, is_default)
    }

    fn pattern_or_expr(&mut self, node: Node<'_>) -> JcTree {
        match node.kind() {
            "pattern" => match named(node).into_iter().next() {
                Some(inner) => self.pattern_or_expr(inner),
                None => self.erroneous(node),
            },
            "type_pattern" => {
                let parts = named(node);
                let type_node = parts.first().copied();
                let name_node = parts.get(1).copied();
                let var = self.binding_var(node, type_node, name_node);
                self.spanning(node, JcKind::BindingPattern { var: Box::new(var) })
            }
            "record_pattern" => {
                let parts = named(node);
                let deconstructor = match parts.first() {
                    Some(t) => self.ty(*t),
                    None => self.placeholder(start(node)),
                };
                let nested = parts
                    .iter()
                    .skip(1)
                    .flat_map(|body| named(*body))
                    .map(|component| match component.kind() {
                        "record_pattern_component" => match named(component).as_slice() {
                            [ty, name] => {
                                let var = self.binding_var(component, Some(*ty), Some(*name));
                                self.spanning(
                                    component,
                                    JcKind::BindingPattern { var: Box::new(var) },
                                )
                            }
                            [only] => self.pattern_or_expr(*only),
                            _ => self.erroneous(component),
                        },
                        _ => self.pattern_or_expr(component),
                    })
                    .collect();
                self.spanning(
                    node,
                    JcKind::RecordPattern {
                        deconstructor: Box::new(deconstructor),
                        nested,
                    },
                )
            }
            "underscore_pattern" => self.spanning(node, JcKind::AnyPattern),
            _ => self.expr(node),
        }
    }

    fn binding_var(
        &mut self,
        node: Node<'_>,
        type_node: Option<Node<'_>>,
        name_node: Option<Node<'_>>,
    ) -> JcTree {
        let vartype = type_node.map(|t| Box::new(self.ty(t)));
        let name = name_node
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let pos = name_node.map(start).unwrap_or(start(node));
        let var_start = type_node.map(start).unwrap_or(pos);
        let var_end = name_node.map(end).unwrap_or(end(node));
        self.factory.make(
            var_start,
            pos,
            var_end,
            JcKind::VarDef {
                mods: Modifiers::empty(),
                name,
                vartype,
                dims: 0,
                init: None,
            },
        )
    }

    // ---- expressions ----

    fn required_expr(&mut self, node: Node<'_>, field: &str) -> JcTree {
        match node.child_by_field_name(field) {
            Some(e) => self.expr(e),
            None => self.placeholder(end(node)),
        }
    }

    fn first_expr(&mut self, node: Node<'_>) -> JcTree {
        match named(node).into_iter().next() {
            Some(e) => self.expr(e),
            None => self.placeholder(end(node)),
        }
    }

    fn arguments(&mut self, list: Node<'_>) -> Vec<JcTree> {
        named(list).into_iter().map(|a| self.expr(a)).collect()
    }

    fn literal(&mut self, node: Node<'_>, typetag: TypeTag) -> JcTree {
        let value = self.text(node).to_string();
        self.spanning(node, JcKind::Literal { typetag, value })
    }

    pub(crate) fn expr(&mut self, node: Node<'_>) -> JcTree {
        match node.kind() {
            "identifier" | "type_identifier" | "this" | "super" => {
                let name = self.text(node).to_string();
                self.spanning(node, JcKind::Ident { name })
            }
            "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal"
            | "binary_integer_literal" => {
                let tag = if self.text(node).ends_with(['l', 'L']) {
                    TypeTag::Long
                } else {
                    TypeTag::Int
                };
                self.literal(node, tag)
            }
            "decimal_floating_point_literal" | "hex_floating_point_literal" => {
                let tag = if self.text(node).ends_with(['f', 'F']) {
                    TypeTag::Float
                } else {
                    TypeTag::Double
                };
                self.literal(node, tag)
            }
            "true" | "false" => self.literal(node, TypeTag::Boolean),
            "character_literal" => self.literal(node, TypeTag::Char),
            "string_literal" | "text_block" => self.literal(node, TypeTag::Class),
            "null_literal" => self.literal(node, TypeTag::Bot),
            "parenthesized_expression" => {
                let inner = self.first_expr(node);
                self.spanning(
                    node,
                    JcKind::Parens {
                        expr: Box::new(inner),
                    },
                )
            }
            "binary_expression" => {
                let Some(operator) = node.child_by_field_name("operator") else {
                    return self.erroneous(node);
                };
                let Some(op) = Tag::binary_from_symbol(operator.kind()) else {
                    tracing::warn!("Unknown binary operator '{}'", operator.kind());
                    return self.erroneous(node);
                };
                let lhs = self.required_expr(node, "left");
                let rhs = self.required_expr(node, "right");
                self.make(
                    node,
                    start(operator),
                    JcKind::Binary {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                )
            }
            "unary_expression" => {
                let operator = node.child_by_field_name("operator");
                let op = match operator.map(|o| o.kind()) {
                    Some("+") => Tag::Pos,
                    Some("-") => Tag::Neg,
                    Some("!") => Tag::Not,
                    Some("~") => Tag::Compl,
                    _ => return self.erroneous(node),
                };
                let arg = self.required_expr(node, "operand");
                self.spanning(
                    node,
                    JcKind::Unary {
                        op,
                        arg: Box::new(arg),
                    },
                )
            }
            "update_expression" => {
                let children = all(node);
                let prefix = children.first().map(|c| c.kind());
                let postfix = children.last().map(|c| c.kind());
                let (op, pos) = match (prefix, postfix) {
                    (Some("++"), _) => (Tag::PreInc, start(node)),
                    (Some("--"), _) => (Tag::PreDec, start(node)),
                    (_, Some("++")) => (Tag::PostInc, end(node) - 2),
                    (_, Some("--")) => (Tag::PostDec, end(node) - 2),
                    _ => return self.erroneous(node),
                };
                let arg = self.first_expr(node);
                self.make(
                    node,
                    pos,
                    JcKind::Unary {
                        op,
                        arg: Box::new(arg),
                    },
                )
            }
            "assignment_expression" => {
                let Some(operator) = node.child_by_field_name("operator") else {
                    return self.erroneous(node);
                };
                let lhs = Box::new(self.required_expr(node, "left"));
                let rhs = Box::new(self.required_expr(node, "right"));
                let kind = match operator.kind() {
                    "=" => JcKind::Assign { lhs, rhs },
                    symbol => match Tag::assign_op_from_symbol(symbol) {
                        Some(op) => JcKind::AssignOp { op, lhs, rhs },
                        None => return self.erroneous(node),
                    },
                };
                self.make(node, start(operator), kind)
            }
            "ternary_expression" => {
                let cond = self.required_expr(node, "condition");
                let truepart = self.required_expr(node, "consequence");
                let falsepart = self.required_expr(node, "alternative");
                let pos = token_start(node, "?").unwrap_or(start(node));
                self.make(
                    node,
                    pos,
                    JcKind::Conditional {
                        cond: Box::new(cond),
                        truepart: Box::new(truepart),
                        falsepart: Box::new(falsepart),
                    },
                )
            }
            "cast_expression" => {
                let types = by_field(node, "type");
                let clazz = match types.as_slice() {
                    [single] => self.ty(*single),
                    [first, .., last] => {
                        let bounds = types.iter().map(|t| self.ty(*t)).collect();
                        self.factory.make(
                            start(*first),
                            start(*first),
                            end(*last),
                            JcKind::TypeIntersection { bounds },
                        )
                    }
                    [] => self.placeholder(start(node)),
                };
                let expr = self.required_expr(node, "value");
                self.spanning(
                    node,
                    JcKind::TypeCast {
                        clazz: Box::new(clazz),
                        expr: Box::new(expr),
                    },
                )
            }
            "instanceof_expression" => {
                let expr = self.required_expr(node, "left");
                let pattern = if let Some(record) = node.child_by_field_name("pattern") {
                    self.pattern_or_expr(record)
                } else {
                    let type_node = node.child_by_field_name("right");
                    match node.child_by_field_name("name") {
                        Some(name) => {
                            let var = self.binding_var(node, type_node, Some(name));
                            let pattern_start = type_node.map(start).unwrap_or(start(name));
                            self.factory.make(
                                pattern_start,
                                pattern_start,
                                end(name),
                                JcKind::BindingPattern { var: Box::new(var) },
                            )
                        }
                        None => match type_node {
                            Some(t) => self.ty(t),
                            None => self.placeholder(end(node)),
                        },
                    }
                };
                let pos = token_start(node, "instanceof").unwrap_or(start(node));
                self.make(
                    node,
                    pos,
                    JcKind::InstanceOf {
                        expr: Box::new(expr),
                        pattern: Box::new(pattern),
                    },
                )
            }
            "lambda_expression" => {
                let (params, parenthesized) = match node.child_by_field_name("parameters") {
                    Some(p) if p.kind() == "identifier" => (vec![self.implicit_param(p)], false),
                    Some(p) if p.kind() == "formal_parameters" => {
                        (self.formal_parameters(p), true)
                    }
                    Some(p) => (
                        named(p)
                            .into_iter()
                            .map(|id| self.implicit_param(id))
                            .collect(),
                        true,
                    ),
                    None => (Vec::new(), true),
                };
                let body = match node.child_by_field_name("body") {
                    Some(b) if b.kind() == "block" => self.block(b),
                    Some(b) => self.expr(b),
                    None => self.placeholder(end(node)),
                };
                let pos = token_start(node, "->").unwrap_or(start(node));
                self.make(
                    node,
                    pos,
                    JcKind::Lambda {
                        params,
                        body: Box::new(body),
                        parenthesized,
                    },
                )
            }
            "method_invocation" => self.method_invocation(node),
            "object_creation_expression" => self.new_class(node),
            "field_access" => {
                let Some(object) = node.child_by_field_name("object") else {
                    return self.erroneous(node);
                };
                let Some(field) = node.child_by_field_name("field") else {
                    return self.erroneous(node);
                };
                let selected = self.qualified_receiver(node, object);
                let dot = token_before(node, ".", start(field)).unwrap_or(start(field) - 1);
                let name = self.text(field).to_string();
                self.make(
                    node,
                    dot,
                    JcKind::Select {
                        selected: Box::new(selected),
                        name,
                    },
                )
            }
            "array_access" => {
                let indexed = self.required_expr(node, "array");
                let index = self.required_expr(node, "index");
                self.spanning(
                    node,
                    JcKind::Indexed {
                        indexed: Box::new(indexed),
                        index: Box::new(index),
                    },
                )
            }
            "array_creation_expression" => {
                let elemtype = node
                    .child_by_field_name("type")
                    .map(|t| Box::new(self.ty(t)));
                let mut dims = Vec::new();
                let mut extra_dims = 0;
                for dim in by_field(node, "dimensions") {
                    match dim.kind() {
                        "dimensions_expr" => dims.push(self.first_expr(dim)),
                        "dimensions" => extra_dims += count_dims(Some(dim)),
                        _ => {}
                    }
                }
                let elems = node.child_by_field_name("value").map(|init| {
                    named(init)
                        .into_iter()
                        .map(|e| self.initializer(e))
                        .collect()
                });
                self.spanning(
                    node,
                    JcKind::NewArray {
                        elemtype,
                        dims,
                        extra_dims,
                        elems,
                    },
                )
            }
            "array_initializer" => self.array_initializer(node),
            "class_literal" => {
                let selected = match named(node).into_iter().next() {
                    Some(t) => self.ty(t),
                    None => self.placeholder(start(node)),
                };
                let pos = token_before(node, ".", end(node)).unwrap_or(start(node));
                self.make(
                    node,
                    pos,
                    JcKind::Select {
                        selected: Box::new(selected),
                        name: "class".to_string(),
                    },
                )
            }
            "method_reference" => {
                let parts = named(node);
                let expr = match parts.first() {
                    Some(q) if is_type(q.kind()) => self.ty(*q),
                    Some(q) => self.expr(*q),
                    None => self.placeholder(start(node)),
                };
                let typeargs = child_of_kind(node, "type_arguments")
                    .map(|t| self.type_arguments(t))
                    .unwrap_or_default();
                let (mode, name) = if has_token(node, "new") {
                    (ReferenceMode::New, "<init>".to_string())
                } else {
                    let name = parts
                        .iter()
                        .skip(1)
                        .rev()
                        .find(|p| p.kind() == "identifier")
                        .map(|p| self.text(*p).to_string())
                        .unwrap_or_default();
                    (ReferenceMode::Invoke, name)
                };
                let pos = token_start(node, "::").unwrap_or(start(node));
                self.make(
                    node,
                    pos,
                    JcKind::Reference {
                        mode,
                        name,
                        expr: Box::new(expr),
                        typeargs,
                    },
                )
            }
            "switch_expression" => {
                let selector = self.required_expr(node, "condition");
                let cases = match node.child_by_field_name("body") {
                    Some(body) => self.cases(body, true),
                    None => Vec::new(),
                };
                self.spanning(
                    node,
                    JcKind::SwitchExpression {
                        selector: Box::new(selector),
                        cases,
                    },
                )
            }
            "marker_annotation" | "annotation" => self.annotation(node),
            "element_value_array_initializer" => self.element_value(node),
            "scoped_identifier" => self.name(node),
            kind if is_type(kind) => self.ty(node),
            "template_expression" => self.unsupported(
                node,
                "compiler.err.illegal.start.of.expr",
                "string templates are not supported",
            ),
            _ => self.erroneous(node),
        }
    }

    fn implicit_param(&mut self, ident: Node<'_>) -> JcTree {
        let name = self.text(ident).to_string();
        self.spanning(
            ident,
            JcKind::VarDef {
                mods: Modifiers::empty(),
                name,
                vartype: None,
                dims: 0,
                init: None,
            },
        )
    }

    /// Receiver of a field access or call, including the `X.super` form.
    fn qualified_receiver(&mut self, node: Node<'_>, object: Node<'_>) -> JcTree {
        let selected = self.expr(object);
        let extra_super = named(node)
            .into_iter()
            .find(|c| c.kind() == "super" && c.id() != object.id() && start(*c) > start(object));
        match extra_super {
            Some(sup) => {
                let dot = token_before(node, ".", start(sup)).unwrap_or(start(sup) - 1);
                self.factory.make(
                    start(object),
                    dot,
                    end(sup),
                    JcKind::Select {
                        selected: Box::new(selected),
                        name: "super".to_string(),
                    },
                )
            }
            None => selected,
        }
    }

    fn method_invocation(&mut self, node: Node<'_>) -> JcTree {
        let Some(name_node) = node.child_by_field_name("name") else {
            return self.erroneous(node);
        };
        let name = self.text(name_node).to_string();
        let meth = match node.child_by_field_name("object") {
            None => self.spanning(name_node, JcKind::Ident { name }),
            Some(object) => {
                let selected = self.qualified_receiver(node, object);
                let dot = token_before(node, ".", start(name_node)).unwrap_or(start(name_node) - 1);
                self.factory.make(
                    start(object),
                    dot,
                    end(name_node),
                    JcKind::Select {
                        selected: Box::new(selected),
                        name,
                    },
                )
            }
        };
        let typeargs = node
            .child_by_field_name("type_arguments")
            .map(|t| self.type_arguments(t))
            .unwrap_or_default();
        let args_node = node.child_by_field_name("arguments");
        let args = args_node.map(|a| self.arguments(a)).unwrap_or_default();
        let pos = args_node.map(start).unwrap_or(end(name_node));
        self.make(
            node,
            pos,
            JcKind::Apply {
                typeargs,
                meth: Box::new(meth),
                args,
            },
        )
    }

    fn new_class(&mut self, node: Node<'_>) -> JcTree {
        let mut encl = None;
        for child in all(node) {
            if child.kind() == "new" {
                break;
            }
            if child.is_named() && !is_comment(&child) {
                encl = Some(Box::new(self.expr(child)));
            }
        }
        let typeargs = node
            .child_by_field_name("type_arguments")
            .map(|t| self.type_arguments(t))
            .unwrap_or_default();
        let clazz = match node.child_by_field_name("type") {
            Some(t) => self.ty(t),
            None => self.placeholder(end(node)),
        };
        let args = node
            .child_by_field_name("arguments")
            .map(|a| self.arguments(a))
            .unwrap_or_default();
        let def = child_of_kind(node, "class_body").map(|body| Box::new(self.anonymous_class(body)));
        let pos = token_start(node, "new").unwrap_or(start(node));
        self.make(
            node,
            pos,
            JcKind::NewClass {
                encl,
                typeargs,
                clazz: Box::new(clazz),
                args,
                def,
            },
        )
    }

    /// A construct with no javac-shaped lowering: an erroneous tree plus an
    /// error on its whole span.
    fn unsupported(&mut self, node: Node<'_>, code: &str, message: &str) -> JcTree {
        tracing::debug!("Unsupported {} at {}", node.kind(), start(node));
        let tree = self.erroneous(node);
        self.diagnostics.push(
            ForeignDiagnostic::error(code, message)
                .at(start(node), start(node), end(node))
                .with_tree(tree.id),
        );
        tree
    }

    /// Wraps whatever can be salvaged from a malformed region.
    fn erroneous(&mut self, node: Node<'_>) -> JcTree {
        let mut errs = Vec::new();
        for child in named(node) {
            let kind = child.kind();
            if is_statement(kind) {
                self.statement(child, &mut errs);
            } else if is_expression(kind) {
                errs.push(self.expr(child));
            }
        }
        self.spanning(node, JcKind::Erroneous { errs })
    }
}

fn count_dims(node: Option<Node<'_>>) -> u32 {
    node.map(|dims| all(dims).iter().filter(|c| c.kind() == "[").count() as u32)
        .unwrap_or(0)
}
