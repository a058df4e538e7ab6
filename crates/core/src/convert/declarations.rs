use super::Converter;
use super::fragments::{Grouped, group_declarations};
use crate::error::{ConversionError, Result};
use jdt_bridge_api::{ModifierKeyword, NodeId, NodeKind, Prop, SourceRange};
use jdt_bridge_javac::{ClassKind, JcKind, JcTree, flags as jflags};

/// Flags javac adds to enum constants without any source spelling.
const ENUM_CONSTANT_IMPLIED: u64 = jflags::PUBLIC | jflags::STATIC | jflags::FINAL | jflags::ENUM;
/// Flags javac adds to record components.
const RECORD_COMPONENT_IMPLIED: u64 = jflags::RECORD | jflags::PRIVATE | jflags::FINAL;

const CONSTRUCTOR_NAME: &str = "<init>";

fn member_flags(tree: &JcTree) -> u64 {
    match &tree.kind {
        JcKind::VarDef { mods, .. } => mods.flags,
        _ => 0,
    }
}

impl Converter<'_> {
    pub(super) fn compilation_unit(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::CompilationUnit {
            package,
            imports,
            defs,
        } = &tree.kind
        else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let range = SourceRange::new(0, self.source.len() as i32);
        let unit = self.alloc_at(tree, NodeKind::CompilationUnit, range);

        if let Some(package) = package {
            let JcKind::Package { annotations, pid } = &package.kind else {
                return Err(ConversionError::unsupported(package.tag(), package.start));
            };
            let decl = self.alloc(package, NodeKind::PackageDeclaration);
            for annotation in annotations {
                let annotation = self.annotation(annotation)?;
                self.ast.add_child(decl, Prop::Annotations, annotation);
            }
            let name = self.name(pid)?;
            self.ast.add_child(decl, Prop::Name, name);
            self.ast.add_child(unit, Prop::Package, decl);
        }

        for import in imports {
            let JcKind::Import { qualid, is_static } = &import.kind else {
                tracing::warn!("Dropping malformed import at offset {}", import.start);
                continue;
            };
            let (name_tree, on_demand) = match &qualid.kind {
                JcKind::Select { selected, name } if name == "*" => (&**selected, true),
                _ => (&**qualid, false),
            };
            let decl = self.alloc(
                import,
                NodeKind::ImportDeclaration {
                    is_static: *is_static,
                    on_demand,
                },
            );
            let name = self.name(name_tree)?;
            self.ast.add_child(decl, Prop::Name, name);
            self.ast.add_child(unit, Prop::Imports, decl);
        }

        for def in defs {
            match &def.kind {
                JcKind::ClassDef { .. } => {
                    let decl = self.type_declaration(def)?;
                    self.ast.add_child(unit, Prop::Types, decl);
                }
                JcKind::Skip => {}
                _ => tracing::warn!("Dropping {:?} at top level, offset {}", def.tag(), def.start),
            }
        }
        Ok(unit)
    }

    pub(super) fn type_declaration(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::ClassDef {
            mods,
            name,
            class_kind,
            typarams,
            extending,
            implementing,
            permitting,
            defs,
        } = &tree.kind
        else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let kind = match class_kind {
            ClassKind::Class => NodeKind::TypeDeclaration {
                is_interface: false,
            },
            ClassKind::Interface => NodeKind::TypeDeclaration { is_interface: true },
            ClassKind::Enum => NodeKind::EnumDeclaration,
            ClassKind::Record => NodeKind::RecordDeclaration,
            ClassKind::AnnotationType => NodeKind::AnnotationTypeDeclaration,
        };
        let decl = self.alloc(tree, kind);
        self.modifiers(decl, mods, 0)?;
        let name_node = self.simple_name(name, SourceRange::UNSET);
        self.ast.add_child(decl, Prop::Name, name_node);
        self.type_parameters(decl, typarams)?;

        if let Some(extending) = extending {
            let superclass = self.ty(extending)?;
            self.ast.add_child(decl, Prop::SuperclassType, superclass);
        }
        for interface in implementing {
            let interface = self.ty(interface)?;
            self.ast.add_child(decl, Prop::SuperInterfaceTypes, interface);
        }
        if self.api_level.supports_sealed_types() {
            for permitted in permitting {
                let permitted = self.ty(permitted)?;
                self.ast.add_child(decl, Prop::PermittedTypes, permitted);
            }
        }

        self.type_names.push(name.clone());
        let members = self.members(decl, *class_kind, defs);
        self.type_names.pop();
        members?;
        Ok(decl)
    }

    fn type_parameters(&mut self, owner: NodeId, typarams: &[JcTree]) -> Result<()> {
        for param in typarams {
            let JcKind::TypeParameter {
                name,
                bounds,
                annotations,
            } = &param.kind
            else {
                return Err(ConversionError::unsupported(param.tag(), param.start));
            };
            let id = self.alloc(param, NodeKind::TypeParameter);
            for annotation in annotations {
                let annotation = self.annotation(annotation)?;
                self.ast.add_child(id, Prop::Modifiers, annotation);
            }
            let name = self.simple_name(name, SourceRange::UNSET);
            self.ast.add_child(id, Prop::Name, name);
            for bound in bounds {
                let bound = self.ty(bound)?;
                self.ast.add_child(id, Prop::Bounds, bound);
            }
            self.ast.add_child(owner, Prop::TypeParameters, id);
        }
        Ok(())
    }

    /// Splits members into enum constants or record components and ordinary
    /// body declarations in a single pass.
    fn members(&mut self, decl: NodeId, class_kind: ClassKind, defs: &[JcTree]) -> Result<()> {
        let mut body: Vec<&JcTree> = Vec::new();
        for def in defs {
            let flags = member_flags(def);
            if class_kind == ClassKind::Enum && flags & jflags::ENUM != 0 {
                let constant = self.enum_constant(def)?;
                self.ast.add_child(decl, Prop::EnumConstants, constant);
            } else if class_kind == ClassKind::Record && flags & jflags::RECORD != 0 {
                let component = self.single_variable(def, RECORD_COMPONENT_IMPLIED)?;
                self.ast.add_child(decl, Prop::RecordComponents, component);
            } else {
                body.push(def);
            }
        }
        self.body_declarations(decl, class_kind, body)
    }

    fn body_declarations<'t>(
        &mut self,
        owner: NodeId,
        class_kind: ClassKind,
        defs: impl IntoIterator<Item = &'t JcTree>,
    ) -> Result<()> {
        for item in group_declarations(defs) {
            let member = match item {
                Grouped::Vars(group) => Some(self.field_declaration(&group)?),
                Grouped::Single(def) => self.body_declaration(def, class_kind)?,
            };
            if let Some(member) = member {
                self.ast.add_child(owner, Prop::BodyDeclarations, member);
            }
        }
        Ok(())
    }

    /// `None` for members with no unified counterpart.
    fn body_declaration(&mut self, def: &JcTree, class_kind: ClassKind) -> Result<Option<NodeId>> {
        let member = match &def.kind {
            JcKind::ClassDef { .. } => self.type_declaration(def)?,
            JcKind::MethodDef { mods, .. } if mods.has(jflags::GENERATED_CONSTR) => return Ok(None),
            JcKind::MethodDef { .. } if class_kind == ClassKind::AnnotationType => {
                self.annotation_member(def)?
            }
            JcKind::MethodDef { .. } => self.method(def)?,
            JcKind::Block { is_static, .. } => self.initializer(def, *is_static)?,
            JcKind::Skip => return Ok(None),
            JcKind::Erroneous { .. } => {
                tracing::warn!("Dropping erroneous member at offset {}", def.start);
                return Ok(None);
            }
            _ => return Err(ConversionError::unsupported(def.tag(), def.start)),
        };
        Ok(Some(member))
    }

    fn enum_constant(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::VarDef {
            mods, name, init, ..
        } = &tree.kind
        else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let constant = self.alloc(tree, NodeKind::EnumConstantDeclaration);
        self.modifiers(constant, mods, ENUM_CONSTANT_IMPLIED)?;
        let name = self.name_at(name, tree.pos);
        self.ast.add_child(constant, Prop::Name, name);
        // The initializer is a synthetic `new E(args) {body}`; only the
        // arguments and the body have source.
        if let Some(init) = init {
            if let JcKind::NewClass { args, def, .. } = &init.kind {
                self.arguments(constant, args)?;
                if let Some(def) = def {
                    let body = self.anonymous_class(def)?;
                    self.ast
                        .add_child(constant, Prop::AnonymousClassDeclaration, body);
                }
            }
        }
        Ok(constant)
    }

    pub(super) fn anonymous_class(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::ClassDef { defs, .. } = &tree.kind else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let id = self.alloc(tree, NodeKind::AnonymousClassDeclaration);
        self.type_names.push(String::new());
        let members = self.body_declarations(id, ClassKind::Class, defs);
        self.type_names.pop();
        members?;
        Ok(id)
    }

    fn method(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::MethodDef {
            mods,
            name,
            restype,
            typarams,
            params,
            dims,
            thrown,
            body,
            ..
        } = &tree.kind
        else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let is_constructor = name == CONSTRUCTOR_NAME;
        let decl = self.alloc(
            tree,
            NodeKind::MethodDeclaration {
                is_constructor,
                extra_dimensions: *dims,
            },
        );
        self.modifiers(decl, mods, 0)?;
        self.type_parameters(decl, typarams)?;
        if let Some(restype) = restype {
            let ty = self.ty(restype)?;
            self.ast.add_child(decl, Prop::ReturnType, ty);
        }
        let name_node = if is_constructor {
            let type_name = self.type_names.last().cloned().unwrap_or_default();
            self.name_at(&type_name, tree.pos)
        } else {
            self.name_at(name, tree.pos)
        };
        self.ast.add_child(decl, Prop::Name, name_node);
        for param in params {
            if matches!(param.kind, JcKind::Erroneous { .. }) {
                tracing::warn!("Dropping erroneous parameter at offset {}", param.start);
                continue;
            }
            let param = self.single_variable(param, 0)?;
            self.ast.add_child(decl, Prop::Parameters, param);
        }
        for thrown in thrown {
            let thrown = self.ty(thrown)?;
            self.ast.add_child(decl, Prop::ThrownExceptionTypes, thrown);
        }
        if let Some(body) = body {
            let body = self.block(body)?;
            self.ast.add_child(decl, Prop::Body, body);
        }
        Ok(decl)
    }

    fn annotation_member(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::MethodDef {
            mods,
            name,
            restype,
            default_value,
            ..
        } = &tree.kind
        else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let decl = self.alloc(tree, NodeKind::AnnotationTypeMemberDeclaration);
        self.modifiers(decl, mods, 0)?;
        if let Some(restype) = restype {
            let ty = self.ty(restype)?;
            self.ast.add_child(decl, Prop::Type, ty);
        }
        let name = self.name_at(name, tree.pos);
        self.ast.add_child(decl, Prop::Name, name);
        if let Some(default_value) = default_value {
            let value = self.expr(default_value)?;
            self.ast.add_child(decl, Prop::Default, value);
        }
        Ok(decl)
    }

    /// Static or instance initializer. The `static` keyword becomes an
    /// unpositioned modifier and the braces a nested block.
    fn initializer(&mut self, tree: &JcTree, is_static: bool) -> Result<NodeId> {
        let JcKind::Block { stats, .. } = &tree.kind else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let decl = self.alloc(tree, NodeKind::Initializer);
        if is_static {
            let modifier = self.synthetic(
                NodeKind::Modifier {
                    keyword: ModifierKeyword::Static,
                },
                SourceRange::UNSET,
            );
            self.ast.add_child(decl, Prop::Modifiers, modifier);
        }
        let end = self.end_of(tree);
        let brace = self
            .find_token("{", tree.start, end)
            .map(|t| t.start)
            .unwrap_or(tree.start);
        let body = self.alloc_at(tree, NodeKind::Block, SourceRange::from_bounds(brace, end));
        self.statements_into(body, Prop::Statements, stats)?;
        self.ast.add_child(decl, Prop::Body, body);
        Ok(decl)
    }
}
