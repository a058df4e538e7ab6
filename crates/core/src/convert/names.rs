use super::Converter;
use crate::error::{ConversionError, Result};
use jdt_bridge_api::{NodeId, NodeKind, PrimitiveCode, Prop, SourceRange, flags};
use jdt_bridge_javac::{BoundKind, JcKind, JcTree, TypeTag};

/// Member names that never form part of a plain dotted name.
const NON_NAME_SELECTORS: [&str; 5] = ["this", "super", "class", "*", "<init>"];

/// True for an `Ident`/`Select` chain that reads as a dotted name.
pub(super) fn is_name_chain(tree: &JcTree) -> bool {
    match &tree.kind {
        JcKind::Ident { name } => !NON_NAME_SELECTORS.contains(&name.as_str()),
        JcKind::Select { selected, name } => {
            !NON_NAME_SELECTORS.contains(&name.as_str()) && is_name_chain(selected)
        }
        _ => false,
    }
}

/// True when `tree` is `super` or `X.super`.
pub(super) fn is_super(tree: &JcTree) -> bool {
    match &tree.kind {
        JcKind::Ident { name } => name == "super",
        JcKind::Select { name, .. } => name == "super",
        _ => false,
    }
}

fn primitive_code(tag: TypeTag) -> Option<PrimitiveCode> {
    Some(match tag {
        TypeTag::Byte => PrimitiveCode::Byte,
        TypeTag::Short => PrimitiveCode::Short,
        TypeTag::Char => PrimitiveCode::Char,
        TypeTag::Int => PrimitiveCode::Int,
        TypeTag::Long => PrimitiveCode::Long,
        TypeTag::Float => PrimitiveCode::Float,
        TypeTag::Double => PrimitiveCode::Double,
        TypeTag::Boolean => PrimitiveCode::Boolean,
        TypeTag::Void => PrimitiveCode::Void,
        TypeTag::Class | TypeTag::Bot => return None,
    })
}

impl Converter<'_> {
    /// Simple or qualified name. A qualified name owns its qualifier, and its
    /// last segment is positioned from the end of the dotted text.
    pub(super) fn name(&mut self, tree: &JcTree) -> Result<NodeId> {
        match &tree.kind {
            JcKind::Ident { name } => Ok(self.alloc(
                tree,
                NodeKind::SimpleName {
                    identifier: name.as_str().into(),
                },
            )),
            JcKind::Select { selected, name } => {
                let qualifier = self.name(selected)?;
                let end = self.end_of(tree);
                let simple = self.name_ending_at(name, end);
                let qualified = self.alloc(tree, NodeKind::QualifiedName);
                self.ast.add_child(qualified, Prop::Qualifier, qualifier);
                self.ast.add_child(qualified, Prop::Name, simple);
                Ok(qualified)
            }
            JcKind::Erroneous { .. } => {
                tracing::warn!("Missing name at offset {}", tree.start);
                Ok(self.placeholder(
                    tree,
                    NodeKind::SimpleName {
                        identifier: "MISSING".into(),
                    },
                ))
            }
            _ => Err(ConversionError::unsupported(tree.tag(), tree.start)),
        }
    }

    pub(super) fn literal(&mut self, tree: &JcTree, typetag: TypeTag, value: &str) -> NodeId {
        let kind = match typetag {
            TypeTag::Boolean => NodeKind::BooleanLiteral {
                value: value == "true",
            },
            TypeTag::Char => NodeKind::CharacterLiteral {
                escaped: value.into(),
            },
            TypeTag::Class if value.starts_with("\"\"\"") => NodeKind::TextBlock {
                escaped: value.to_string(),
            },
            TypeTag::Class => NodeKind::StringLiteral {
                escaped: value.to_string(),
            },
            TypeTag::Bot | TypeTag::Void => NodeKind::NullLiteral,
            TypeTag::Byte
            | TypeTag::Short
            | TypeTag::Int
            | TypeTag::Long
            | TypeTag::Float
            | TypeTag::Double => NodeKind::NumberLiteral {
                token: value.into(),
            },
        };
        self.alloc(tree, kind)
    }

    pub(super) fn ty(&mut self, tree: &JcTree) -> Result<NodeId> {
        match &tree.kind {
            JcKind::TypeIdent { typetag } => {
                let code = primitive_code(*typetag)
                    .ok_or_else(|| ConversionError::unsupported(typetag, tree.start))?;
                Ok(self.alloc(tree, NodeKind::PrimitiveType { code }))
            }
            JcKind::Ident { .. } => {
                let name = self.name(tree)?;
                let ty = self.alloc(tree, NodeKind::SimpleType);
                self.ast.add_child(ty, Prop::Name, name);
                Ok(ty)
            }
            JcKind::Select { selected, name } => {
                if is_name_chain(tree) {
                    let name = self.name(tree)?;
                    let ty = self.alloc(tree, NodeKind::SimpleType);
                    self.ast.add_child(ty, Prop::Name, name);
                    return Ok(ty);
                }
                // Outer.Inner where Outer is parameterized or annotated
                let qualifier = self.ty(selected)?;
                let end = self.end_of(tree);
                let simple = self.name_ending_at(name, end);
                let ty = self.alloc(tree, NodeKind::QualifiedType);
                self.ast.add_child(ty, Prop::Qualifier, qualifier);
                self.ast.add_child(ty, Prop::Name, simple);
                Ok(ty)
            }
            JcKind::TypeApply { clazz, arguments } => {
                let base = self.ty(clazz)?;
                let ty = self.alloc(tree, NodeKind::ParameterizedType);
                self.ast.add_child(ty, Prop::Type, base);
                for argument in arguments {
                    let argument = self.ty(argument)?;
                    self.ast.add_child(ty, Prop::TypeArguments, argument);
                }
                Ok(ty)
            }
            JcKind::TypeArray { .. } => self.array_type(tree),
            JcKind::Wildcard { kind, inner } => {
                let ty = self.alloc(
                    tree,
                    NodeKind::WildcardType {
                        upper_bound: *kind != BoundKind::Super,
                    },
                );
                if let Some(inner) = inner {
                    let bound = self.ty(inner)?;
                    self.ast.add_child(ty, Prop::Bound, bound);
                }
                Ok(ty)
            }
            JcKind::TypeUnion { alternatives } => {
                let ty = self.alloc(tree, NodeKind::UnionType);
                for alternative in alternatives {
                    let alternative = self.ty(alternative)?;
                    self.ast.add_child(ty, Prop::Types, alternative);
                }
                Ok(ty)
            }
            JcKind::TypeIntersection { bounds } => {
                let ty = self.alloc(tree, NodeKind::IntersectionType);
                for bound in bounds {
                    let bound = self.ty(bound)?;
                    self.ast.add_child(ty, Prop::Types, bound);
                }
                Ok(ty)
            }
            JcKind::AnnotatedType {
                annotations,
                underlying,
            } => {
                let ty = self.ty(underlying)?;
                for annotation in annotations.iter().rev() {
                    let annotation = self.annotation(annotation)?;
                    self.ast.add_child_first(ty, Prop::Annotations, annotation);
                }
                let range = self.range_of(tree);
                self.ast.set_range(ty, range);
                Ok(ty)
            }
            JcKind::Erroneous { .. } => {
                tracing::warn!("Missing type at offset {}", tree.start);
                let name = self.placeholder(
                    tree,
                    NodeKind::SimpleName {
                        identifier: "MISSING".into(),
                    },
                );
                let ty = self.placeholder(tree, NodeKind::SimpleType);
                self.ast.add_child(ty, Prop::Name, name);
                Ok(ty)
            }
            _ => Err(ConversionError::unsupported(tree.tag(), tree.start)),
        }
    }

    /// Flattens nested foreign array types into one `ArrayType` with a
    /// `Dimension` per bracket pair, innermost pair first.
    fn array_type(&mut self, tree: &JcTree) -> Result<NodeId> {
        let mut brackets = Vec::new();
        let mut element = tree;
        while let JcKind::TypeArray { elemtype } = &element.kind {
            brackets.push(SourceRange::from_bounds(element.pos, self.end_of(element)));
            element = elemtype;
        }
        brackets.reverse();

        let element = self.ty(element)?;
        let ty = self.alloc(tree, NodeKind::ArrayType);
        self.ast.add_child(ty, Prop::ElementType, element);
        for range in brackets {
            let dimension = self.synthetic(NodeKind::Dimension, range);
            self.ast.add_child(ty, Prop::Dimensions, dimension);
        }
        Ok(ty)
    }

    /// Array type built from an element type and `count` bracket ranges found
    /// in the source after it.
    pub(super) fn array_type_with_dimensions(
        &mut self,
        element_tree: &JcTree,
        dimensions: &[SourceRange],
    ) -> Result<NodeId> {
        let element = self.ty(element_tree)?;
        let end = dimensions
            .last()
            .map(|r| r.end())
            .unwrap_or_else(|| self.end_of(element_tree));
        let ty = self.synthetic(
            NodeKind::ArrayType,
            SourceRange::from_bounds(element_tree.start, end),
        );
        self.ast.add_child(ty, Prop::ElementType, element);
        for range in dimensions {
            let dimension = self.synthetic(NodeKind::Dimension, *range);
            self.ast.add_child(ty, Prop::Dimensions, dimension);
        }
        Ok(ty)
    }

    /// Marks a node produced while recovering from erroneous input.
    pub(super) fn mark_recovered(&mut self, id: NodeId) {
        self.ast.add_flags(id, flags::RECOVERED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdt_bridge_javac::TreeFactory;

    #[test]
    fn test_name_chains() {
        let mut f = TreeFactory::new();
        let a = f.ident(0, "a");
        let select = f.at(
            1,
            3,
            JcKind::Select {
                selected: Box::new(a),
                name: "b".to_string(),
            },
        );
        assert!(is_name_chain(&select));

        let this = f.ident(0, "this");
        let this_field = f.at(
            4,
            6,
            JcKind::Select {
                selected: Box::new(this),
                name: "x".to_string(),
            },
        );
        assert!(!is_name_chain(&this_field));
        assert!(!is_super(&this_field));
    }
}
