//! Pre-generics view of the unified tree.
//!
//! The converter always builds the modern shape. Consumers that still expect the
//! legacy representation (a modifier flag word, supertypes as plain names) read
//! it through [`LegacyView`] instead.

use crate::models::{Ast, NodeId, NodeKind, Prop};

pub struct LegacyView<'a> {
    ast: &'a Ast,
}

impl<'a> LegacyView<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }

    /// Flag word folded from the declaration's modifier keywords. Annotations are ignored.
    pub fn modifier_flags(&self, decl: NodeId) -> u32 {
        self.ast
            .list(decl, Prop::Modifiers)
            .filter_map(|m| match self.ast.kind(m) {
                NodeKind::Modifier { keyword } => Some(keyword.flag()),
                _ => None,
            })
            .fold(0, |acc, flag| acc | flag)
    }

    pub fn superclass_name(&self, type_decl: NodeId) -> Option<String> {
        let ty = self.ast.child(type_decl, Prop::SuperclassType)?;
        type_name(self.ast, ty)
    }

    pub fn super_interface_names(&self, type_decl: NodeId) -> Vec<String> {
        self.ast
            .list(type_decl, Prop::SuperInterfaceTypes)
            .filter_map(|ty| type_name(self.ast, ty))
            .collect()
    }

    /// Return type of a method; constructors report none.
    pub fn return_type(&self, method: NodeId) -> Option<NodeId> {
        match self.ast.kind(method) {
            NodeKind::MethodDeclaration {
                is_constructor: false,
                ..
            } => self.ast.child(method, Prop::ReturnType),
            _ => None,
        }
    }
}

/// Erased dotted name of a class type.
pub fn type_name(ast: &Ast, ty: NodeId) -> Option<String> {
    match ast.kind(ty) {
        NodeKind::SimpleType => ast.name_text(ast.child(ty, Prop::Name)?),
        NodeKind::QualifiedType => {
            let qualifier = type_name(ast, ast.child(ty, Prop::Qualifier)?)?;
            let name = ast.identifier(ast.child(ty, Prop::Name)?)?;
            Some(format!("{qualifier}.{name}"))
        }
        NodeKind::ParameterizedType => type_name(ast, ast.child(ty, Prop::Type)?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModifierKeyword, SourceRange};

    #[test]
    fn test_modifier_flags_fold_keywords() {
        let mut ast = Ast::new();
        let decl = ast.alloc(NodeKind::FieldDeclaration, SourceRange::UNSET);
        for keyword in [ModifierKeyword::Public, ModifierKeyword::Static, ModifierKeyword::Final] {
            let m = ast.alloc(NodeKind::Modifier { keyword }, SourceRange::UNSET);
            ast.add_child(decl, Prop::Modifiers, m);
        }
        let annotation = ast.alloc(NodeKind::MarkerAnnotation, SourceRange::UNSET);
        ast.add_child(decl, Prop::Modifiers, annotation);

        let view = LegacyView::new(&ast);
        assert_eq!(view.modifier_flags(decl), 0x0001 | 0x0008 | 0x0010);
    }
}
