//! Variable declarations: grouping of sibling `VarDef`s that came from one
//! source declaration, fragments, single-variable declarations and modifiers.

use super::Converter;
use crate::error::{ConversionError, Result};
use crate::scanner::TokenKind;
use jdt_bridge_api::{ModifierKeyword, NodeId, NodeKind, Prop, SourceRange};
use jdt_bridge_javac::{JcKind, JcTree, Modifiers, flags as jflags};

/// One entry of a member or statement list after grouping.
pub(super) enum Grouped<'t> {
    /// `VarDef`s sharing one start offset, i.e. `int a, b;`.
    Vars(Vec<&'t JcTree>),
    Single(&'t JcTree),
}

fn is_var_def(tree: &JcTree) -> bool {
    matches!(tree.kind, JcKind::VarDef { .. })
}

/// First phase of fragment merging: consecutive `VarDef`s with the same
/// known start offset land in one group.
pub(super) fn group_declarations<'t>(trees: impl IntoIterator<Item = &'t JcTree>) -> Vec<Grouped<'t>> {
    let mut out: Vec<Grouped<'t>> = Vec::new();
    for tree in trees {
        if is_var_def(tree) {
            if let Some(Grouped::Vars(group)) = out.last_mut() {
                if tree.start >= 0 && group[0].start == tree.start {
                    group.push(tree);
                    continue;
                }
            }
            out.push(Grouped::Vars(vec![tree]));
        } else {
            out.push(Grouped::Single(tree));
        }
    }
    out
}

fn modifier_keyword(text: &str) -> Option<ModifierKeyword> {
    ModifierKeyword::ALL
        .into_iter()
        .find(|keyword| keyword.as_str() == text)
}

impl Converter<'_> {
    /// Adds annotation and keyword modifiers of `mods` to `owner`. Flags in
    /// `implied` are not spelled in the source and produce no node. Keyword
    /// nodes are unpositioned until reconciliation.
    pub(super) fn modifiers(&mut self, owner: NodeId, mods: &Modifiers, implied: u64) -> Result<()> {
        for annotation in &mods.annotations {
            let annotation = self.annotation(annotation)?;
            self.ast.add_child(owner, Prop::Modifiers, annotation);
        }
        let spelled = mods.flags & !implied;
        for (flag, text) in jflags::KEYWORDS {
            if spelled & flag == 0 {
                continue;
            }
            let Some(keyword) = modifier_keyword(text) else {
                continue;
            };
            let modifier = self.synthetic(NodeKind::Modifier { keyword }, SourceRange::UNSET);
            self.ast.add_child(owner, Prop::Modifiers, modifier);
        }
        Ok(())
    }

    /// End of the `dims` bracket pairs following a declarator name.
    fn dimensions_end(&self, after: i32, dims: u32, limit: i32) -> i32 {
        if dims == 0 {
            return after;
        }
        self.tokens(after, limit)
            .filter(|t| t.kind == TokenKind::RBracket)
            .nth(dims as usize - 1)
            .map(|t| t.end)
            .unwrap_or(after)
    }

    /// `name [dims] [= init]` part of one `VarDef`.
    fn fragment(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::VarDef {
            name, dims, init, ..
        } = &tree.kind
        else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let name_node = self.name_at(name, tree.pos);
        let name_end = tree.pos + name.len() as i32;
        let initializer = match init {
            Some(init) => Some(self.expr(init)?),
            None => None,
        };
        let end = match init {
            Some(init) => self.end_of(init),
            None => self.dimensions_end(name_end, *dims, self.end_of(tree)),
        };
        let fragment = self.alloc_at(
            tree,
            NodeKind::VariableDeclarationFragment {
                extra_dimensions: *dims,
            },
            SourceRange::from_bounds(tree.pos, end),
        );
        self.ast.add_child(fragment, Prop::Name, name_node);
        self.ast.add_opt(fragment, Prop::Initializer, initializer);
        Ok(fragment)
    }

    /// Second phase of fragment merging: one declaration node of `kind`
    /// carrying the modifiers and type of the first `VarDef` and a fragment
    /// per `VarDef`. Later `VarDef`s repeat the same modifiers and type trees,
    /// which are skipped.
    fn merged_declaration(&mut self, group: &[&JcTree], kind: NodeKind, end: i32) -> Result<NodeId> {
        let first = group[0];
        let JcKind::VarDef { mods, vartype, .. } = &first.kind else {
            return Err(ConversionError::unsupported(first.tag(), first.start));
        };
        let decl = self.alloc_at(first, kind, SourceRange::from_bounds(first.start, end));
        self.modifiers(decl, mods, 0)?;
        if let Some(vartype) = vartype {
            let ty = self.ty(vartype)?;
            self.ast.add_child(decl, Prop::Type, ty);
        }
        for var in group {
            let fragment = self.fragment(var)?;
            self.ast.add_child(decl, Prop::Fragments, fragment);
        }
        Ok(decl)
    }

    fn group_end(&self, group: &[&JcTree]) -> i32 {
        group
            .last()
            .map(|last| self.end_of(last))
            .unwrap_or(-1)
    }

    pub(super) fn field_declaration(&mut self, group: &[&JcTree]) -> Result<NodeId> {
        let end = self.group_end(group);
        self.merged_declaration(group, NodeKind::FieldDeclaration, end)
    }

    pub(super) fn variable_declaration_statement(&mut self, group: &[&JcTree]) -> Result<NodeId> {
        let end = self.group_end(group);
        self.merged_declaration(group, NodeKind::VariableDeclarationStatement, end)
    }

    /// Declaration used as an expression (`for` initializers, resources). The
    /// foreign tree counts the terminating `;` in the last end, which is cut.
    pub(super) fn variable_declaration_expression(&mut self, group: &[&JcTree]) -> Result<NodeId> {
        let mut end = self.group_end(group);
        if end > 0 && self.source.as_bytes().get(end as usize - 1) == Some(&b';') {
            end = self.last_code_end(group[0].start, end - 1);
        }
        self.merged_declaration(group, NodeKind::VariableDeclarationExpression, end)
    }

    /// End of the last token in `[from, to)`.
    fn last_code_end(&self, from: i32, to: i32) -> i32 {
        self.tokens(from, to).last().map(|t| t.end).unwrap_or(to)
    }

    /// A parameter-like declaration: method and lambda parameters, catch
    /// parameters, record components, enhanced-for and pattern variables.
    pub(super) fn single_variable(&mut self, tree: &JcTree, implied: u64) -> Result<NodeId> {
        let JcKind::VarDef {
            mods,
            name,
            vartype,
            dims,
            init,
        } = &tree.kind
        else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let decl = self.alloc(
            tree,
            NodeKind::SingleVariableDeclaration {
                varargs: mods.has(jflags::VARARGS),
                extra_dimensions: *dims,
            },
        );
        self.modifiers(decl, mods, implied)?;
        if let Some(vartype) = vartype {
            let ty = self.ty(vartype)?;
            self.ast.add_child(decl, Prop::Type, ty);
        }
        let name = self.name_at(name, tree.pos);
        self.ast.add_child(decl, Prop::Name, name);
        if let Some(init) = init {
            let init = self.expr(init)?;
            self.ast.add_child(decl, Prop::Initializer, init);
        }
        Ok(decl)
    }

    /// Implicitly typed lambda parameter.
    pub(super) fn lambda_fragment(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::VarDef { name, .. } = &tree.kind else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let name = self.name_at(name, tree.pos);
        let fragment = self.alloc(
            tree,
            NodeKind::VariableDeclarationFragment {
                extra_dimensions: 0,
            },
        );
        self.ast.add_child(fragment, Prop::Name, name);
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdt_bridge_javac::TreeFactory;

    fn var(f: &mut TreeFactory, start: i32, name: &str) -> JcTree {
        f.at(
            start,
            start + 5,
            JcKind::VarDef {
                mods: Modifiers::empty(),
                name: name.to_string(),
                vartype: None,
                dims: 0,
                init: None,
            },
        )
    }

    #[test]
    fn test_grouping_by_start_offset() {
        let mut f = TreeFactory::new();
        let a = var(&mut f, 0, "a");
        let b = var(&mut f, 0, "b");
        let c = var(&mut f, 10, "c");
        let skip = f.at(20, 21, JcKind::Skip);
        let trees = [a, b, c, skip];
        let grouped = group_declarations(trees.iter());
        let shapes: Vec<usize> = grouped
            .iter()
            .map(|g| match g {
                Grouped::Vars(vars) => vars.len(),
                Grouped::Single(_) => 0,
            })
            .collect();
        assert_eq!(shapes, vec![2, 1, 0]);
    }

    #[test]
    fn test_modifier_keyword_spelling() {
        assert_eq!(modifier_keyword("non-sealed"), Some(ModifierKeyword::NonSealed));
        assert_eq!(modifier_keyword("class"), None);
    }
}
