//! Lock-step structural and positional comparison.

use super::{OracleDivergence, tolerated};
use jdt_bridge_api::{Ast, CompilationUnit, LegacyView, NodeId, Prop, flags, render};

type CompareResult = std::result::Result<(), OracleDivergence>;

/// Compares two trees, failing on the first divergence outside the tolerated
/// shapes. A length off by exactly one is only logged.
pub fn compare(left: &Ast, l: NodeId, right: &Ast, r: NodeId) -> CompareResult {
    Comparator::new(left, right).compare(l, r)
}

/// Compares two converted units. Legacy mode applies when either unit was
/// built for a pre-generics API level.
pub fn compare_units(left: &CompilationUnit, right: &CompilationUnit) -> CompareResult {
    Comparator::new(&left.ast, &right.ast)
        .legacy(left.api_level.is_legacy() || right.api_level.is_legacy())
        .compare(left.root, right.root)
}

pub struct Comparator<'a> {
    left: &'a Ast,
    right: &'a Ast,
    legacy: bool,
}

impl<'a> Comparator<'a> {
    pub fn new(left: &'a Ast, right: &'a Ast) -> Self {
        Self {
            left,
            right,
            legacy: false,
        }
    }

    /// In legacy mode modifiers compare as flag words and supertypes as names.
    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    pub fn compare(&self, l: NodeId, r: NodeId) -> CompareResult {
        let mut path = vec![self.left.kind(l).name().to_string()];
        self.node(l, r, &mut path)
    }

    fn node(&self, l: NodeId, r: NodeId, path: &mut Vec<String>) -> CompareResult {
        let (lk, rk) = (self.left.kind(l), self.right.kind(r));
        if lk != rk {
            if tolerated(self.left, l, self.right, r) {
                return self.standard(l, r, path);
            }
            if lk.same_variant(rk) {
                return Err(self.fail(
                    path,
                    format!(
                        "attributes differ: `{}` vs `{}`",
                        render(self.left, l),
                        render(self.right, r)
                    ),
                ));
            }
            return Err(self.fail(path, format!("kind differs: {} vs {}", lk.name(), rk.name())));
        }
        self.standard(l, r, path)?;

        let mut skipped: Vec<Prop> = Vec::new();
        if self.legacy {
            skipped = self.legacy_shape(l, r, path)?;
        }

        for prop in self.props(l, r) {
            if skipped.contains(&prop) {
                continue;
            }
            let lc: Vec<NodeId> = self.left.list(l, prop).collect();
            let rc: Vec<NodeId> = self.right.list(r, prop).collect();
            if lc.len() != rc.len() {
                return Err(self.fail(
                    path,
                    format!("{prop:?} sizes differ: {} vs {}", lc.len(), rc.len()),
                ));
            }
            let indexed = lc.len() > 1;
            for (i, (lchild, rchild)) in lc.into_iter().zip(rc).enumerate() {
                path.push(if indexed {
                    format!("{prop:?}[{i}]")
                } else {
                    format!("{prop:?}")
                });
                self.node(lchild, rchild, path)?;
                path.pop();
            }
        }
        Ok(())
    }

    /// Start, length and flag word.
    fn standard(&self, l: NodeId, r: NodeId, path: &[String]) -> CompareResult {
        let (lr, rr) = (self.left.range(l), self.right.range(r));
        if lr.start != rr.start {
            return Err(self.fail(
                path,
                format!("start position differs: {} vs {}", lr.start, rr.start),
            ));
        }
        if lr.length != rr.length {
            if (lr.length - rr.length).abs() == 1 {
                tracing::warn!(
                    "{}: length off by one ({} vs {})",
                    path.join("/"),
                    lr.length,
                    rr.length
                );
            } else {
                return Err(self.fail(
                    path,
                    format!("length differs: {} vs {}", lr.length, rr.length),
                ));
            }
        }
        let diff = (self.left.flags(l) ^ self.right.flags(r)) & !flags::BOOKKEEPING;
        if diff != 0 {
            return Err(self.fail(path, format!("flags differ: {diff:#x}")));
        }
        Ok(())
    }

    /// Checks the legacy-visible shape and returns the props it replaces.
    fn legacy_shape(&self, l: NodeId, r: NodeId, path: &[String]) -> std::result::Result<Vec<Prop>, OracleDivergence> {
        let kind = self.left.kind(l);
        let mut replaced = Vec::new();
        let (lv, rv) = (LegacyView::new(self.left), LegacyView::new(self.right));
        if kind.is_body_declaration() {
            let (lf, rf) = (lv.modifier_flags(l), rv.modifier_flags(r));
            if lf != rf {
                return Err(self.fail(path, format!("modifier flags differ: {lf:#x} vs {rf:#x}")));
            }
            replaced.push(Prop::Modifiers);
        }
        if kind.is_type_declaration() {
            if lv.superclass_name(l) != rv.superclass_name(r) {
                return Err(self.fail(path, "superclass names differ"));
            }
            if lv.super_interface_names(l) != rv.super_interface_names(r) {
                return Err(self.fail(path, "super interface names differ"));
            }
            replaced.extend([Prop::SuperclassType, Prop::SuperInterfaceTypes]);
        }
        Ok(replaced)
    }

    fn props(&self, l: NodeId, r: NodeId) -> Vec<Prop> {
        let mut props = self.left.props(l);
        for prop in self.right.props(r) {
            if !props.contains(&prop) {
                props.push(prop);
            }
        }
        props
    }

    fn fail(&self, path: &[String], message: impl Into<String>) -> OracleDivergence {
        OracleDivergence::new(path.join("/"), message)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use jdt_bridge_api::{ModifierKeyword, NodeKind, SourceRange};

    fn method(ast: &mut Ast, start: i32, length: i32) -> NodeId {
        let method = ast.alloc(
            NodeKind::MethodDeclaration {
                is_constructor: false,
                extra_dimensions: 0,
            },
            SourceRange::new(start, length),
        );
        let name = name(ast, "m", start + 5);
        ast.add_child(method, Prop::Name, name);
        method
    }

    #[test]
    fn test_bookkeeping_flags_are_masked() {
        let mut left = Ast::new();
        let l = method(&mut left, 0, 10);
        let mut right = Ast::new();
        let r = method(&mut right, 0, 10);
        right.add_flags(r, flags::MALFORMED | flags::RECOVERED);
        assert!(compare(&left, l, &right, r).is_ok());
    }

    #[test]
    fn test_off_by_one_length_is_a_warning() {
        let mut left = Ast::new();
        let l = method(&mut left, 0, 10);
        let mut right = Ast::new();
        let r = method(&mut right, 0, 11);
        assert!(compare(&left, l, &right, r).is_ok());

        let mut far = Ast::new();
        let f = method(&mut far, 0, 12);
        let err = compare(&left, l, &far, f).unwrap_err();
        assert!(err.message.contains("length"));
    }

    #[test]
    fn test_list_size_mismatch_always_fails() {
        let mut left = Ast::new();
        let l = method(&mut left, 0, 10);
        let mut right = Ast::new();
        let r = method(&mut right, 0, 10);
        let param = right.alloc(
            NodeKind::SingleVariableDeclaration {
                varargs: false,
                extra_dimensions: 0,
            },
            SourceRange::new(7, 1),
        );
        right.add_child(r, Prop::Parameters, param);
        right.add_flags(r, flags::ORIGINAL);
        let err = compare(&left, l, &right, r).unwrap_err();
        assert_eq!(err.path, "MethodDeclaration");
        assert!(err.message.contains("Parameters"));
    }

    #[test]
    fn test_divergence_path_names_child() {
        let mut left = Ast::new();
        let l = method(&mut left, 0, 10);
        let mut right = Ast::new();
        let r = right.alloc(
            NodeKind::MethodDeclaration {
                is_constructor: false,
                extra_dimensions: 0,
            },
            SourceRange::new(0, 10),
        );
        let other = name(&mut right, "n", 5);
        right.add_child(r, Prop::Name, other);
        let err = compare(&left, l, &right, r).unwrap_err();
        assert_eq!(err.path, "MethodDeclaration/Name");
        assert_eq!(err.to_string(), "MethodDeclaration/Name: attributes differ: `m` vs `n`");
    }

    #[test]
    fn test_legacy_mode_compares_modifier_words() {
        let mut left = Ast::new();
        let l = method(&mut left, 0, 10);
        let public = left.alloc(
            NodeKind::Modifier {
                keyword: ModifierKeyword::Public,
            },
            SourceRange::new(0, 6),
        );
        left.add_child(l, Prop::Modifiers, public);

        let mut right = Ast::new();
        let r = method(&mut right, 0, 10);
        let public = right.alloc(
            NodeKind::Modifier {
                keyword: ModifierKeyword::Public,
            },
            SourceRange::new(1, 6),
        );
        right.add_child(r, Prop::Modifiers, public);

        assert!(compare(&left, l, &right, r).is_err());
        assert!(Comparator::new(&left, &right).legacy(true).compare(l, r).is_ok());
    }

    #[test]
    fn test_string_concatenation_is_tolerated() {
        let mut left = Ast::new();
        let l = string(&mut left, "\"ab\"", 0);
        left.set_range(l, SourceRange::new(0, 9));
        let mut right = Ast::new();
        let r = concatenation(&mut right);
        assert!(compare(&left, l, &right, r).is_ok());
    }
}
