use super::Converter;
use super::expressions::unparenthesized;
use super::fragments::{Grouped, group_declarations};
use crate::error::{ConversionError, Result};
use jdt_bridge_api::{NodeId, NodeKind, Prop, SourceRange};
use jdt_bridge_javac::{JcKind, JcTree};

impl Converter<'_> {
    pub(super) fn block(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::Block { stats, .. } = &tree.kind else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let id = self.alloc(tree, NodeKind::Block);
        self.statements_into(id, Prop::Statements, stats)?;
        Ok(id)
    }

    /// Converts a statement list, merging local variables declared together.
    pub(super) fn statements_into(&mut self, owner: NodeId, prop: Prop, stats: &[JcTree]) -> Result<()> {
        for item in group_declarations(stats) {
            let statement = match item {
                Grouped::Vars(group) => self.variable_declaration_statement(&group)?,
                Grouped::Single(tree) => self.statement(tree)?,
            };
            self.ast.add_child(owner, prop, statement);
        }
        Ok(())
    }

    pub(super) fn statement(&mut self, tree: &JcTree) -> Result<NodeId> {
        let id = match &tree.kind {
            JcKind::Block { .. } => return self.block(tree),
            JcKind::Skip => self.alloc(tree, NodeKind::EmptyStatement),
            JcKind::Exec { expr } => return self.expression_statement(tree, expr),
            JcKind::VarDef { .. } => return self.variable_declaration_statement(&[tree]),
            JcKind::ClassDef { .. } => {
                let declaration = self.type_declaration(tree)?;
                let id = self.alloc(tree, NodeKind::TypeDeclarationStatement);
                self.ast.add_child(id, Prop::Declaration, declaration);
                id
            }
            JcKind::If {
                cond,
                thenpart,
                elsepart,
            } => {
                let id = self.alloc(tree, NodeKind::IfStatement);
                let cond = self.expr(unparenthesized(cond))?;
                self.ast.add_child(id, Prop::Expression, cond);
                let then = self.statement(thenpart)?;
                self.ast.add_child(id, Prop::ThenStatement, then);
                if let Some(elsepart) = elsepart {
                    let otherwise = self.statement(elsepart)?;
                    self.ast.add_child(id, Prop::ElseStatement, otherwise);
                }
                id
            }
            JcKind::WhileLoop { cond, body } => {
                let id = self.alloc(tree, NodeKind::WhileStatement);
                let cond = self.expr(unparenthesized(cond))?;
                self.ast.add_child(id, Prop::Expression, cond);
                let body = self.statement(body)?;
                self.ast.add_child(id, Prop::Body, body);
                id
            }
            JcKind::DoLoop { body, cond } => {
                let id = self.alloc(tree, NodeKind::DoStatement);
                let body = self.statement(body)?;
                self.ast.add_child(id, Prop::Body, body);
                let cond = self.expr(unparenthesized(cond))?;
                self.ast.add_child(id, Prop::Expression, cond);
                id
            }
            JcKind::ForLoop {
                init,
                cond,
                step,
                body,
            } => {
                let id = self.alloc(tree, NodeKind::ForStatement);
                for item in group_declarations(init) {
                    let initializer = match item {
                        Grouped::Vars(group) => self.variable_declaration_expression(&group)?,
                        Grouped::Single(JcTree {
                            kind: JcKind::Exec { expr },
                            ..
                        }) => self.expr(expr)?,
                        Grouped::Single(other) => self.expr(other)?,
                    };
                    self.ast.add_child(id, Prop::Initializers, initializer);
                }
                if let Some(cond) = cond {
                    let cond = self.expr(cond)?;
                    self.ast.add_child(id, Prop::Expression, cond);
                }
                for update in step {
                    let update = match &update.kind {
                        JcKind::Exec { expr } => self.expr(expr)?,
                        _ => self.expr(update)?,
                    };
                    self.ast.add_child(id, Prop::Updaters, update);
                }
                let body = self.statement(body)?;
                self.ast.add_child(id, Prop::Body, body);
                id
            }
            JcKind::ForeachLoop { var, expr, body } => {
                let id = self.alloc(tree, NodeKind::EnhancedForStatement);
                let parameter = self.single_variable(var, 0)?;
                self.ast.add_child(id, Prop::Parameter, parameter);
                let expr = self.expr(expr)?;
                self.ast.add_child(id, Prop::Expression, expr);
                let body = self.statement(body)?;
                self.ast.add_child(id, Prop::Body, body);
                id
            }
            JcKind::Labelled { label, body } => {
                let id = self.alloc(tree, NodeKind::LabeledStatement);
                let label = self.simple_name(label, SourceRange::UNSET);
                self.ast.add_child(id, Prop::Label, label);
                let body = self.statement(body)?;
                self.ast.add_child(id, Prop::Body, body);
                id
            }
            JcKind::Break { label } | JcKind::Continue { label } => {
                let kind = if matches!(tree.kind, JcKind::Break { .. }) {
                    NodeKind::BreakStatement
                } else {
                    NodeKind::ContinueStatement
                };
                let id = self.alloc(tree, kind);
                if let Some(label) = label {
                    let label = self.simple_name(label, SourceRange::UNSET);
                    self.ast.add_child(id, Prop::Label, label);
                }
                id
            }
            JcKind::Yield { value } => {
                let id = self.alloc(tree, NodeKind::YieldStatement);
                let value = self.expr(value)?;
                self.ast.add_child(id, Prop::Expression, value);
                id
            }
            JcKind::Return { expr } => {
                let id = self.alloc(tree, NodeKind::ReturnStatement);
                if let Some(expr) = expr {
                    let expr = self.expr(expr)?;
                    self.ast.add_child(id, Prop::Expression, expr);
                }
                id
            }
            JcKind::Throw { expr } => {
                let id = self.alloc(tree, NodeKind::ThrowStatement);
                let expr = self.expr(expr)?;
                self.ast.add_child(id, Prop::Expression, expr);
                id
            }
            JcKind::Switch { selector, cases } => {
                let id = self.alloc(tree, NodeKind::SwitchStatement);
                let selector = self.expr(unparenthesized(selector))?;
                self.ast.add_child(id, Prop::Expression, selector);
                self.switch_body(id, cases)?;
                id
            }
            JcKind::Synchronized { lock, body } => {
                let id = self.alloc(tree, NodeKind::SynchronizedStatement);
                let lock = self.expr(unparenthesized(lock))?;
                self.ast.add_child(id, Prop::Expression, lock);
                let body = self.block(body)?;
                self.ast.add_child(id, Prop::Body, body);
                id
            }
            JcKind::Try {
                resources,
                body,
                catchers,
                finalizer,
            } => {
                let id = self.alloc(tree, NodeKind::TryStatement);
                for resource in resources {
                    let resource = match &resource.kind {
                        JcKind::VarDef { .. } => self.variable_declaration_expression(&[resource])?,
                        _ => self.expr(resource)?,
                    };
                    self.ast.add_child(id, Prop::Resources, resource);
                }
                let body = self.block(body)?;
                self.ast.add_child(id, Prop::Body, body);
                for catcher in catchers {
                    let JcKind::Catch { param, body } = &catcher.kind else {
                        return Err(ConversionError::unsupported(catcher.tag(), catcher.start));
                    };
                    let clause = self.alloc(catcher, NodeKind::CatchClause);
                    let exception = self.single_variable(param, 0)?;
                    self.ast.add_child(clause, Prop::Exception, exception);
                    let body = self.block(body)?;
                    self.ast.add_child(clause, Prop::Body, body);
                    self.ast.add_child(id, Prop::CatchClauses, clause);
                }
                if let Some(finalizer) = finalizer {
                    let finalizer = self.block(finalizer)?;
                    self.ast.add_child(id, Prop::Finally, finalizer);
                }
                id
            }
            JcKind::Assert { cond, detail } => {
                let id = self.alloc(tree, NodeKind::AssertStatement);
                let cond = self.expr(cond)?;
                self.ast.add_child(id, Prop::Expression, cond);
                if let Some(detail) = detail {
                    let message = self.expr(detail)?;
                    self.ast.add_child(id, Prop::Message, message);
                }
                id
            }
            JcKind::Erroneous { errs } => return self.erroneous_statement(tree, errs),
            _ => return Err(ConversionError::unsupported(tree.tag(), tree.start)),
        };
        Ok(id)
    }

    /// `this(...)` and `super(...)` calls are recognized here, on the wrapping
    /// statement, rather than as expressions.
    fn expression_statement(&mut self, tree: &JcTree, expr: &JcTree) -> Result<NodeId> {
        if let JcKind::Apply {
            typeargs,
            meth,
            args,
        } = &expr.kind
        {
            let kind = match &meth.kind {
                JcKind::Ident { name } if name == "this" => Some(NodeKind::ConstructorInvocation),
                JcKind::Ident { name } if name == "super" => {
                    Some(NodeKind::SuperConstructorInvocation)
                }
                JcKind::Select { name, .. } if name == "super" => {
                    Some(NodeKind::SuperConstructorInvocation)
                }
                _ => None,
            };
            if let Some(kind) = kind {
                let id = self.alloc(tree, kind);
                if let JcKind::Select { selected, .. } = &meth.kind {
                    let outer = self.expr(selected)?;
                    self.ast.add_child(id, Prop::Expression, outer);
                }
                self.type_arguments(id, typeargs)?;
                self.arguments(id, args)?;
                return Ok(id);
            }
        }
        let id = self.alloc(tree, NodeKind::ExpressionStatement);
        let expr = self.expr(expr)?;
        self.ast.add_child(id, Prop::Expression, expr);
        Ok(id)
    }

    /// Keeps a lone salvaged statement, wraps a lone expression, and turns
    /// anything else into an empty block.
    fn erroneous_statement(&mut self, tree: &JcTree, errs: &[JcTree]) -> Result<NodeId> {
        if let [only] = errs {
            let id = if only.is_expression() {
                let expr = self.expr(only)?;
                let id = self.alloc(tree, NodeKind::ExpressionStatement);
                self.ast.add_child(id, Prop::Expression, expr);
                id
            } else {
                self.statement(only)?
            };
            self.mark_recovered(id);
            return Ok(id);
        }
        tracing::warn!(
            "Erroneous statement with {} parts at offset {}",
            errs.len(),
            tree.start
        );
        Ok(self.placeholder(tree, NodeKind::Block))
    }

    /// Flattens foreign case groups into alternating `SwitchCase` labels and
    /// statements under `owner`.
    pub(super) fn switch_body(&mut self, owner: NodeId, cases: &[JcTree]) -> Result<()> {
        for case in cases {
            let JcKind::Case {
                labels,
                is_default,
                rule,
                stats,
            } = &case.kind
            else {
                return Err(ConversionError::unsupported(case.tag(), case.start));
            };
            let label_end = labels
                .iter()
                .map(|l| self.end_of(l))
                .max()
                .unwrap_or(case.start)
                .max(case.start);
            let arrow = if *rule { "->" } else { ":" };
            let end = self
                .find_token(arrow, label_end, self.end_of(case).max(label_end + 1))
                .map(|t| t.end)
                .unwrap_or_else(|| self.end_of(case));
            let id = self.alloc_at(
                case,
                NodeKind::SwitchCase {
                    switch_labeled_rule: *rule,
                    is_default: *is_default,
                },
                SourceRange::from_bounds(case.start, end),
            );
            for label in labels {
                let label = self.case_label(label)?;
                self.ast.add_child(id, Prop::Expressions, label);
            }
            self.ast.add_child(owner, Prop::Statements, id);
            self.statements_into(owner, Prop::Statements, stats)?;
        }
        Ok(())
    }

    fn case_label(&mut self, label: &JcTree) -> Result<NodeId> {
        match &label.kind {
            JcKind::BindingPattern { var } => {
                let pattern = self.alloc(label, NodeKind::TypePattern);
                let variable = self.single_variable(var, 0)?;
                self.ast.add_child(pattern, Prop::Parameter, variable);
                Ok(pattern)
            }
            JcKind::RecordPattern { .. } | JcKind::AnyPattern => {
                Err(ConversionError::unsupported(label.tag(), label.start))
            }
            _ => self.expr(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdt_bridge_api::{ApiLevel, flags};
    use jdt_bridge_javac::TreeFactory;

    const SOURCE: &str = "x; y;";

    fn exec(factory: &mut TreeFactory, at: i32, name: &str) -> JcTree {
        let ident = factory.ident(at, name);
        factory.at(at, at + 2, JcKind::Exec { expr: Box::new(ident) })
    }

    #[test]
    fn test_erroneous_statements_degrade_to_empty_block() {
        let mut factory = TreeFactory::new();
        let errs = vec![exec(&mut factory, 0, "x"), exec(&mut factory, 3, "y")];
        let tree = factory.at(0, 5, JcKind::Erroneous { errs });
        let ends = factory.finish();

        let mut converter = Converter::new(SOURCE, &ends, ApiLevel::latest());
        let id = converter.statement(&tree).unwrap();
        assert_eq!(converter.ast.kind(id), &NodeKind::Block);
        assert_eq!(converter.ast.list_len(id, Prop::Statements), 0);
        assert_ne!(converter.ast.flags(id) & flags::MALFORMED, 0);
    }

    #[test]
    fn test_single_erroneous_expression_survives() {
        let mut factory = TreeFactory::new();
        let ident = factory.ident(0, "x");
        let tree = factory.at(0, 1, JcKind::Erroneous { errs: vec![ident] });
        let ends = factory.finish();

        let mut converter = Converter::new(SOURCE, &ends, ApiLevel::latest());
        let id = converter.expr(&tree).unwrap();
        assert_eq!(converter.ast.identifier(id), Some("x"));
        assert_eq!(converter.ast.range(id), jdt_bridge_api::SourceRange::new(0, 1));
        assert_ne!(converter.ast.flags(id) & flags::RECOVERED, 0);
    }

    #[test]
    fn test_this_call_becomes_constructor_invocation() {
        let source = "this(a);";
        let mut factory = TreeFactory::new();
        let meth = factory.ident(0, "this");
        let arg = factory.ident(5, "a");
        let apply = factory.make(
            0,
            4,
            7,
            JcKind::Apply {
                typeargs: Vec::new(),
                meth: Box::new(meth),
                args: vec![arg],
            },
        );
        let tree = factory.at(0, 8, JcKind::Exec { expr: Box::new(apply) });
        let ends = factory.finish();

        let mut converter = Converter::new(source, &ends, ApiLevel::latest());
        let id = converter.statement(&tree).unwrap();
        assert_eq!(converter.ast.kind(id), &NodeKind::ConstructorInvocation);
        assert_eq!(converter.ast.list_len(id, Prop::Arguments), 1);
        assert_eq!(converter.ast.range(id), jdt_bridge_api::SourceRange::new(0, 8));
    }
}
