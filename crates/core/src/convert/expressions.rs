use super::Converter;
use super::names::{is_name_chain, is_super};
use crate::error::{ConversionError, Result};
use crate::scanner::TokenKind;
use jdt_bridge_api::{
    AssignmentOperator, InfixOperator, NodeId, NodeKind, PostfixOperator, PrefixOperator, Prop,
    SourceRange,
};
use jdt_bridge_javac::{JcKind, JcTree, ReferenceMode, Tag};

/// Binary operator tag to infix operator.
pub fn infix_operator(tag: Tag) -> Option<InfixOperator> {
    Some(match tag {
        Tag::Or => InfixOperator::ConditionalOr,
        Tag::And => InfixOperator::ConditionalAnd,
        Tag::BitOr => InfixOperator::Or,
        Tag::BitXor => InfixOperator::Xor,
        Tag::BitAnd => InfixOperator::And,
        Tag::Eq => InfixOperator::Equals,
        Tag::Ne => InfixOperator::NotEquals,
        Tag::Lt => InfixOperator::Less,
        Tag::Gt => InfixOperator::Greater,
        Tag::Le => InfixOperator::LessEquals,
        Tag::Ge => InfixOperator::GreaterEquals,
        Tag::Sl => InfixOperator::LeftShift,
        Tag::Sr => InfixOperator::RightShiftSigned,
        Tag::Usr => InfixOperator::RightShiftUnsigned,
        Tag::Plus => InfixOperator::Plus,
        Tag::Minus => InfixOperator::Minus,
        Tag::Mul => InfixOperator::Times,
        Tag::Div => InfixOperator::Divide,
        Tag::Mod => InfixOperator::Remainder,
        _ => return None,
    })
}

fn prefix_operator(tag: Tag) -> Option<PrefixOperator> {
    Some(match tag {
        Tag::Pos => PrefixOperator::Plus,
        Tag::Neg => PrefixOperator::Minus,
        Tag::Not => PrefixOperator::Not,
        Tag::Compl => PrefixOperator::Complement,
        Tag::PreInc => PrefixOperator::Increment,
        Tag::PreDec => PrefixOperator::Decrement,
        _ => return None,
    })
}

fn postfix_operator(tag: Tag) -> Option<PostfixOperator> {
    match tag {
        Tag::PostInc => Some(PostfixOperator::Increment),
        Tag::PostDec => Some(PostfixOperator::Decrement),
        _ => None,
    }
}

fn assignment_operator(tag: Tag) -> Option<AssignmentOperator> {
    Some(match tag {
        Tag::PlusAsg => AssignmentOperator::PlusAssign,
        Tag::MinusAsg => AssignmentOperator::MinusAssign,
        Tag::MulAsg => AssignmentOperator::TimesAssign,
        Tag::DivAsg => AssignmentOperator::DivideAssign,
        Tag::ModAsg => AssignmentOperator::RemainderAssign,
        Tag::BitAndAsg => AssignmentOperator::BitAndAssign,
        Tag::BitOrAsg => AssignmentOperator::BitOrAssign,
        Tag::BitXorAsg => AssignmentOperator::BitXorAssign,
        Tag::SlAsg => AssignmentOperator::LeftShiftAssign,
        Tag::SrAsg => AssignmentOperator::RightShiftSignedAssign,
        Tag::UsrAsg => AssignmentOperator::RightShiftUnsignedAssign,
        _ => return None,
    })
}

/// Strips the syntactic parentheses javac keeps around conditions.
pub(super) fn unparenthesized(tree: &JcTree) -> &JcTree {
    match &tree.kind {
        JcKind::Parens { expr } => expr,
        _ => tree,
    }
}

fn is_type_tree(tree: &JcTree) -> bool {
    matches!(
        tree.kind,
        JcKind::TypeIdent { .. }
            | JcKind::TypeArray { .. }
            | JcKind::TypeApply { .. }
            | JcKind::AnnotatedType { .. }
            | JcKind::TypeUnion { .. }
            | JcKind::TypeIntersection { .. }
            | JcKind::Wildcard { .. }
    )
}

impl Converter<'_> {
    pub(super) fn expr(&mut self, tree: &JcTree) -> Result<NodeId> {
        match &tree.kind {
            JcKind::Ident { name } if name == "this" => {
                Ok(self.alloc(tree, NodeKind::ThisExpression))
            }
            JcKind::Ident { .. } => self.name(tree),
            JcKind::Literal { typetag, value } => Ok(self.literal(tree, *typetag, value)),
            JcKind::Parens { expr } => {
                let inner = self.expr(expr)?;
                let id = self.alloc(tree, NodeKind::ParenthesizedExpression);
                self.ast.add_child(id, Prop::Expression, inner);
                Ok(id)
            }
            JcKind::Select { selected, name } => self.select(tree, selected, name),
            JcKind::Apply {
                typeargs,
                meth,
                args,
            } => self.invocation(tree, typeargs, meth, args),
            JcKind::NewClass {
                encl,
                typeargs,
                clazz,
                args,
                def,
            } => {
                let id = self.alloc(tree, NodeKind::ClassInstanceCreation);
                if let Some(encl) = encl {
                    let encl = self.expr(encl)?;
                    self.ast.add_child(id, Prop::Expression, encl);
                }
                self.type_arguments(id, typeargs)?;
                let ty = self.ty(clazz)?;
                self.ast.add_child(id, Prop::Type, ty);
                self.arguments(id, args)?;
                if let Some(def) = def {
                    let body = self.anonymous_class(def)?;
                    self.ast.add_child(id, Prop::AnonymousClassDeclaration, body);
                }
                Ok(id)
            }
            JcKind::NewArray {
                elemtype,
                dims,
                extra_dims,
                elems,
            } => match elemtype {
                None => self.array_initializer(tree, elems.as_deref().unwrap_or(&[])),
                Some(elemtype) => {
                    self.array_creation(tree, elemtype, dims, *extra_dims, elems.as_deref())
                }
            },
            JcKind::Lambda {
                params,
                body,
                parenthesized,
            } => {
                let id = self.alloc(
                    tree,
                    NodeKind::LambdaExpression {
                        parentheses: *parenthesized,
                    },
                );
                for param in params {
                    let implicit = matches!(&param.kind, JcKind::VarDef { vartype: None, .. });
                    let param = if implicit {
                        self.lambda_fragment(param)?
                    } else {
                        self.single_variable(param, 0)?
                    };
                    self.ast.add_child(id, Prop::Parameters, param);
                }
                let body = match &body.kind {
                    JcKind::Block { .. } => self.block(body)?,
                    _ => self.expr(body)?,
                };
                self.ast.add_child(id, Prop::Body, body);
                Ok(id)
            }
            JcKind::Assign { lhs, rhs } => {
                self.assignment(tree, AssignmentOperator::Assign, lhs, rhs)
            }
            JcKind::AssignOp { op, lhs, rhs } => {
                let operator = assignment_operator(*op)
                    .ok_or_else(|| ConversionError::unsupported(op, tree.start))?;
                self.assignment(tree, operator, lhs, rhs)
            }
            JcKind::Unary { op, arg } => {
                let operand = self.expr(arg)?;
                let id = if let Some(operator) = prefix_operator(*op) {
                    self.alloc(tree, NodeKind::PrefixExpression { operator })
                } else if let Some(operator) = postfix_operator(*op) {
                    self.alloc(tree, NodeKind::PostfixExpression { operator })
                } else {
                    return Err(ConversionError::unsupported(op, tree.start));
                };
                self.ast.add_child(id, Prop::Operand, operand);
                Ok(id)
            }
            JcKind::Binary { op, .. } => self.infix(tree, *op),
            JcKind::Conditional {
                cond,
                truepart,
                falsepart,
            } => {
                let cond = self.expr(cond)?;
                let then = self.expr(truepart)?;
                let otherwise = self.expr(falsepart)?;
                let id = self.alloc(tree, NodeKind::ConditionalExpression);
                self.ast.add_child(id, Prop::Expression, cond);
                self.ast.add_child(id, Prop::ThenExpression, then);
                self.ast.add_child(id, Prop::ElseExpression, otherwise);
                Ok(id)
            }
            JcKind::TypeCast { clazz, expr } => {
                let ty = self.ty(clazz)?;
                let operand = self.expr(expr)?;
                let id = self.alloc(tree, NodeKind::CastExpression);
                self.ast.add_child(id, Prop::Type, ty);
                self.ast.add_child(id, Prop::Expression, operand);
                Ok(id)
            }
            JcKind::InstanceOf { expr, pattern } => self.instance_of(tree, expr, pattern),
            JcKind::Indexed { indexed, index } => {
                let array = self.expr(indexed)?;
                let index = self.expr(index)?;
                let id = self.alloc(tree, NodeKind::ArrayAccess);
                self.ast.add_child(id, Prop::Array, array);
                self.ast.add_child(id, Prop::Index, index);
                Ok(id)
            }
            JcKind::Reference {
                mode,
                name,
                expr,
                typeargs,
            } => self.method_reference(tree, *mode, name, expr, typeargs),
            JcKind::SwitchExpression { selector, cases } => {
                let id = self.alloc(tree, NodeKind::SwitchExpression);
                let selector = self.expr(unparenthesized(selector))?;
                self.ast.add_child(id, Prop::Expression, selector);
                self.switch_body(id, cases)?;
                Ok(id)
            }
            JcKind::Annotation { .. } => self.annotation(tree),
            JcKind::Erroneous { errs } => self.erroneous_expression(tree, errs),
            JcKind::TypeIdent { .. }
            | JcKind::TypeArray { .. }
            | JcKind::TypeApply { .. }
            | JcKind::AnnotatedType { .. } => {
                tracing::warn!("Type in expression position at offset {}", tree.start);
                Ok(self.placeholder(tree, NodeKind::ParenthesizedExpression))
            }
            _ => Err(ConversionError::unsupported(tree.tag(), tree.start)),
        }
    }

    /// One salvaged expression survives as itself; anything else becomes an
    /// empty parenthesized placeholder.
    fn erroneous_expression(&mut self, tree: &JcTree, errs: &[JcTree]) -> Result<NodeId> {
        if let [only] = errs {
            let inner = match &only.kind {
                JcKind::Exec { expr } => Some(&**expr),
                _ if only.is_expression() => Some(only),
                _ => None,
            };
            if let Some(inner) = inner {
                let id = self.expr(inner)?;
                self.mark_recovered(id);
                return Ok(id);
            }
        }
        tracing::warn!(
            "Erroneous expression with {} parts at offset {}",
            errs.len(),
            tree.start
        );
        Ok(self.placeholder(tree, NodeKind::ParenthesizedExpression))
    }

    pub(super) fn arguments(&mut self, owner: NodeId, args: &[JcTree]) -> Result<()> {
        for arg in args {
            let arg = self.expr(arg)?;
            self.ast.add_child(owner, Prop::Arguments, arg);
        }
        Ok(())
    }

    pub(super) fn type_arguments(&mut self, owner: NodeId, typeargs: &[JcTree]) -> Result<()> {
        for arg in typeargs {
            let arg = self.ty(arg)?;
            self.ast.add_child(owner, Prop::TypeArguments, arg);
        }
        Ok(())
    }

    fn select(&mut self, tree: &JcTree, selected: &JcTree, name: &str) -> Result<NodeId> {
        let end = self.end_of(tree);
        match name {
            "class" => {
                let ty = self.ty(selected)?;
                let id = self.alloc(tree, NodeKind::TypeLiteral);
                self.ast.add_child(id, Prop::Type, ty);
                return Ok(id);
            }
            "this" => {
                let qualifier = self.name(selected)?;
                let id = self.alloc(tree, NodeKind::ThisExpression);
                self.ast.add_child(id, Prop::Qualifier, qualifier);
                return Ok(id);
            }
            _ => {}
        }
        if is_super(selected) {
            // super.f or Outer.super.f
            let id = self.alloc(tree, NodeKind::SuperFieldAccess);
            if let JcKind::Select { selected: outer, .. } = &selected.kind {
                let qualifier = self.name(outer)?;
                self.ast.add_child(id, Prop::Qualifier, qualifier);
            }
            let name = self.name_ending_at(name, end);
            self.ast.add_child(id, Prop::Name, name);
            return Ok(id);
        }
        if is_name_chain(tree) {
            return self.name(tree);
        }
        let receiver = self.expr(selected)?;
        let id = self.alloc(tree, NodeKind::FieldAccess);
        self.ast.add_child(id, Prop::Expression, receiver);
        let name = self.name_ending_at(name, end);
        self.ast.add_child(id, Prop::Name, name);
        Ok(id)
    }

    fn invocation(
        &mut self,
        tree: &JcTree,
        typeargs: &[JcTree],
        meth: &JcTree,
        args: &[JcTree],
    ) -> Result<NodeId> {
        match &meth.kind {
            JcKind::Select { selected, name } if is_super(selected) => {
                let id = self.alloc(tree, NodeKind::SuperMethodInvocation);
                if let JcKind::Select { selected: outer, .. } = &selected.kind {
                    let qualifier = self.name(outer)?;
                    self.ast.add_child(id, Prop::Qualifier, qualifier);
                }
                self.type_arguments(id, typeargs)?;
                let end = self.end_of(meth);
                let name = self.name_ending_at(name, end);
                self.ast.add_child(id, Prop::Name, name);
                self.arguments(id, args)?;
                Ok(id)
            }
            JcKind::Select { selected, name } => {
                let receiver = self.expr(selected)?;
                let id = self.alloc(tree, NodeKind::MethodInvocation);
                self.ast.add_child(id, Prop::Expression, receiver);
                self.type_arguments(id, typeargs)?;
                let end = self.end_of(meth);
                let name = self.name_ending_at(name, end);
                self.ast.add_child(id, Prop::Name, name);
                self.arguments(id, args)?;
                Ok(id)
            }
            JcKind::Ident { name } => {
                let id = self.alloc(tree, NodeKind::MethodInvocation);
                self.type_arguments(id, typeargs)?;
                let range = self.range_of(meth);
                let name = self.simple_name(name, range);
                self.ast.add_child(id, Prop::Name, name);
                self.arguments(id, args)?;
                Ok(id)
            }
            _ => Err(ConversionError::unsupported(meth.tag(), meth.start)),
        }
    }

    fn assignment(
        &mut self,
        tree: &JcTree,
        operator: AssignmentOperator,
        lhs: &JcTree,
        rhs: &JcTree,
    ) -> Result<NodeId> {
        let left = self.expr(lhs)?;
        let right = self.expr(rhs)?;
        let id = self.alloc(tree, NodeKind::Assignment { operator });
        self.ast.add_child(id, Prop::LeftHandSide, left);
        self.ast.add_child(id, Prop::RightHandSide, right);
        Ok(id)
    }

    /// Left-deep chains of one operator become a single infix expression with
    /// extended operands, `a + b + c` as `Infix(a, b, [c])`.
    fn infix(&mut self, tree: &JcTree, op: Tag) -> Result<NodeId> {
        let mut operands: Vec<&JcTree> = Vec::new();
        let mut current = tree;
        while let JcKind::Binary {
            op: current_op,
            lhs,
            rhs,
        } = &current.kind
        {
            if *current_op != op {
                break;
            }
            operands.push(rhs);
            current = lhs;
        }
        operands.push(current);
        operands.reverse();

        let operator = infix_operator(op);
        if operator.is_none() {
            tracing::error!("No infix operator for {:?} at offset {}", op, tree.start);
        }
        let id = self.alloc(tree, NodeKind::InfixExpression { operator });
        for (i, operand) in operands.into_iter().enumerate() {
            let prop = match i {
                0 => Prop::LeftOperand,
                1 => Prop::RightOperand,
                _ => Prop::ExtendedOperands,
            };
            let operand = self.expr(operand)?;
            self.ast.add_child(id, prop, operand);
        }
        Ok(id)
    }

    fn instance_of(&mut self, tree: &JcTree, expr: &JcTree, pattern: &JcTree) -> Result<NodeId> {
        match &pattern.kind {
            JcKind::BindingPattern { var } => {
                let left = self.expr(expr)?;
                let type_pattern = self.alloc(pattern, NodeKind::TypePattern);
                let variable = self.single_variable(var, 0)?;
                self.ast.add_child(type_pattern, Prop::Parameter, variable);
                let id = self.alloc(tree, NodeKind::PatternInstanceofExpression);
                self.ast.add_child(id, Prop::LeftOperand, left);
                self.ast.add_child(id, Prop::Pattern, type_pattern);
                Ok(id)
            }
            JcKind::AnyPattern | JcKind::RecordPattern { .. } => {
                Err(ConversionError::unsupported(pattern.tag(), pattern.start))
            }
            _ => {
                let left = self.expr(expr)?;
                let ty = self.ty(pattern)?;
                let id = self.alloc(tree, NodeKind::InstanceofExpression);
                self.ast.add_child(id, Prop::LeftOperand, left);
                self.ast.add_child(id, Prop::Type, ty);
                Ok(id)
            }
        }
    }

    fn method_reference(
        &mut self,
        tree: &JcTree,
        mode: ReferenceMode,
        name: &str,
        expr: &JcTree,
        typeargs: &[JcTree],
    ) -> Result<NodeId> {
        let end = self.end_of(tree);
        if mode == ReferenceMode::New {
            let ty = self.ty(expr)?;
            let id = self.alloc(tree, NodeKind::CreationReference);
            self.ast.add_child(id, Prop::Type, ty);
            self.type_arguments(id, typeargs)?;
            return Ok(id);
        }
        let id = if is_super(expr) {
            let id = self.alloc(tree, NodeKind::SuperMethodReference);
            if let JcKind::Select { selected: outer, .. } = &expr.kind {
                let qualifier = self.name(outer)?;
                self.ast.add_child(id, Prop::Qualifier, qualifier);
            }
            id
        } else if is_type_tree(expr) {
            let ty = self.ty(expr)?;
            let id = self.alloc(tree, NodeKind::TypeMethodReference);
            self.ast.add_child(id, Prop::Type, ty);
            id
        } else {
            let receiver = self.expr(expr)?;
            let id = self.alloc(tree, NodeKind::ExpressionMethodReference);
            self.ast.add_child(id, Prop::Expression, receiver);
            id
        };
        self.type_arguments(id, typeargs)?;
        let name = self.name_ending_at(name, end);
        self.ast.add_child(id, Prop::Name, name);
        Ok(id)
    }

    fn array_initializer(&mut self, tree: &JcTree, elems: &[JcTree]) -> Result<NodeId> {
        let id = self.alloc(tree, NodeKind::ArrayInitializer);
        for elem in elems {
            let elem = self.expr(elem)?;
            self.ast.add_child(id, Prop::Expressions, elem);
        }
        Ok(id)
    }

    /// `new T[d0][d1][]` or `new T[]{...}`: the array type carries one
    /// dimension per bracket pair, the creation node the dimension expressions
    /// and then the initializer.
    fn array_creation(
        &mut self,
        tree: &JcTree,
        elemtype: &JcTree,
        dims: &[JcTree],
        extra_dims: u32,
        elems: Option<&[JcTree]>,
    ) -> Result<NodeId> {
        let end = self.end_of(tree);
        let mut brackets: Vec<SourceRange> = Vec::new();
        let mut brace = None;
        let mut depth = 0usize;
        let mut open = -1;
        for token in self.tokens(self.end_of(elemtype), end) {
            match token.kind {
                TokenKind::LBracket | TokenKind::LParen => {
                    if depth == 0 {
                        open = token.start;
                    }
                    depth += 1;
                }
                TokenKind::RBracket | TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && token.kind == TokenKind::RBracket {
                        brackets.push(SourceRange::from_bounds(open, token.end));
                    }
                }
                TokenKind::LBrace if depth == 0 => {
                    brace = Some(token.start);
                    break;
                }
                _ => {}
            }
        }
        let expected = dims.len() + extra_dims as usize;
        if brackets.len() != expected {
            tracing::warn!(
                "Found {} bracket pairs for {} array dimensions at offset {}",
                brackets.len(),
                expected,
                tree.start
            );
            brackets.truncate(expected);
        }

        let array_type = self.array_type_with_dimensions(elemtype, &brackets)?;
        let id = self.alloc(tree, NodeKind::ArrayCreation);
        self.ast.add_child(id, Prop::Type, array_type);
        for dim in dims {
            let dim = self.expr(dim)?;
            self.ast.add_child(id, Prop::Dimensions, dim);
        }
        if let Some(elems) = elems {
            let initializer = self.synthetic(
                NodeKind::ArrayInitializer,
                SourceRange::from_bounds(brace.unwrap_or(-1), end),
            );
            for elem in elems {
                let elem = self.expr(elem)?;
                self.ast.add_child(initializer, Prop::Expressions, elem);
            }
            self.ast.add_child(id, Prop::Initializer, initializer);
        }
        Ok(id)
    }

    pub(super) fn annotation(&mut self, tree: &JcTree) -> Result<NodeId> {
        let JcKind::Annotation {
            annotation_type,
            args,
        } = &tree.kind
        else {
            return Err(ConversionError::unsupported(tree.tag(), tree.start));
        };
        let type_name = self.name(annotation_type)?;
        let single_value = match args.as_slice() {
            [only] if !matches!(only.kind, JcKind::Assign { .. }) => Some(only),
            _ => None,
        };
        let id = if let Some(value) = single_value {
            let value = self.expr(value)?;
            let id = self.alloc(tree, NodeKind::SingleMemberAnnotation);
            self.ast.add_child(id, Prop::TypeName, type_name);
            self.ast.add_child(id, Prop::Value, value);
            id
        } else if args.is_empty() && !self.has_argument_list(tree, annotation_type) {
            let id = self.alloc(tree, NodeKind::MarkerAnnotation);
            self.ast.add_child(id, Prop::TypeName, type_name);
            id
        } else {
            let id = self.alloc(tree, NodeKind::NormalAnnotation);
            self.ast.add_child(id, Prop::TypeName, type_name);
            for arg in args {
                let JcKind::Assign { lhs, rhs } = &arg.kind else {
                    tracing::warn!("Dropping unnamed annotation value at offset {}", arg.start);
                    continue;
                };
                let name = self.name(lhs)?;
                let value = self.expr(rhs)?;
                let pair = self.alloc(arg, NodeKind::MemberValuePair);
                self.ast.add_child(pair, Prop::Name, name);
                self.ast.add_child(pair, Prop::Value, value);
                self.ast.add_child(id, Prop::Values, pair);
            }
            id
        };
        Ok(id)
    }

    /// `@A()` is a normal annotation with no pairs, `@A` a marker.
    fn has_argument_list(&self, tree: &JcTree, annotation_type: &JcTree) -> bool {
        self.find_token("(", self.end_of(annotation_type), self.end_of(tree))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_binary_tag_maps_to_an_operator() {
        for tag in Tag::BINARY_OPERATORS {
            assert!(infix_operator(tag).is_some(), "{tag:?}");
        }
        assert_eq!(infix_operator(Tag::PlusAsg), None);
    }

    #[test]
    fn test_unary_tags_split_into_prefix_and_postfix() {
        assert_eq!(prefix_operator(Tag::Neg), Some(PrefixOperator::Minus));
        assert_eq!(prefix_operator(Tag::PostInc), None);
        assert_eq!(postfix_operator(Tag::PostDec), Some(PostfixOperator::Decrement));
        assert_eq!(
            assignment_operator(Tag::UsrAsg),
            Some(AssignmentOperator::RightShiftUnsignedAssign)
        );
    }
}
