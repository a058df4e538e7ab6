//! Canonical source rendering of unified nodes.
//!
//! The output is not meant to reproduce the original formatting; it is a stable
//! textual form used for diagnostics, textual equality checks and the CLI.

use crate::models::{Ast, NodeId, NodeKind, Prop};

pub fn render(ast: &Ast, node: NodeId) -> String {
    let mut renderer = Renderer {
        ast,
        out: String::new(),
    };
    renderer.node(node);
    renderer.out
}

struct Renderer<'a> {
    ast: &'a Ast,
    out: String,
}

impl Renderer<'_> {
    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn opt(&mut self, id: NodeId, prop: Prop) -> bool {
        match self.ast.child(id, prop) {
            Some(child) => {
                self.node(child);
                true
            }
            None => false,
        }
    }

    fn list(&mut self, id: NodeId, prop: Prop, sep: &str) {
        let items: Vec<NodeId> = self.ast.list(id, prop).collect();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(sep);
            }
            self.node(*item);
        }
    }

    fn has(&self, id: NodeId, prop: Prop) -> bool {
        self.ast.child(id, prop).is_some()
    }

    fn modifiers(&mut self, id: NodeId) {
        let items: Vec<NodeId> = self.ast.list(id, Prop::Modifiers).collect();
        for item in items {
            self.node(item);
            self.push(" ");
        }
    }

    fn type_parameters(&mut self, id: NodeId) {
        if self.has(id, Prop::TypeParameters) {
            self.push("<");
            self.list(id, Prop::TypeParameters, ",");
            self.push(">");
        }
    }

    fn type_arguments(&mut self, id: NodeId) {
        if self.has(id, Prop::TypeArguments) {
            self.push("<");
            self.list(id, Prop::TypeArguments, ",");
            self.push(">");
        }
    }

    fn arguments(&mut self, id: NodeId) {
        self.push("(");
        self.list(id, Prop::Arguments, ",");
        self.push(")");
    }

    fn dims(&mut self, count: u32) {
        for _ in 0..count {
            self.push("[]");
        }
    }

    fn body(&mut self, id: NodeId) {
        self.push("{\n");
        let members: Vec<NodeId> = self.ast.list(id, Prop::BodyDeclarations).collect();
        for member in members {
            self.node(member);
        }
        self.push("}\n");
    }

    fn node(&mut self, id: NodeId) {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::CompilationUnit => {
                self.opt(id, Prop::Package);
                self.list(id, Prop::Imports, "");
                self.list(id, Prop::Types, "");
            }
            NodeKind::PackageDeclaration => {
                self.opt(id, Prop::Javadoc);
                let annotations: Vec<NodeId> = ast.list(id, Prop::Annotations).collect();
                for annotation in annotations {
                    self.node(annotation);
                    self.push(" ");
                }
                self.push("package ");
                self.opt(id, Prop::Name);
                self.push(";\n");
            }
            NodeKind::ImportDeclaration {
                is_static,
                on_demand,
            } => {
                self.push("import ");
                if *is_static {
                    self.push("static ");
                }
                self.opt(id, Prop::Name);
                if *on_demand {
                    self.push(".*");
                }
                self.push(";\n");
            }
            NodeKind::TypeDeclaration { is_interface } => {
                self.opt(id, Prop::Javadoc);
                self.modifiers(id);
                self.push(if *is_interface { "interface " } else { "class " });
                self.opt(id, Prop::Name);
                self.type_parameters(id);
                self.push(" ");
                if self.has(id, Prop::SuperclassType) {
                    self.push("extends ");
                    self.opt(id, Prop::SuperclassType);
                    self.push(" ");
                }
                if self.has(id, Prop::SuperInterfaceTypes) {
                    self.push(if *is_interface { "extends " } else { "implements " });
                    self.list(id, Prop::SuperInterfaceTypes, ", ");
                    self.push(" ");
                }
                if self.has(id, Prop::PermittedTypes) {
                    self.push("permits ");
                    self.list(id, Prop::PermittedTypes, ", ");
                    self.push(" ");
                }
                self.body(id);
            }
            NodeKind::EnumDeclaration => {
                self.opt(id, Prop::Javadoc);
                self.modifiers(id);
                self.push("enum ");
                self.opt(id, Prop::Name);
                self.push(" ");
                if self.has(id, Prop::SuperInterfaceTypes) {
                    self.push("implements ");
                    self.list(id, Prop::SuperInterfaceTypes, ", ");
                    self.push(" ");
                }
                self.push("{");
                self.list(id, Prop::EnumConstants, ", ");
                if self.has(id, Prop::BodyDeclarations) {
                    self.push("; ");
                    self.list(id, Prop::BodyDeclarations, "");
                }
                self.push("}\n");
            }
            NodeKind::RecordDeclaration => {
                self.opt(id, Prop::Javadoc);
                self.modifiers(id);
                self.push("record ");
                self.opt(id, Prop::Name);
                self.type_parameters(id);
                self.push("(");
                self.list(id, Prop::RecordComponents, ",");
                self.push(") ");
                if self.has(id, Prop::SuperInterfaceTypes) {
                    self.push("implements ");
                    self.list(id, Prop::SuperInterfaceTypes, ", ");
                    self.push(" ");
                }
                self.body(id);
            }
            NodeKind::AnnotationTypeDeclaration => {
                self.opt(id, Prop::Javadoc);
                self.modifiers(id);
                self.push("@interface ");
                self.opt(id, Prop::Name);
                self.push(" ");
                self.body(id);
            }
            NodeKind::AnnotationTypeMemberDeclaration => {
                self.opt(id, Prop::Javadoc);
                self.modifiers(id);
                self.opt(id, Prop::Type);
                self.push(" ");
                self.opt(id, Prop::Name);
                self.push("()");
                if self.has(id, Prop::Default) {
                    self.push(" default ");
                    self.opt(id, Prop::Default);
                }
                self.push(";\n");
            }
            NodeKind::EnumConstantDeclaration => {
                self.opt(id, Prop::Javadoc);
                self.modifiers(id);
                self.opt(id, Prop::Name);
                if self.has(id, Prop::Arguments) {
                    self.arguments(id);
                }
                self.opt(id, Prop::AnonymousClassDeclaration);
            }
            NodeKind::FieldDeclaration => {
                self.opt(id, Prop::Javadoc);
                self.modifiers(id);
                self.opt(id, Prop::Type);
                self.push(" ");
                self.list(id, Prop::Fragments, ", ");
                self.push(";\n");
            }
            NodeKind::MethodDeclaration {
                is_constructor,
                extra_dimensions,
            } => {
                self.opt(id, Prop::Javadoc);
                self.modifiers(id);
                if self.has(id, Prop::TypeParameters) {
                    self.type_parameters(id);
                    self.push(" ");
                }
                if !*is_constructor && self.opt(id, Prop::ReturnType) {
                    self.push(" ");
                }
                self.opt(id, Prop::Name);
                self.push("(");
                self.list(id, Prop::Parameters, ",");
                self.push(")");
                self.dims(*extra_dimensions);
                if self.has(id, Prop::ThrownExceptionTypes) {
                    self.push(" throws ");
                    self.list(id, Prop::ThrownExceptionTypes, ", ");
                }
                self.push(" ");
                if !self.opt(id, Prop::Body) {
                    self.push(";\n");
                }
            }
            NodeKind::Initializer => {
                self.opt(id, Prop::Javadoc);
                self.modifiers(id);
                self.opt(id, Prop::Body);
            }
            NodeKind::AnonymousClassDeclaration => self.body(id),
            NodeKind::SingleVariableDeclaration {
                varargs,
                extra_dimensions,
            } => {
                self.modifiers(id);
                self.opt(id, Prop::Type);
                if *varargs {
                    self.push("...");
                }
                self.push(" ");
                self.opt(id, Prop::Name);
                self.dims(*extra_dimensions);
                if self.has(id, Prop::Initializer) {
                    self.push("=");
                    self.opt(id, Prop::Initializer);
                }
            }
            NodeKind::VariableDeclarationFragment { extra_dimensions } => {
                self.opt(id, Prop::Name);
                self.dims(*extra_dimensions);
                if self.has(id, Prop::Initializer) {
                    self.push("=");
                    self.opt(id, Prop::Initializer);
                }
            }
            NodeKind::TypeParameter => {
                self.modifiers(id);
                self.opt(id, Prop::Name);
                if self.has(id, Prop::Bounds) {
                    self.push(" extends ");
                    self.list(id, Prop::Bounds, " & ");
                }
            }
            NodeKind::Modifier { keyword } => self.push(keyword.as_str()),
            NodeKind::MarkerAnnotation => {
                self.push("@");
                self.opt(id, Prop::TypeName);
            }
            NodeKind::NormalAnnotation => {
                self.push("@");
                self.opt(id, Prop::TypeName);
                self.push("(");
                self.list(id, Prop::Values, ",");
                self.push(")");
            }
            NodeKind::SingleMemberAnnotation => {
                self.push("@");
                self.opt(id, Prop::TypeName);
                self.push("(");
                self.opt(id, Prop::Value);
                self.push(")");
            }
            NodeKind::MemberValuePair => {
                self.opt(id, Prop::Name);
                self.push("=");
                self.opt(id, Prop::Value);
            }
            NodeKind::Javadoc => self.push("/** */ "),
            NodeKind::Block => {
                self.push("{\n");
                self.list(id, Prop::Statements, "");
                self.push("}\n");
            }
            NodeKind::EmptyStatement => self.push(";\n"),
            NodeKind::ExpressionStatement => {
                self.opt(id, Prop::Expression);
                self.push(";\n");
            }
            NodeKind::VariableDeclarationStatement => {
                self.modifiers(id);
                self.opt(id, Prop::Type);
                self.push(" ");
                self.list(id, Prop::Fragments, ", ");
                self.push(";\n");
            }
            NodeKind::VariableDeclarationExpression => {
                self.modifiers(id);
                self.opt(id, Prop::Type);
                self.push(" ");
                self.list(id, Prop::Fragments, ", ");
            }
            NodeKind::TypeDeclarationStatement => {
                self.opt(id, Prop::Declaration);
            }
            NodeKind::IfStatement => {
                self.push("if (");
                self.opt(id, Prop::Expression);
                self.push(") ");
                self.opt(id, Prop::ThenStatement);
                if self.has(id, Prop::ElseStatement) {
                    self.push(" else ");
                    self.opt(id, Prop::ElseStatement);
                }
            }
            NodeKind::WhileStatement => {
                self.push("while (");
                self.opt(id, Prop::Expression);
                self.push(") ");
                self.opt(id, Prop::Body);
            }
            NodeKind::DoStatement => {
                self.push("do ");
                self.opt(id, Prop::Body);
                self.push(" while (");
                self.opt(id, Prop::Expression);
                self.push(");\n");
            }
            NodeKind::ForStatement => {
                self.push("for (");
                self.list(id, Prop::Initializers, ", ");
                self.push("; ");
                self.opt(id, Prop::Expression);
                self.push("; ");
                self.list(id, Prop::Updaters, ", ");
                self.push(") ");
                self.opt(id, Prop::Body);
            }
            NodeKind::EnhancedForStatement => {
                self.push("for (");
                self.opt(id, Prop::Parameter);
                self.push(" : ");
                self.opt(id, Prop::Expression);
                self.push(") ");
                self.opt(id, Prop::Body);
            }
            NodeKind::ReturnStatement => {
                self.push("return");
                if self.has(id, Prop::Expression) {
                    self.push(" ");
                    self.opt(id, Prop::Expression);
                }
                self.push(";\n");
            }
            NodeKind::ThrowStatement => {
                self.push("throw ");
                self.opt(id, Prop::Expression);
                self.push(";\n");
            }
            NodeKind::BreakStatement | NodeKind::ContinueStatement => {
                self.push(if matches!(ast.kind(id), NodeKind::BreakStatement) {
                    "break"
                } else {
                    "continue"
                });
                if self.has(id, Prop::Label) {
                    self.push(" ");
                    self.opt(id, Prop::Label);
                }
                self.push(";\n");
            }
            NodeKind::YieldStatement => {
                self.push("yield ");
                self.opt(id, Prop::Expression);
                self.push(";\n");
            }
            NodeKind::LabeledStatement => {
                self.opt(id, Prop::Label);
                self.push(": ");
                self.opt(id, Prop::Body);
            }
            NodeKind::SwitchStatement | NodeKind::SwitchExpression => {
                self.push("switch (");
                self.opt(id, Prop::Expression);
                self.push(") {\n");
                self.list(id, Prop::Statements, "");
                self.push("}\n");
            }
            NodeKind::SwitchCase {
                switch_labeled_rule,
                is_default,
            } => {
                if *is_default {
                    self.push("default");
                } else {
                    self.push("case ");
                    self.list(id, Prop::Expressions, ", ");
                }
                self.push(if *switch_labeled_rule { " ->" } else { ":\n" });
            }
            NodeKind::SynchronizedStatement => {
                self.push("synchronized (");
                self.opt(id, Prop::Expression);
                self.push(") ");
                self.opt(id, Prop::Body);
            }
            NodeKind::TryStatement => {
                self.push("try ");
                if self.has(id, Prop::Resources) {
                    self.push("(");
                    self.list(id, Prop::Resources, "; ");
                    self.push(") ");
                }
                self.opt(id, Prop::Body);
                self.list(id, Prop::CatchClauses, "");
                if self.has(id, Prop::Finally) {
                    self.push(" finally ");
                    self.opt(id, Prop::Finally);
                }
            }
            NodeKind::CatchClause => {
                self.push("catch (");
                self.opt(id, Prop::Exception);
                self.push(") ");
                self.opt(id, Prop::Body);
            }
            NodeKind::AssertStatement => {
                self.push("assert ");
                self.opt(id, Prop::Expression);
                if self.has(id, Prop::Message) {
                    self.push(" : ");
                    self.opt(id, Prop::Message);
                }
                self.push(";\n");
            }
            NodeKind::ConstructorInvocation => {
                self.type_arguments(id);
                self.push("this");
                self.arguments(id);
                self.push(";\n");
            }
            NodeKind::SuperConstructorInvocation => {
                if self.opt(id, Prop::Expression) {
                    self.push(".");
                }
                self.type_arguments(id);
                self.push("super");
                self.arguments(id);
                self.push(";\n");
            }
            NodeKind::SimpleName { identifier } => self.push(identifier),
            NodeKind::QualifiedName => {
                self.opt(id, Prop::Qualifier);
                self.push(".");
                self.opt(id, Prop::Name);
            }
            NodeKind::ThisExpression => {
                if self.opt(id, Prop::Qualifier) {
                    self.push(".");
                }
                self.push("this");
            }
            NodeKind::NumberLiteral { token } => self.push(token),
            NodeKind::StringLiteral { escaped } | NodeKind::TextBlock { escaped } => {
                self.push(escaped)
            }
            NodeKind::CharacterLiteral { escaped } => self.push(escaped),
            NodeKind::BooleanLiteral { value } => self.push(if *value { "true" } else { "false" }),
            NodeKind::NullLiteral => self.push("null"),
            NodeKind::TypeLiteral => {
                self.opt(id, Prop::Type);
                self.push(".class");
            }
            NodeKind::FieldAccess => {
                self.opt(id, Prop::Expression);
                self.push(".");
                self.opt(id, Prop::Name);
            }
            NodeKind::SuperFieldAccess => {
                if self.opt(id, Prop::Qualifier) {
                    self.push(".");
                }
                self.push("super.");
                self.opt(id, Prop::Name);
            }
            NodeKind::MethodInvocation => {
                if self.opt(id, Prop::Expression) {
                    self.push(".");
                }
                self.type_arguments(id);
                self.opt(id, Prop::Name);
                self.arguments(id);
            }
            NodeKind::SuperMethodInvocation => {
                if self.opt(id, Prop::Qualifier) {
                    self.push(".");
                }
                self.push("super.");
                self.type_arguments(id);
                self.opt(id, Prop::Name);
                self.arguments(id);
            }
            NodeKind::ClassInstanceCreation => {
                if self.opt(id, Prop::Expression) {
                    self.push(".");
                }
                self.push("new ");
                self.type_arguments(id);
                self.opt(id, Prop::Type);
                self.arguments(id);
                self.opt(id, Prop::AnonymousClassDeclaration);
            }
            NodeKind::ArrayCreation => {
                self.push("new ");
                let array_type = ast.child(id, Prop::Type);
                let (element, total) = match array_type {
                    Some(t) => (
                        ast.child(t, Prop::ElementType),
                        ast.list_len(t, Prop::Dimensions) as u32,
                    ),
                    None => (None, 0),
                };
                if let Some(element) = element {
                    self.node(element);
                }
                let dimensions: Vec<NodeId> = ast.list(id, Prop::Dimensions).collect();
                for dimension in &dimensions {
                    self.push("[");
                    self.node(*dimension);
                    self.push("]");
                }
                self.dims(total.saturating_sub(dimensions.len() as u32));
                self.opt(id, Prop::Initializer);
            }
            NodeKind::ArrayInitializer => {
                self.push("{");
                self.list(id, Prop::Expressions, ",");
                self.push("}");
            }
            NodeKind::ArrayAccess => {
                self.opt(id, Prop::Array);
                self.push("[");
                self.opt(id, Prop::Index);
                self.push("]");
            }
            NodeKind::InfixExpression { operator } => {
                let op = operator.map(|o| o.as_str()).unwrap_or("?");
                self.opt(id, Prop::LeftOperand);
                self.push(" ");
                self.push(op);
                self.push(" ");
                self.opt(id, Prop::RightOperand);
                let extended: Vec<NodeId> = ast.list(id, Prop::ExtendedOperands).collect();
                for operand in extended {
                    self.push(" ");
                    self.push(op);
                    self.push(" ");
                    self.node(operand);
                }
            }
            NodeKind::PrefixExpression { operator } => {
                self.push(operator.as_str());
                self.opt(id, Prop::Operand);
            }
            NodeKind::PostfixExpression { operator } => {
                self.opt(id, Prop::Operand);
                self.push(operator.as_str());
            }
            NodeKind::ParenthesizedExpression => {
                self.push("(");
                self.opt(id, Prop::Expression);
                self.push(")");
            }
            NodeKind::Assignment { operator } => {
                self.opt(id, Prop::LeftHandSide);
                self.push(operator.as_str());
                self.opt(id, Prop::RightHandSide);
            }
            NodeKind::ConditionalExpression => {
                self.opt(id, Prop::Expression);
                self.push(" ? ");
                self.opt(id, Prop::ThenExpression);
                self.push(" : ");
                self.opt(id, Prop::ElseExpression);
            }
            NodeKind::CastExpression => {
                self.push("(");
                self.opt(id, Prop::Type);
                self.push(")");
                self.opt(id, Prop::Expression);
            }
            NodeKind::InstanceofExpression => {
                self.opt(id, Prop::LeftOperand);
                self.push(" instanceof ");
                self.opt(id, Prop::Type);
            }
            NodeKind::PatternInstanceofExpression => {
                self.opt(id, Prop::LeftOperand);
                self.push(" instanceof ");
                self.opt(id, Prop::Pattern);
            }
            NodeKind::TypePattern => {
                self.opt(id, Prop::Parameter);
            }
            NodeKind::LambdaExpression { parentheses } => {
                if *parentheses {
                    self.push("(");
                }
                self.list(id, Prop::Parameters, ",");
                if *parentheses {
                    self.push(")");
                }
                self.push(" -> ");
                self.opt(id, Prop::Body);
            }
            NodeKind::CreationReference => {
                self.opt(id, Prop::Type);
                self.push("::");
                self.type_arguments(id);
                self.push("new");
            }
            NodeKind::ExpressionMethodReference | NodeKind::TypeMethodReference => {
                if !self.opt(id, Prop::Expression) {
                    self.opt(id, Prop::Type);
                }
                self.push("::");
                self.type_arguments(id);
                self.opt(id, Prop::Name);
            }
            NodeKind::SuperMethodReference => {
                if self.opt(id, Prop::Qualifier) {
                    self.push(".");
                }
                self.push("super::");
                self.type_arguments(id);
                self.opt(id, Prop::Name);
            }
            NodeKind::PrimitiveType { code } => self.push(code.as_str()),
            NodeKind::SimpleType => {
                self.opt(id, Prop::Name);
            }
            NodeKind::QualifiedType => {
                self.opt(id, Prop::Qualifier);
                self.push(".");
                self.opt(id, Prop::Name);
            }
            NodeKind::ArrayType => {
                self.opt(id, Prop::ElementType);
                self.list(id, Prop::Dimensions, "");
            }
            NodeKind::Dimension => {
                let annotations: Vec<NodeId> = ast.list(id, Prop::Annotations).collect();
                for annotation in annotations {
                    self.push(" ");
                    self.node(annotation);
                    self.push(" ");
                }
                self.push("[]");
            }
            NodeKind::ParameterizedType => {
                self.opt(id, Prop::Type);
                self.push("<");
                self.list(id, Prop::TypeArguments, ",");
                self.push(">");
            }
            NodeKind::WildcardType { upper_bound } => {
                self.push("?");
                if self.has(id, Prop::Bound) {
                    self.push(if *upper_bound { " extends " } else { " super " });
                    self.opt(id, Prop::Bound);
                }
            }
            NodeKind::UnionType => self.list(id, Prop::Types, "|"),
            NodeKind::IntersectionType => self.list(id, Prop::Types, " & "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InfixOperator, SourceRange};

    #[test]
    fn test_render_infix_with_extended_operands() {
        let mut ast = Ast::new();
        let infix = ast.alloc(
            NodeKind::InfixExpression {
                operator: Some(InfixOperator::Plus),
            },
            SourceRange::UNSET,
        );
        for (prop, token) in [
            (Prop::LeftOperand, "1"),
            (Prop::RightOperand, "2"),
            (Prop::ExtendedOperands, "3"),
        ] {
            let literal = ast.alloc(
                NodeKind::NumberLiteral {
                    token: token.into(),
                },
                SourceRange::UNSET,
            );
            ast.add_child(infix, prop, literal);
        }
        assert_eq!(render(&ast, infix), "1 + 2 + 3");
    }
}
