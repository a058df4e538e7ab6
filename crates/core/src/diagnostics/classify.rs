//! Foreign diagnostic code to problem id.

use super::DiagnosticContext;
use super::heuristics::MessageHeuristics;
use jdt_bridge_api::ProblemId;
use jdt_bridge_javac::{
    ClassKind, DiagnosticArg, ForeignDiagnostic, JcKind, KindName, SymbolKind, Tag, TreePath,
};

/// Maps a diagnostic to its problem id. Unknown codes are logged and map to
/// [`ProblemId::IGNORED`].
pub fn classify(
    diag: &ForeignDiagnostic,
    ctx: &DiagnosticContext<'_>,
    heuristics: &dyn MessageHeuristics,
) -> ProblemId {
    match diag.code.as_str() {
        "compiler.warn.dangling.doc.comment" => ProblemId::IGNORED,
        "compiler.err.expected" => ProblemId::PARSING_ERROR_INSERT_TOKEN_AFTER,
        "compiler.err.expected2" => ProblemId::PARSING_ERROR_INSERT_TOKEN_BEFORE,
        "compiler.err.expected3" | "compiler.err.bad.initializer" => {
            ProblemId::PARSING_ERROR_INSERT_TO_COMPLETE
        }
        "compiler.err.unclosed.comment" => ProblemId::UNTERMINATED_COMMENT,
        "compiler.err.illegal.start.of.type"
        | "compiler.err.illegal.start.of.expr"
        | "compiler.err.variable.not.allowed" => ProblemId::SYNTAX,
        "compiler.err.premature.eof" => ProblemId::PARSING_ERROR_UNEXPECTED_EOF,
        "compiler.err.unclosed.str.lit" => ProblemId::UNTERMINATED_STRING,
        "compiler.err.illegal.char"
        | "compiler.err.unclosed.char.lit"
        | "compiler.err.empty.char.lit" => ProblemId::INVALID_CHARACTER_CONSTANT,
        "compiler.err.malformed.fp.lit" => ProblemId::INVALID_FLOAT,

        "compiler.err.cant.resolve.location" => match diag.kind_name() {
            Some(KindName::Class) => ProblemId::UNDEFINED_TYPE,
            Some(KindName::Method) => ProblemId::UNDEFINED_METHOD,
            Some(KindName::Var) => ProblemId::UNRESOLVED_VARIABLE,
            _ => ProblemId::UNDEFINED_NAME,
        },
        "compiler.err.cant.resolve.location.args" | "compiler.err.cant.resolve.args" => {
            undefined_method(diag, ctx)
        }
        "compiler.err.cant.resolve.location.args.params"
        | "compiler.err.cant.resolve.args.params" => ProblemId::UNDEFINED_METHOD,
        "compiler.err.cant.resolve" => match ctx.tree(diag).map(|t| t.tag()) {
            Some(Tag::Select) => ProblemId::UNDEFINED_FIELD,
            _ => ProblemId::UNRESOLVED_VARIABLE,
        },
        "compiler.err.cant.apply.symbol" | "compiler.err.cant.apply.symbols" => {
            inapplicable(diag, ctx)
        }
        "compiler.err.report.access" => not_visible(diag, ctx),
        "compiler.err.ref.ambiguous" => match diag.kind_name() {
            Some(KindName::Class) => ProblemId::AMBIGUOUS_TYPE,
            Some(KindName::Method) => ProblemId::AMBIGUOUS_METHOD,
            _ => ProblemId::IGNORED,
        },
        "compiler.err.enum.label.must.be.unqualified.enum" => ProblemId::UNDEFINED_FIELD,
        "compiler.err.doesnt.exist" => ProblemId::PACKAGE_DOES_NOT_EXIST_OR_IS_EMPTY,
        "compiler.err.already.defined.this.unit" => ProblemId::CONFLICTING_IMPORT,
        "compiler.err.not.def.public.cant.access" => ProblemId::NOT_VISIBLE_TYPE,

        "compiler.err.illegal.initializer.for.type" => ProblemId::TYPE_MISMATCH,
        "compiler.err.prob.found.req" => type_mismatch(diag, ctx),
        "compiler.err.invalid.meth.decl.ret.type.req" => ProblemId::MISSING_RETURN_TYPE,
        "compiler.err.missing.ret.stmt" => ProblemId::SHOULD_RETURN_VALUE,
        "compiler.err.abstract.meth.cant.have.body" | "compiler.err.intf.meth.cant.have.body" => {
            ProblemId::BODY_FOR_ABSTRACT_METHOD
        }
        "compiler.err.missing.meth.body.or.decl.abstract" => ProblemId::METHOD_REQUIRES_BODY,
        "compiler.err.already.defined" => ProblemId::DUPLICATE_METHOD,
        "compiler.err.does.not.override.abstract" => {
            ProblemId::ABSTRACT_METHOD_MUST_BE_IMPLEMENTED
        }
        "compiler.err.override.meth.doesnt.throw" => {
            ProblemId::INCOMPATIBLE_EXCEPTION_IN_THROWS_CLAUSE
        }
        "compiler.err.override.incompatible.ret" => ProblemId::INCOMPATIBLE_RETURN_TYPE,
        "compiler.err.override.meth" => {
            if heuristics.is_static_override(&diag.message) {
                ProblemId::CANNOT_OVERRIDE_A_STATIC_METHOD_WITH_AN_INSTANCE_METHOD
            } else {
                ProblemId::FINAL_METHOD_CANNOT_BE_OVERRIDDEN
            }
        }
        "compiler.err.non-static.cant.be.ref" => ProblemId::NON_STATIC_ACCESS_TO_STATIC_METHOD,
        "compiler.err.cant.ref.before.ctor.called" => {
            ProblemId::INSTANCE_FIELD_DURING_CONSTRUCTOR_INVOCATION
        }
        "compiler.err.cant.assign.val.to.var" => ProblemId::FINAL_FIELD_ASSIGNMENT,
        "compiler.err.var.might.not.have.been.initialized" => {
            ProblemId::UNINITIALIZED_LOCAL_VARIABLE
        }

        "compiler.err.unreported.exception.need.to.catch.or.throw" => {
            ProblemId::UNHANDLED_EXCEPTION
        }
        "compiler.err.unreported.exception.default.constructor" => {
            ProblemId::UNHANDLED_EXCEPTION_IN_DEFAULT_CONSTRUCTOR
        }
        "compiler.err.unreported.exception.implicit.close" => {
            ProblemId::UNHANDLED_EXCEPTION_ON_AUTO_CLOSE
        }
        "compiler.err.unreachable.stmt" => ProblemId::CODE_CANNOT_BE_REACHED,
        "compiler.err.except.never.thrown.in.try" => ProblemId::UNREACHABLE_CATCH,
        "compiler.err.except.already.caught" => ProblemId::INVALID_CATCH_BLOCK_SEQUENCE,
        "compiler.err.multicatch.types.must.be.disjoint" => {
            ProblemId::INVALID_UNION_TYPE_REFERENCE_SEQUENCE
        }
        "compiler.err.not.stmt" => ProblemId::INVALID_EXPRESSION_AS_STATEMENT,
        "compiler.err.varargs.and.old.array.syntax" => ProblemId::VARARGS_CONFLICT,

        "compiler.err.class.public.should.be.in.file" => {
            ProblemId::PUBLIC_CLASS_MUST_MATCH_FILE_NAME
        }
        "compiler.err.cant.inherit.from.final" => {
            if in_anonymous_class(ctx.path(diag)) {
                ProblemId::ANONYMOUS_CLASS_CANNOT_EXTEND_FINAL_CLASS
            } else {
                ProblemId::CLASS_EXTEND_FINAL_CLASS
            }
        }
        "compiler.err.qualified.new.of.static.class" | "compiler.err.abstract.cant.be.instantiated" => {
            ProblemId::INVALID_CLASS_INSTANTIATION
        }
        "compiler.err.annotation.missing.default.value" => {
            ProblemId::MISSING_VALUE_FOR_ANNOTATION_MEMBER
        }
        "compiler.err.annotation.value.must.be.name.value" => {
            ProblemId::UNDEFINED_ANNOTATION_MEMBER
        }
        "compiler.err.expression.not.allowable.as.annotation.value" => {
            ProblemId::ANNOTATION_VALUE_MUST_BE_CONSTANT
        }

        "compiler.err.repeated.modifier" => ProblemId::DUPLICATE_MODIFIER_FOR_ARGUMENT,
        "compiler.err.mod.not.allowed.here" | "compiler.err.invalid.permits.clause" => {
            illegal_modifier(ctx.path(diag))
        }
        "compiler.err.illegal.combination.of.modifiers" => {
            illegal_combination(diag, ctx.path(diag), heuristics)
        }
        "compiler.warn.strictfp" => useless_strictfp(ctx.path(diag)),
        "compiler.err.feature.not.supported.in.source.plural" => {
            match heuristics.unsupported_source_level(&diag.message) {
                Some(8) => ProblemId::ILLEGAL_MODIFIER_FOR_INTERFACE_METHOD_18,
                Some(9) => ProblemId::ILLEGAL_MODIFIER_FOR_INTERFACE_METHOD_9,
                _ => ProblemId::ILLEGAL_MODIFIER_FOR_INTERFACE_METHOD,
            }
        }
        "compiler.err.cant.inherit.from.sealed" => {
            let symbol = diag.args.iter().find_map(|arg| match arg {
                DiagnosticArg::Symbol(symbol) => match symbol.kind {
                    SymbolKind::Class { is_interface } => Some(is_interface),
                    _ => None,
                },
                _ => None,
            });
            match symbol {
                Some(true) => ProblemId::SEALED_SUPER_INTERFACE_DOES_NOT_PERMIT,
                Some(false) => ProblemId::SEALED_SUPER_CLASS_DOES_NOT_PERMIT,
                None => ProblemId::IGNORED,
            }
        }
        "compiler.err.non.sealed.sealed.or.final.expected" => {
            ProblemId::SEALED_MISSING_CLASS_MODIFIER
        }
        "compiler.err.sealed.class.must.have.subclasses" => {
            ProblemId::SEALED_SEALED_TYPE_MISSING_PERMITS
        }

        "compiler.warn.raw.class.use" => ProblemId::RAW_TYPE_REFERENCE,
        "compiler.warn.unchecked.call.mbr.of.raw.type" => ProblemId::UNSAFE_RAW_METHOD_INVOCATION,
        "compiler.warn.missing.SVUID" => ProblemId::MISSING_SERIAL_VERSION,
        "compiler.warn.non.serializable.instance.field" => {
            ProblemId::NON_SERIALIZABLE_INSTANCE_FIELD
        }
        "compiler.warn.override.equals.but.not.hashcode" => ProblemId::SHOULD_IMPLEMENT_HASHCODE,
        "compiler.warn.empty.if" => ProblemId::EMPTY_CONTROL_FLOW_STATEMENT,
        "compiler.warn.redundant.cast" => ProblemId::UNNECESSARY_CAST,
        "compiler.warn.missing.deprecated.annotation" => match ctx.tree(diag).map(|t| t.tag()) {
            Some(Tag::VarDef) => ProblemId::FIELD_MISSING_DEPRECATED_ANNOTATION,
            Some(Tag::MethodDef) => ProblemId::METHOD_MISSING_DEPRECATED_ANNOTATION,
            Some(Tag::ClassDef) => ProblemId::TYPE_MISSING_DEPRECATED_ANNOTATION,
            _ => {
                tracing::error!("Could not convert diagnostic {}", diag);
                ProblemId::IGNORED
            }
        },

        "compiler.err.dc.identifier.expected" => ProblemId::JAVADOC_MISSING_IDENTIFIER,
        "compiler.err.dc.unterminated.inline.tag" => ProblemId::JAVADOC_UNTERMINATED_INLINE_TAG,
        code if code.starts_with("compiler.err.dc.") => ProblemId::JAVADOC_UNEXPECTED_TEXT,
        "compiler.warn.proc.messager" | "compiler.err.proc.messager" => {
            heuristics.doclint_problem(&diag.message)
        }

        code => {
            tracing::error!("Could not convert diagnostic ({}): {}", code, diag);
            ProblemId::IGNORED
        }
    }
}

fn undefined_method(diag: &ForeignDiagnostic, ctx: &DiagnosticContext<'_>) -> ProblemId {
    let array_receiver = diag.nested().is_some_and(|nested| {
        nested.args.iter().any(|arg| matches!(arg, DiagnosticArg::Type(ty) if ty.is_array))
    });
    if array_receiver {
        return ProblemId::NO_MESSAGE_SEND_ON_ARRAY_TYPE;
    }
    if diag.code == "compiler.err.cant.resolve.args" && diag.kind_name() == Some(KindName::Constructor) {
        return ProblemId::UNDEFINED_CONSTRUCTOR;
    }
    // @A(unknown = 1)
    if let Some(path) = ctx.path(diag) {
        let mut ancestors = path.ancestors();
        if let (Some(assign), Some(annotation)) = (ancestors.next(), ancestors.next()) {
            if assign.tag() == Tag::Assign && annotation.tag() == Tag::Annotation {
                return ProblemId::UNDEFINED_ANNOTATION_MEMBER;
            }
        }
    }
    ProblemId::UNDEFINED_METHOD
}

fn inapplicable(diag: &ForeignDiagnostic, ctx: &DiagnosticContext<'_>) -> ProblemId {
    match diag.kind_name() {
        Some(KindName::Constructor) => {
            if diag.multiline {
                return ProblemId::UNDEFINED_CONSTRUCTOR_IN_DEFAULT_CONSTRUCTOR;
            }
            match diag.nested().map(|cause| cause.code.as_str()) {
                Some("compiler.misc.report.access") => not_visible(diag, ctx),
                Some("compiler.misc.arg.length.mismatch") => {
                    ProblemId::UNDEFINED_CONSTRUCTOR_IN_DEFAULT_CONSTRUCTOR
                }
                _ => ProblemId::UNDEFINED_CONSTRUCTOR,
            }
        }
        Some(KindName::Method) => ProblemId::PARAMETER_MISMATCH,
        _ => ProblemId::IGNORED,
    }
}

fn not_visible(diag: &ForeignDiagnostic, ctx: &DiagnosticContext<'_>) -> ProblemId {
    let Some(DiagnosticArg::Symbol(symbol)) = diag.args.first() else {
        return ProblemId::IGNORED;
    };
    match symbol.kind {
        SymbolKind::Method {
            is_constructor: true,
        } => {
            let implicit_super = ctx
                .tree(diag)
                .and_then(|t| t.ident_name())
                .is_some_and(|name| name == "super");
            if implicit_super {
                ProblemId::NOT_VISIBLE_CONSTRUCTOR_IN_DEFAULT_CONSTRUCTOR
            } else {
                ProblemId::NOT_VISIBLE_CONSTRUCTOR
            }
        }
        SymbolKind::Method { .. } => ProblemId::NOT_VISIBLE_METHOD,
        SymbolKind::Class { .. } => ProblemId::NOT_VISIBLE_TYPE,
        SymbolKind::Var => ProblemId::NOT_VISIBLE_FIELD,
        SymbolKind::Package => ProblemId::IGNORED,
    }
}

fn type_mismatch(diag: &ForeignDiagnostic, ctx: &DiagnosticContext<'_>) -> ProblemId {
    if let Some(cause) = diag.nested() {
        match cause.code.as_str() {
            "compiler.misc.inconvertible.types" => {
                if matches!(cause.args.get(1), Some(DiagnosticArg::Type(ty)) if ty.is_void) {
                    return ProblemId::METHOD_RETURNS_VOID;
                }
            }
            "compiler.misc.unexpected.ret.val" => return ProblemId::VOID_METHOD_RETURNS_VALUE,
            "compiler.misc.missing.ret.val" => return ProblemId::SHOULD_RETURN_VALUE,
            _ => {}
        }
    }
    // A mismatch inside a call's arguments is a parameter mismatch.
    if let Some(path) = ctx.path(diag) {
        for ancestor in path.ancestors() {
            if !ancestor.is_expression() {
                break;
            }
            if ancestor.tag() == Tag::Apply {
                return ProblemId::PARAMETER_MISMATCH;
            }
        }
    }
    ProblemId::TYPE_MISMATCH
}

fn in_anonymous_class(path: Option<TreePath<'_>>) -> bool {
    let Some(path) = path else {
        return false;
    };
    std::iter::once(path.leaf())
        .chain(path.ancestors())
        .find_map(|tree| match &tree.kind {
            JcKind::NewClass { def, .. } => Some(def.is_some()),
            JcKind::ClassDef { .. } => Some(false),
            _ => None,
        })
        .unwrap_or(false)
}

fn class_kind(kind: &JcKind) -> Option<ClassKind> {
    match kind {
        JcKind::ClassDef { class_kind, .. } => Some(*class_kind),
        _ => None,
    }
}

fn illegal_modifier(path: Option<TreePath<'_>>) -> ProblemId {
    let mut current = path;
    while let Some(path) = current {
        let leaf = path.leaf();
        let parent = path.parent().map(|p| &p.kind);
        match &leaf.kind {
            JcKind::MethodDef { restype, .. } => {
                return match parent.and_then(class_kind) {
                    Some(kind) if restype.is_none() => match kind {
                        ClassKind::Enum => ProblemId::ILLEGAL_MODIFIER_FOR_ENUM_CONSTRUCTOR,
                        _ => ProblemId::ILLEGAL_MODIFIER_FOR_CONSTRUCTOR,
                    },
                    Some(ClassKind::Interface) => ProblemId::ILLEGAL_MODIFIER_FOR_INTERFACE_METHOD,
                    Some(ClassKind::AnnotationType) => {
                        ProblemId::ILLEGAL_MODIFIER_FOR_ANNOTATION_METHOD
                    }
                    _ => ProblemId::ILLEGAL_MODIFIER_FOR_METHOD,
                };
            }
            JcKind::ClassDef { class_kind: kind, .. } => {
                return match parent {
                    Some(JcKind::ClassDef { .. }) => match kind {
                        ClassKind::Record => ProblemId::RECORD_ILLEGAL_MODIFIER_FOR_INNER_RECORD,
                        ClassKind::Enum => ProblemId::ILLEGAL_MODIFIER_FOR_MEMBER_ENUM,
                        ClassKind::Interface => ProblemId::ILLEGAL_MODIFIER_FOR_MEMBER_INTERFACE,
                        _ => ProblemId::ILLEGAL_MODIFIER_FOR_MEMBER_CLASS,
                    },
                    Some(JcKind::CompilationUnit { .. }) => match kind {
                        ClassKind::Record => ProblemId::RECORD_ILLEGAL_MODIFIER_FOR_RECORD,
                        ClassKind::Enum => ProblemId::ILLEGAL_MODIFIER_FOR_ENUM,
                        ClassKind::Interface => ProblemId::ILLEGAL_MODIFIER_FOR_INTERFACE,
                        _ => ProblemId::ILLEGAL_MODIFIER_FOR_CLASS,
                    },
                    _ => match kind {
                        ClassKind::Record => ProblemId::RECORD_ILLEGAL_MODIFIER_FOR_LOCAL_RECORD,
                        ClassKind::Enum => ProblemId::ILLEGAL_MODIFIER_FOR_LOCAL_ENUM_DECLARATION,
                        _ => ProblemId::ILLEGAL_MODIFIER_FOR_LOCAL_CLASS,
                    },
                };
            }
            JcKind::VarDef { .. } => match parent {
                Some(JcKind::MethodDef { .. }) => return ProblemId::ILLEGAL_MODIFIER_FOR_ARGUMENT,
                Some(JcKind::ClassDef {
                    class_kind: ClassKind::Interface,
                    ..
                }) => return ProblemId::ILLEGAL_MODIFIER_FOR_INTERFACE_FIELD,
                Some(JcKind::ClassDef { .. }) => return ProblemId::ILLEGAL_MODIFIER_FOR_FIELD,
                _ => {}
            },
            _ => {}
        }
        current = path.parent_path();
    }
    ProblemId::ILLEGAL_MODIFIERS
}

fn illegal_combination(
    diag: &ForeignDiagnostic,
    path: Option<TreePath<'_>>,
    heuristics: &dyn MessageHeuristics,
) -> ProblemId {
    let Some(path) = path else {
        return ProblemId::ILLEGAL_MODIFIERS;
    };
    let message = diag.message.as_str();
    let mentions = |keyword: &str| heuristics.mentions_modifier(message, keyword);
    let leaf = &path.leaf().kind;
    let parent = path.parent().map(|p| &p.kind);

    if mentions("public") || mentions("protected") || mentions("private") {
        return match (leaf, parent) {
            (JcKind::MethodDef { .. }, _) => {
                ProblemId::ILLEGAL_VISIBILITY_MODIFIER_COMBINATION_FOR_METHOD
            }
            (
                JcKind::ClassDef { .. },
                Some(JcKind::ClassDef {
                    class_kind: ClassKind::Interface,
                    ..
                }),
            ) => ProblemId::ILLEGAL_VISIBILITY_MODIFIER_FOR_INTERFACE_MEMBER_TYPE,
            (JcKind::ClassDef { .. }, Some(JcKind::ClassDef { .. })) => {
                ProblemId::ILLEGAL_VISIBILITY_MODIFIER_COMBINATION_FOR_MEMBER_TYPE
            }
            (JcKind::VarDef { .. }, Some(JcKind::ClassDef { .. })) => {
                ProblemId::ILLEGAL_VISIBILITY_MODIFIER_COMBINATION_FOR_FIELD
            }
            _ => ProblemId::ILLEGAL_MODIFIERS,
        };
    }
    match (leaf, parent.and_then(class_kind)) {
        (JcKind::MethodDef { .. }, Some(ClassKind::Interface)) => {
            ProblemId::ILLEGAL_MODIFIER_COMBINATION_FOR_INTERFACE_METHOD
        }
        (JcKind::MethodDef { .. }, Some(_)) if mentions("abstract") && mentions("final") => {
            ProblemId::ILLEGAL_MODIFIER_COMBINATION_FINAL_ABSTRACT_FOR_CLASS
        }
        (JcKind::VarDef { .. }, Some(_)) if mentions("volatile") && mentions("final") => {
            ProblemId::ILLEGAL_MODIFIER_COMBINATION_FINAL_VOLATILE_FOR_FIELD
        }
        _ => ProblemId::ILLEGAL_MODIFIERS,
    }
}

fn useless_strictfp(path: Option<TreePath<'_>>) -> ProblemId {
    match path {
        Some(path)
            if path.leaf().tag() == Tag::MethodDef
                && path.parent().is_some_and(|p| p.tag() == Tag::ClassDef) =>
        {
            ProblemId::ILLEGAL_STRICTFP_FOR_ABSTRACT_INTERFACE_METHOD
        }
        _ => ProblemId::STRICTFP_NOT_REQUIRED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::heuristics::EnglishHeuristics;
    use jdt_bridge_javac::{EndPosTable, ForeignIndex, JcTree, SymbolArg, TreeFactory, TypeArg};

    fn empty_unit() -> (JcTree, EndPosTable) {
        let mut f = TreeFactory::new();
        let unit = f.at(
            0,
            0,
            JcKind::CompilationUnit {
                package: None,
                imports: Vec::new(),
                defs: Vec::new(),
            },
        );
        (unit, f.finish())
    }

    fn classify_alone(diag: &ForeignDiagnostic) -> ProblemId {
        let (unit, ends) = empty_unit();
        let index = ForeignIndex::build(&unit);
        let ctx = DiagnosticContext::new("A.java", "", &index, &ends);
        classify(diag, &ctx, &EnglishHeuristics)
    }

    #[test]
    fn test_unresolved_symbols_follow_kind_name() {
        let class = ForeignDiagnostic::error("compiler.err.cant.resolve.location", "cannot find symbol")
            .with_arg(DiagnosticArg::KindName(KindName::Class));
        let var = ForeignDiagnostic::error("compiler.err.cant.resolve.location", "cannot find symbol")
            .with_arg(DiagnosticArg::KindName(KindName::Var));
        let other = ForeignDiagnostic::error("compiler.err.cant.resolve.location", "cannot find symbol");
        assert_eq!(classify_alone(&class), ProblemId::UNDEFINED_TYPE);
        assert_eq!(classify_alone(&var), ProblemId::UNRESOLVED_VARIABLE);
        assert_eq!(classify_alone(&other), ProblemId::UNDEFINED_NAME);
    }

    #[test]
    fn test_constructor_inapplicable_by_cause() {
        let cause = ForeignDiagnostic::error("compiler.misc.arg.length.mismatch", "length");
        let diag = ForeignDiagnostic::error("compiler.err.cant.apply.symbol", "cannot apply")
            .with_arg(DiagnosticArg::KindName(KindName::Constructor))
            .with_arg(DiagnosticArg::Diagnostic(Box::new(cause)));
        assert_eq!(
            classify_alone(&diag),
            ProblemId::UNDEFINED_CONSTRUCTOR_IN_DEFAULT_CONSTRUCTOR
        );

        let plain = ForeignDiagnostic::error("compiler.err.cant.apply.symbol", "cannot apply")
            .with_arg(DiagnosticArg::KindName(KindName::Constructor));
        assert_eq!(classify_alone(&plain), ProblemId::UNDEFINED_CONSTRUCTOR);
    }

    #[test]
    fn test_array_receiver_and_visibility() {
        let receiver = ForeignDiagnostic::error("compiler.misc.location", "location").with_arg(
            DiagnosticArg::Type(TypeArg {
                name: "int[]".to_string(),
                is_array: true,
                is_void: false,
            }),
        );
        let diag = ForeignDiagnostic::error("compiler.err.cant.resolve.location.args", "no method")
            .with_arg(DiagnosticArg::Diagnostic(Box::new(receiver)));
        assert_eq!(classify_alone(&diag), ProblemId::NO_MESSAGE_SEND_ON_ARRAY_TYPE);

        let access = ForeignDiagnostic::error("compiler.err.report.access", "private").with_arg(
            DiagnosticArg::Symbol(SymbolArg {
                kind: SymbolKind::Var,
                name: "f".to_string(),
            }),
        );
        assert_eq!(classify_alone(&access), ProblemId::NOT_VISIBLE_FIELD);
    }

    #[test]
    fn test_unknown_code_is_ignored() {
        let diag = ForeignDiagnostic::error("compiler.err.something.new", "new");
        assert_eq!(classify_alone(&diag), ProblemId::IGNORED);
        let doc = ForeignDiagnostic::error("compiler.err.dc.malformed.html", "html");
        assert_eq!(classify_alone(&doc), ProblemId::JAVADOC_UNEXPECTED_TEXT);
    }

    #[test]
    fn test_illegal_combination_on_member_method() {
        let mut f = TreeFactory::new();
        let method = f.at(
            10,
            30,
            JcKind::MethodDef {
                mods: jdt_bridge_javac::Modifiers::empty(),
                name: "m".to_string(),
                restype: None,
                typarams: Vec::new(),
                params: Vec::new(),
                dims: 0,
                thrown: Vec::new(),
                body: None,
                default_value: None,
            },
        );
        let method_id = method.id;
        let class = f.at(
            0,
            40,
            JcKind::ClassDef {
                mods: jdt_bridge_javac::Modifiers::empty(),
                name: "A".to_string(),
                class_kind: ClassKind::Class,
                typarams: Vec::new(),
                extending: None,
                implementing: Vec::new(),
                permitting: Vec::new(),
                defs: vec![method],
            },
        );
        let ends = f.finish();
        let index = ForeignIndex::build(&class);
        let ctx = DiagnosticContext::new("A.java", "", &index, &ends);
        let diag = ForeignDiagnostic::error(
            "compiler.err.illegal.combination.of.modifiers",
            "illegal combination of modifiers: public and private",
        )
        .with_tree(method_id);
        assert_eq!(
            classify(&diag, &ctx, &EnglishHeuristics),
            ProblemId::ILLEGAL_VISIBILITY_MODIFIER_COMBINATION_FOR_METHOD
        );
    }
}
