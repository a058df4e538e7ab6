//! javac-shaped syntax trees.
//!
//! Nodes carry a start offset and a preferred position; end offsets live in a
//! separate [`EndPosTable`]. Declaration names are plain strings without
//! positions, and modifiers are a flag word plus annotations.

mod factory;
mod path;

pub use factory::TreeFactory;
pub use path::{ForeignIndex, TreePath};

use serde::Serialize;
use std::collections::HashMap;

pub const NOPOS: i32 = -1;

/// javac modifier and symbol flags.
pub mod flags {
    pub const PUBLIC: u64 = 1;
    pub const PRIVATE: u64 = 1 << 1;
    pub const PROTECTED: u64 = 1 << 2;
    pub const STATIC: u64 = 1 << 3;
    pub const FINAL: u64 = 1 << 4;
    pub const SYNCHRONIZED: u64 = 1 << 5;
    pub const VOLATILE: u64 = 1 << 6;
    pub const TRANSIENT: u64 = 1 << 7;
    pub const NATIVE: u64 = 1 << 8;
    pub const INTERFACE: u64 = 1 << 9;
    pub const ABSTRACT: u64 = 1 << 10;
    pub const STRICTFP: u64 = 1 << 11;
    pub const ANNOTATION: u64 = 1 << 13;
    pub const ENUM: u64 = 1 << 14;
    pub const VARARGS: u64 = 1 << 34;
    pub const GENERATED_CONSTR: u64 = 1 << 36;
    pub const DEFAULT: u64 = 1 << 43;
    pub const SEALED: u64 = 1 << 48;
    pub const NON_SEALED: u64 = 1 << 49;
    pub const COMPACT_RECORD_CONSTRUCTOR: u64 = 1 << 51;
    pub const RECORD: u64 = 1 << 61;

    /// Flags a programmer can spell as a modifier keyword, in source order preference.
    pub const KEYWORDS: [(u64, &str); 14] = [
        (PUBLIC, "public"),
        (PROTECTED, "protected"),
        (PRIVATE, "private"),
        (ABSTRACT, "abstract"),
        (DEFAULT, "default"),
        (STATIC, "static"),
        (SEALED, "sealed"),
        (NON_SEALED, "non-sealed"),
        (FINAL, "final"),
        (TRANSIENT, "transient"),
        (VOLATILE, "volatile"),
        (SYNCHRONIZED, "synchronized"),
        (NATIVE, "native"),
        (STRICTFP, "strictfp"),
    ];

    pub fn from_keyword(keyword: &str) -> Option<u64> {
        KEYWORDS
            .iter()
            .find(|(_, text)| *text == keyword)
            .map(|(flag, _)| *flag)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub u32);

/// End offsets keyed by tree id, kept apart from the nodes as javac does.
#[derive(Serialize, Debug, Clone, Default)]
pub struct EndPosTable {
    ends: HashMap<TreeId, i32>,
}

impl EndPosTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, id: TreeId, end: i32) {
        if end >= 0 {
            self.ends.insert(id, end);
        }
    }

    pub fn end_pos(&self, id: TreeId) -> i32 {
        self.ends.get(&id).copied().unwrap_or(NOPOS)
    }

    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }
}

/// Syntactic kind of a tree, including operator tags for unary, binary and
/// compound-assignment nodes.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    TopLevel,
    PackageDef,
    Import,
    ClassDef,
    MethodDef,
    VarDef,
    Skip,
    Block,
    DoLoop,
    WhileLoop,
    ForLoop,
    ForeachLoop,
    Labelled,
    Switch,
    Case,
    SwitchExpression,
    Synchronized,
    Try,
    Catch,
    Conditional,
    If,
    Exec,
    Break,
    Yield,
    Continue,
    Return,
    Throw,
    Assert,
    Apply,
    NewClass,
    NewArray,
    Lambda,
    Parens,
    Assign,
    TypeCast,
    TypeTest,
    BindingPattern,
    RecordPattern,
    AnyPattern,
    Indexed,
    Select,
    Reference,
    Ident,
    Literal,
    TypeIdent,
    TypeArray,
    TypeApply,
    TypeUnion,
    TypeIntersection,
    TypeParameter,
    Wildcard,
    Annotation,
    AnnotatedType,
    Erroneous,

    Pos,
    Neg,
    Not,
    Compl,
    PreInc,
    PreDec,
    PostInc,
    PostDec,

    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Sl,
    Sr,
    Usr,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,

    BitOrAsg,
    BitXorAsg,
    BitAndAsg,
    SlAsg,
    SrAsg,
    UsrAsg,
    PlusAsg,
    MinusAsg,
    MulAsg,
    DivAsg,
    ModAsg,
}

impl Tag {
    pub const BINARY_OPERATORS: [Tag; 19] = [
        Tag::Or,
        Tag::And,
        Tag::BitOr,
        Tag::BitXor,
        Tag::BitAnd,
        Tag::Eq,
        Tag::Ne,
        Tag::Lt,
        Tag::Gt,
        Tag::Le,
        Tag::Ge,
        Tag::Sl,
        Tag::Sr,
        Tag::Usr,
        Tag::Plus,
        Tag::Minus,
        Tag::Mul,
        Tag::Div,
        Tag::Mod,
    ];

    pub fn binary_from_symbol(symbol: &str) -> Option<Tag> {
        Some(match symbol {
            "||" => Tag::Or,
            "&&" => Tag::And,
            "|" => Tag::BitOr,
            "^" => Tag::BitXor,
            "&" => Tag::BitAnd,
            "==" => Tag::Eq,
            "!=" => Tag::Ne,
            "<" => Tag::Lt,
            ">" => Tag::Gt,
            "<=" => Tag::Le,
            ">=" => Tag::Ge,
            "<<" => Tag::Sl,
            ">>" => Tag::Sr,
            ">>>" => Tag::Usr,
            "+" => Tag::Plus,
            "-" => Tag::Minus,
            "*" => Tag::Mul,
            "/" => Tag::Div,
            "%" => Tag::Mod,
            _ => return None,
        })
    }

    pub fn assign_op_from_symbol(symbol: &str) -> Option<Tag> {
        Some(match symbol {
            "|=" => Tag::BitOrAsg,
            "^=" => Tag::BitXorAsg,
            "&=" => Tag::BitAndAsg,
            "<<=" => Tag::SlAsg,
            ">>=" => Tag::SrAsg,
            ">>>=" => Tag::UsrAsg,
            "+=" => Tag::PlusAsg,
            "-=" => Tag::MinusAsg,
            "*=" => Tag::MulAsg,
            "/=" => Tag::DivAsg,
            "%=" => Tag::ModAsg,
            _ => return None,
        })
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Void,
    /// Reference literal (strings and text blocks).
    Class,
    /// The null literal.
    Bot,
}

impl TypeTag {
    pub fn from_keyword(keyword: &str) -> Option<TypeTag> {
        Some(match keyword {
            "byte" => TypeTag::Byte,
            "char" => TypeTag::Char,
            "short" => TypeTag::Short,
            "int" => TypeTag::Int,
            "long" => TypeTag::Long,
            "float" => TypeTag::Float,
            "double" => TypeTag::Double,
            "boolean" => TypeTag::Boolean,
            "void" => TypeTag::Void,
            _ => return None,
        })
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    AnnotationType,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Unbound,
    Extends,
    Super,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceMode {
    Invoke,
    New,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct Modifiers {
    pub flags: u64,
    pub annotations: Vec<JcTree>,
    pub start: i32,
    pub end: i32,
}

impl Modifiers {
    pub fn empty() -> Self {
        Self {
            flags: 0,
            annotations: Vec::new(),
            start: NOPOS,
            end: NOPOS,
        }
    }

    pub fn has(&self, flag: u64) -> bool {
        self.flags & flag != 0
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct JcTree {
    pub id: TreeId,
    pub start: i32,
    pub pos: i32,
    pub kind: JcKind,
}

type Tree = Box<JcTree>;

#[derive(Serialize, Debug, Clone)]
pub enum JcKind {
    CompilationUnit {
        package: Option<Tree>,
        imports: Vec<JcTree>,
        defs: Vec<JcTree>,
    },
    Package {
        annotations: Vec<JcTree>,
        pid: Tree,
    },
    Import {
        qualid: Tree,
        is_static: bool,
    },
    ClassDef {
        mods: Modifiers,
        name: String,
        class_kind: ClassKind,
        typarams: Vec<JcTree>,
        extending: Option<Tree>,
        implementing: Vec<JcTree>,
        permitting: Vec<JcTree>,
        defs: Vec<JcTree>,
    },
    MethodDef {
        mods: Modifiers,
        name: String,
        restype: Option<Tree>,
        typarams: Vec<JcTree>,
        params: Vec<JcTree>,
        dims: u32,
        thrown: Vec<JcTree>,
        body: Option<Tree>,
        default_value: Option<Tree>,
    },
    VarDef {
        mods: Modifiers,
        name: String,
        vartype: Option<Tree>,
        dims: u32,
        init: Option<Tree>,
    },
    Skip,
    Block {
        is_static: bool,
        stats: Vec<JcTree>,
    },
    DoLoop {
        body: Tree,
        cond: Tree,
    },
    WhileLoop {
        cond: Tree,
        body: Tree,
    },
    ForLoop {
        init: Vec<JcTree>,
        cond: Option<Tree>,
        step: Vec<JcTree>,
        body: Tree,
    },
    ForeachLoop {
        var: Tree,
        expr: Tree,
        body: Tree,
    },
    Labelled {
        label: String,
        body: Tree,
    },
    Switch {
        selector: Tree,
        cases: Vec<JcTree>,
    },
    SwitchExpression {
        selector: Tree,
        cases: Vec<JcTree>,
    },
    Case {
        labels: Vec<JcTree>,
        is_default: bool,
        rule: bool,
        stats: Vec<JcTree>,
    },
    Synchronized {
        lock: Tree,
        body: Tree,
    },
    Try {
        resources: Vec<JcTree>,
        body: Tree,
        catchers: Vec<JcTree>,
        finalizer: Option<Tree>,
    },
    Catch {
        param: Tree,
        body: Tree,
    },
    Conditional {
        cond: Tree,
        truepart: Tree,
        falsepart: Tree,
    },
    If {
        cond: Tree,
        thenpart: Tree,
        elsepart: Option<Tree>,
    },
    Exec {
        expr: Tree,
    },
    Break {
        label: Option<String>,
    },
    Yield {
        value: Tree,
    },
    Continue {
        label: Option<String>,
    },
    Return {
        expr: Option<Tree>,
    },
    Throw {
        expr: Tree,
    },
    Assert {
        cond: Tree,
        detail: Option<Tree>,
    },
    Apply {
        typeargs: Vec<JcTree>,
        meth: Tree,
        args: Vec<JcTree>,
    },
    NewClass {
        encl: Option<Tree>,
        typeargs: Vec<JcTree>,
        clazz: Tree,
        args: Vec<JcTree>,
        def: Option<Tree>,
    },
    NewArray {
        elemtype: Option<Tree>,
        dims: Vec<JcTree>,
        extra_dims: u32,
        elems: Option<Vec<JcTree>>,
    },
    Lambda {
        params: Vec<JcTree>,
        body: Tree,
        parenthesized: bool,
    },
    Parens {
        expr: Tree,
    },
    Assign {
        lhs: Tree,
        rhs: Tree,
    },
    AssignOp {
        op: Tag,
        lhs: Tree,
        rhs: Tree,
    },
    Unary {
        op: Tag,
        arg: Tree,
    },
    Binary {
        op: Tag,
        lhs: Tree,
        rhs: Tree,
    },
    TypeCast {
        clazz: Tree,
        expr: Tree,
    },
    InstanceOf {
        expr: Tree,
        pattern: Tree,
    },
    BindingPattern {
        var: Tree,
    },
    RecordPattern {
        deconstructor: Tree,
        nested: Vec<JcTree>,
    },
    AnyPattern,
    Indexed {
        indexed: Tree,
        index: Tree,
    },
    Select {
        selected: Tree,
        name: String,
    },
    Reference {
        mode: ReferenceMode,
        name: String,
        expr: Tree,
        typeargs: Vec<JcTree>,
    },
    Ident {
        name: String,
    },
    Literal {
        typetag: TypeTag,
        value: String,
    },
    TypeIdent {
        typetag: TypeTag,
    },
    TypeArray {
        elemtype: Tree,
    },
    TypeApply {
        clazz: Tree,
        arguments: Vec<JcTree>,
    },
    TypeUnion {
        alternatives: Vec<JcTree>,
    },
    TypeIntersection {
        bounds: Vec<JcTree>,
    },
    TypeParameter {
        name: String,
        bounds: Vec<JcTree>,
        annotations: Vec<JcTree>,
    },
    Wildcard {
        kind: BoundKind,
        inner: Option<Tree>,
    },
    Annotation {
        annotation_type: Tree,
        args: Vec<JcTree>,
    },
    AnnotatedType {
        annotations: Vec<JcTree>,
        underlying: Tree,
    },
    Erroneous {
        errs: Vec<JcTree>,
    },
}

impl JcTree {
    pub fn tag(&self) -> Tag {
        match &self.kind {
            JcKind::CompilationUnit { .. } => Tag::TopLevel,
            JcKind::Package { .. } => Tag::PackageDef,
            JcKind::Import { .. } => Tag::Import,
            JcKind::ClassDef { .. } => Tag::ClassDef,
            JcKind::MethodDef { .. } => Tag::MethodDef,
            JcKind::VarDef { .. } => Tag::VarDef,
            JcKind::Skip => Tag::Skip,
            JcKind::Block { .. } => Tag::Block,
            JcKind::DoLoop { .. } => Tag::DoLoop,
            JcKind::WhileLoop { .. } => Tag::WhileLoop,
            JcKind::ForLoop { .. } => Tag::ForLoop,
            JcKind::ForeachLoop { .. } => Tag::ForeachLoop,
            JcKind::Labelled { .. } => Tag::Labelled,
            JcKind::Switch { .. } => Tag::Switch,
            JcKind::SwitchExpression { .. } => Tag::SwitchExpression,
            JcKind::Case { .. } => Tag::Case,
            JcKind::Synchronized { .. } => Tag::Synchronized,
            JcKind::Try { .. } => Tag::Try,
            JcKind::Catch { .. } => Tag::Catch,
            JcKind::Conditional { .. } => Tag::Conditional,
            JcKind::If { .. } => Tag::If,
            JcKind::Exec { .. } => Tag::Exec,
            JcKind::Break { .. } => Tag::Break,
            JcKind::Yield { .. } => Tag::Yield,
            JcKind::Continue { .. } => Tag::Continue,
            JcKind::Return { .. } => Tag::Return,
            JcKind::Throw { .. } => Tag::Throw,
            JcKind::Assert { .. } => Tag::Assert,
            JcKind::Apply { .. } => Tag::Apply,
            JcKind::NewClass { .. } => Tag::NewClass,
            JcKind::NewArray { .. } => Tag::NewArray,
            JcKind::Lambda { .. } => Tag::Lambda,
            JcKind::Parens { .. } => Tag::Parens,
            JcKind::Assign { .. } => Tag::Assign,
            JcKind::AssignOp { op, .. } => *op,
            JcKind::Unary { op, .. } => *op,
            JcKind::Binary { op, .. } => *op,
            JcKind::TypeCast { .. } => Tag::TypeCast,
            JcKind::InstanceOf { .. } => Tag::TypeTest,
            JcKind::BindingPattern { .. } => Tag::BindingPattern,
            JcKind::RecordPattern { .. } => Tag::RecordPattern,
            JcKind::AnyPattern => Tag::AnyPattern,
            JcKind::Indexed { .. } => Tag::Indexed,
            JcKind::Select { .. } => Tag::Select,
            JcKind::Reference { .. } => Tag::Reference,
            JcKind::Ident { .. } => Tag::Ident,
            JcKind::Literal { .. } => Tag::Literal,
            JcKind::TypeIdent { .. } => Tag::TypeIdent,
            JcKind::TypeArray { .. } => Tag::TypeArray,
            JcKind::TypeApply { .. } => Tag::TypeApply,
            JcKind::TypeUnion { .. } => Tag::TypeUnion,
            JcKind::TypeIntersection { .. } => Tag::TypeIntersection,
            JcKind::TypeParameter { .. } => Tag::TypeParameter,
            JcKind::Wildcard { .. } => Tag::Wildcard,
            JcKind::Annotation { .. } => Tag::Annotation,
            JcKind::AnnotatedType { .. } => Tag::AnnotatedType,
            JcKind::Erroneous { .. } => Tag::Erroneous,
        }
    }

    pub fn end_pos(&self, table: &EndPosTable) -> i32 {
        table.end_pos(self.id)
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self.kind,
            JcKind::Conditional { .. }
                | JcKind::Apply { .. }
                | JcKind::NewClass { .. }
                | JcKind::NewArray { .. }
                | JcKind::Lambda { .. }
                | JcKind::Parens { .. }
                | JcKind::Assign { .. }
                | JcKind::AssignOp { .. }
                | JcKind::Unary { .. }
                | JcKind::Binary { .. }
                | JcKind::TypeCast { .. }
                | JcKind::InstanceOf { .. }
                | JcKind::Indexed { .. }
                | JcKind::Select { .. }
                | JcKind::Reference { .. }
                | JcKind::Ident { .. }
                | JcKind::Literal { .. }
                | JcKind::SwitchExpression { .. }
        )
    }

    /// Name of an identifier node.
    pub fn ident_name(&self) -> Option<&str> {
        match &self.kind {
            JcKind::Ident { name } => Some(name),
            _ => None,
        }
    }

    /// Direct subtrees, in source order.
    pub fn children(&self) -> Vec<&JcTree> {
        fn push_mods<'a>(out: &mut Vec<&'a JcTree>, mods: &'a Modifiers) {
            out.extend(mods.annotations.iter());
        }
        let mut out: Vec<&JcTree> = Vec::new();
        match &self.kind {
            JcKind::CompilationUnit {
                package,
                imports,
                defs,
            } => {
                out.extend(package.as_deref());
                out.extend(imports.iter());
                out.extend(defs.iter());
            }
            JcKind::Package { annotations, pid } => {
                out.extend(annotations.iter());
                out.push(pid);
            }
            JcKind::Import { qualid, .. } => out.push(qualid),
            JcKind::ClassDef {
                mods,
                typarams,
                extending,
                implementing,
                permitting,
                defs,
                ..
            } => {
                push_mods(&mut out, mods);
                out.extend(typarams.iter());
                out.extend(extending.as_deref());
                out.extend(implementing.iter());
                out.extend(permitting.iter());
                out.extend(defs.iter());
            }
            JcKind::MethodDef {
                mods,
                restype,
                typarams,
                params,
                thrown,
                body,
                default_value,
                ..
            } => {
                push_mods(&mut out, mods);
                out.extend(typarams.iter());
                out.extend(restype.as_deref());
                out.extend(params.iter());
                out.extend(thrown.iter());
                out.extend(body.as_deref());
                out.extend(default_value.as_deref());
            }
            JcKind::VarDef {
                mods,
                vartype,
                init,
                ..
            } => {
                push_mods(&mut out, mods);
                out.extend(vartype.as_deref());
                out.extend(init.as_deref());
            }
            JcKind::Skip
            | JcKind::Break { .. }
            | JcKind::Continue { .. }
            | JcKind::AnyPattern
            | JcKind::Ident { .. }
            | JcKind::Literal { .. }
            | JcKind::TypeIdent { .. } => {}
            JcKind::Block { stats, .. } => out.extend(stats.iter()),
            JcKind::DoLoop { body, cond } => {
                out.push(body);
                out.push(cond);
            }
            JcKind::WhileLoop { cond, body } => {
                out.push(cond);
                out.push(body);
            }
            JcKind::ForLoop {
                init,
                cond,
                step,
                body,
            } => {
                out.extend(init.iter());
                out.extend(cond.as_deref());
                out.extend(step.iter());
                out.push(body);
            }
            JcKind::ForeachLoop { var, expr, body } => {
                out.push(var);
                out.push(expr);
                out.push(body);
            }
            JcKind::Labelled { body, .. } => out.push(body),
            JcKind::Switch { selector, cases } | JcKind::SwitchExpression { selector, cases } => {
                out.push(selector);
                out.extend(cases.iter());
            }
            JcKind::Case { labels, stats, .. } => {
                out.extend(labels.iter());
                out.extend(stats.iter());
            }
            JcKind::Synchronized { lock, body } => {
                out.push(lock);
                out.push(body);
            }
            JcKind::Try {
                resources,
                body,
                catchers,
                finalizer,
            } => {
                out.extend(resources.iter());
                out.push(body);
                out.extend(catchers.iter());
                out.extend(finalizer.as_deref());
            }
            JcKind::Catch { param, body } => {
                out.push(param);
                out.push(body);
            }
            JcKind::Conditional {
                cond,
                truepart,
                falsepart,
            } => {
                out.push(cond);
                out.push(truepart);
                out.push(falsepart);
            }
            JcKind::If {
                cond,
                thenpart,
                elsepart,
            } => {
                out.push(cond);
                out.push(thenpart);
                out.extend(elsepart.as_deref());
            }
            JcKind::Exec { expr } | JcKind::Throw { expr } | JcKind::Parens { expr } => out.push(expr),
            JcKind::Yield { value } => out.push(value),
            JcKind::Return { expr } => out.extend(expr.as_deref()),
            JcKind::Assert { cond, detail } => {
                out.push(cond);
                out.extend(detail.as_deref());
            }
            JcKind::Apply {
                typeargs,
                meth,
                args,
            } => {
                out.extend(typeargs.iter());
                out.push(meth);
                out.extend(args.iter());
            }
            JcKind::NewClass {
                encl,
                typeargs,
                clazz,
                args,
                def,
            } => {
                out.extend(encl.as_deref());
                out.extend(typeargs.iter());
                out.push(clazz);
                out.extend(args.iter());
                out.extend(def.as_deref());
            }
            JcKind::NewArray {
                elemtype,
                dims,
                elems,
                ..
            } => {
                out.extend(elemtype.as_deref());
                out.extend(dims.iter());
                if let Some(elems) = elems {
                    out.extend(elems.iter());
                }
            }
            JcKind::Lambda { params, body, .. } => {
                out.extend(params.iter());
                out.push(body);
            }
            JcKind::Assign { lhs, rhs }
            | JcKind::AssignOp { lhs, rhs, .. }
            | JcKind::Binary { lhs, rhs, .. } => {
                out.push(lhs);
                out.push(rhs);
            }
            JcKind::Unary { arg, .. } => out.push(arg),
            JcKind::TypeCast { clazz, expr } => {
                out.push(clazz);
                out.push(expr);
            }
            JcKind::InstanceOf { expr, pattern } => {
                out.push(expr);
                out.push(pattern);
            }
            JcKind::BindingPattern { var } => out.push(var),
            JcKind::RecordPattern {
                deconstructor,
                nested,
            } => {
                out.push(deconstructor);
                out.extend(nested.iter());
            }
            JcKind::Indexed { indexed, index } => {
                out.push(indexed);
                out.push(index);
            }
            JcKind::Select { selected, .. } => out.push(selected),
            JcKind::Reference { expr, typeargs, .. } => {
                out.push(expr);
                out.extend(typeargs.iter());
            }
            JcKind::TypeArray { elemtype } => out.push(elemtype),
            JcKind::TypeApply { clazz, arguments } => {
                out.push(clazz);
                out.extend(arguments.iter());
            }
            JcKind::TypeUnion { alternatives } => out.extend(alternatives.iter()),
            JcKind::TypeIntersection { bounds } => out.extend(bounds.iter()),
            JcKind::TypeParameter {
                bounds,
                annotations,
                ..
            } => {
                out.extend(annotations.iter());
                out.extend(bounds.iter());
            }
            JcKind::Wildcard { inner, .. } => out.extend(inner.as_deref()),
            JcKind::Annotation {
                annotation_type,
                args,
            } => {
                out.push(annotation_type);
                out.extend(args.iter());
            }
            JcKind::AnnotatedType {
                annotations,
                underlying,
            } => {
                out.extend(annotations.iter());
                out.push(underlying);
            }
            JcKind::Erroneous { errs } => out.extend(errs.iter()),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_symbols_cover_every_operator_tag() {
        let symbols = [
            "||", "&&", "|", "^", "&", "==", "!=", "<", ">", "<=", ">=", "<<", ">>", ">>>", "+",
            "-", "*", "/", "%",
        ];
        let tags: Vec<Tag> = symbols
            .iter()
            .filter_map(|s| Tag::binary_from_symbol(s))
            .collect();
        assert_eq!(tags, Tag::BINARY_OPERATORS.to_vec());
    }

    #[test]
    fn test_modifier_keyword_flags() {
        assert_eq!(flags::from_keyword("non-sealed"), Some(flags::NON_SEALED));
        assert_eq!(flags::from_keyword("static"), Some(flags::STATIC));
        assert_eq!(flags::from_keyword("class"), None);
    }
}
