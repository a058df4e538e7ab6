use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Every node shape of the unified tree, with the scalar attributes each one carries.
/// Children live in the arena and are addressed through [`Prop`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum NodeKind {
    CompilationUnit,
    PackageDeclaration,
    ImportDeclaration { is_static: bool, on_demand: bool },

    TypeDeclaration { is_interface: bool },
    EnumDeclaration,
    RecordDeclaration,
    AnnotationTypeDeclaration,
    AnnotationTypeMemberDeclaration,
    EnumConstantDeclaration,
    FieldDeclaration,
    MethodDeclaration { is_constructor: bool, extra_dimensions: u32 },
    Initializer,
    AnonymousClassDeclaration,
    SingleVariableDeclaration { varargs: bool, extra_dimensions: u32 },
    VariableDeclarationFragment { extra_dimensions: u32 },
    TypeParameter,
    Modifier { keyword: ModifierKeyword },
    MarkerAnnotation,
    NormalAnnotation,
    SingleMemberAnnotation,
    MemberValuePair,
    Javadoc,

    Block,
    EmptyStatement,
    ExpressionStatement,
    VariableDeclarationStatement,
    TypeDeclarationStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ForStatement,
    EnhancedForStatement,
    ReturnStatement,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    YieldStatement,
    LabeledStatement,
    SwitchStatement,
    SwitchCase { switch_labeled_rule: bool, is_default: bool },
    SynchronizedStatement,
    TryStatement,
    CatchClause,
    AssertStatement,
    ConstructorInvocation,
    SuperConstructorInvocation,

    SimpleName { identifier: SmolStr },
    QualifiedName,
    ThisExpression,
    NumberLiteral { token: SmolStr },
    StringLiteral { escaped: String },
    TextBlock { escaped: String },
    CharacterLiteral { escaped: SmolStr },
    BooleanLiteral { value: bool },
    NullLiteral,
    TypeLiteral,
    FieldAccess,
    SuperFieldAccess,
    MethodInvocation,
    SuperMethodInvocation,
    ClassInstanceCreation,
    ArrayCreation,
    ArrayInitializer,
    ArrayAccess,
    InfixExpression { operator: Option<InfixOperator> },
    PrefixExpression { operator: PrefixOperator },
    PostfixExpression { operator: PostfixOperator },
    ParenthesizedExpression,
    Assignment { operator: AssignmentOperator },
    ConditionalExpression,
    CastExpression,
    InstanceofExpression,
    PatternInstanceofExpression,
    TypePattern,
    LambdaExpression { parentheses: bool },
    CreationReference,
    ExpressionMethodReference,
    SuperMethodReference,
    TypeMethodReference,
    SwitchExpression,
    VariableDeclarationExpression,

    PrimitiveType { code: PrimitiveCode },
    SimpleType,
    QualifiedType,
    ArrayType,
    Dimension,
    ParameterizedType,
    WildcardType { upper_bound: bool },
    UnionType,
    IntersectionType,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::CompilationUnit => "CompilationUnit",
            NodeKind::PackageDeclaration => "PackageDeclaration",
            NodeKind::ImportDeclaration { .. } => "ImportDeclaration",
            NodeKind::TypeDeclaration { .. } => "TypeDeclaration",
            NodeKind::EnumDeclaration => "EnumDeclaration",
            NodeKind::RecordDeclaration => "RecordDeclaration",
            NodeKind::AnnotationTypeDeclaration => "AnnotationTypeDeclaration",
            NodeKind::AnnotationTypeMemberDeclaration => "AnnotationTypeMemberDeclaration",
            NodeKind::EnumConstantDeclaration => "EnumConstantDeclaration",
            NodeKind::FieldDeclaration => "FieldDeclaration",
            NodeKind::MethodDeclaration { .. } => "MethodDeclaration",
            NodeKind::Initializer => "Initializer",
            NodeKind::AnonymousClassDeclaration => "AnonymousClassDeclaration",
            NodeKind::SingleVariableDeclaration { .. } => "SingleVariableDeclaration",
            NodeKind::VariableDeclarationFragment { .. } => "VariableDeclarationFragment",
            NodeKind::TypeParameter => "TypeParameter",
            NodeKind::Modifier { .. } => "Modifier",
            NodeKind::MarkerAnnotation => "MarkerAnnotation",
            NodeKind::NormalAnnotation => "NormalAnnotation",
            NodeKind::SingleMemberAnnotation => "SingleMemberAnnotation",
            NodeKind::MemberValuePair => "MemberValuePair",
            NodeKind::Javadoc => "Javadoc",
            NodeKind::Block => "Block",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::VariableDeclarationStatement => "VariableDeclarationStatement",
            NodeKind::TypeDeclarationStatement => "TypeDeclarationStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::DoStatement => "DoStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::EnhancedForStatement => "EnhancedForStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::ThrowStatement => "ThrowStatement",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::YieldStatement => "YieldStatement",
            NodeKind::LabeledStatement => "LabeledStatement",
            NodeKind::SwitchStatement => "SwitchStatement",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::SynchronizedStatement => "SynchronizedStatement",
            NodeKind::TryStatement => "TryStatement",
            NodeKind::CatchClause => "CatchClause",
            NodeKind::AssertStatement => "AssertStatement",
            NodeKind::ConstructorInvocation => "ConstructorInvocation",
            NodeKind::SuperConstructorInvocation => "SuperConstructorInvocation",
            NodeKind::SimpleName { .. } => "SimpleName",
            NodeKind::QualifiedName => "QualifiedName",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::NumberLiteral { .. } => "NumberLiteral",
            NodeKind::StringLiteral { .. } => "StringLiteral",
            NodeKind::TextBlock { .. } => "TextBlock",
            NodeKind::CharacterLiteral { .. } => "CharacterLiteral",
            NodeKind::BooleanLiteral { .. } => "BooleanLiteral",
            NodeKind::NullLiteral => "NullLiteral",
            NodeKind::TypeLiteral => "TypeLiteral",
            NodeKind::FieldAccess => "FieldAccess",
            NodeKind::SuperFieldAccess => "SuperFieldAccess",
            NodeKind::MethodInvocation => "MethodInvocation",
            NodeKind::SuperMethodInvocation => "SuperMethodInvocation",
            NodeKind::ClassInstanceCreation => "ClassInstanceCreation",
            NodeKind::ArrayCreation => "ArrayCreation",
            NodeKind::ArrayInitializer => "ArrayInitializer",
            NodeKind::ArrayAccess => "ArrayAccess",
            NodeKind::InfixExpression { .. } => "InfixExpression",
            NodeKind::PrefixExpression { .. } => "PrefixExpression",
            NodeKind::PostfixExpression { .. } => "PostfixExpression",
            NodeKind::ParenthesizedExpression => "ParenthesizedExpression",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::ConditionalExpression => "ConditionalExpression",
            NodeKind::CastExpression => "CastExpression",
            NodeKind::InstanceofExpression => "InstanceofExpression",
            NodeKind::PatternInstanceofExpression => "PatternInstanceofExpression",
            NodeKind::TypePattern => "TypePattern",
            NodeKind::LambdaExpression { .. } => "LambdaExpression",
            NodeKind::CreationReference => "CreationReference",
            NodeKind::ExpressionMethodReference => "ExpressionMethodReference",
            NodeKind::SuperMethodReference => "SuperMethodReference",
            NodeKind::TypeMethodReference => "TypeMethodReference",
            NodeKind::SwitchExpression => "SwitchExpression",
            NodeKind::VariableDeclarationExpression => "VariableDeclarationExpression",
            NodeKind::PrimitiveType { .. } => "PrimitiveType",
            NodeKind::SimpleType => "SimpleType",
            NodeKind::QualifiedType => "QualifiedType",
            NodeKind::ArrayType => "ArrayType",
            NodeKind::Dimension => "Dimension",
            NodeKind::ParameterizedType => "ParameterizedType",
            NodeKind::WildcardType { .. } => "WildcardType",
            NodeKind::UnionType => "UnionType",
            NodeKind::IntersectionType => "IntersectionType",
        }
    }

    /// Declarations that may own a doc comment.
    pub fn is_body_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::TypeDeclaration { .. }
                | NodeKind::EnumDeclaration
                | NodeKind::RecordDeclaration
                | NodeKind::AnnotationTypeDeclaration
                | NodeKind::AnnotationTypeMemberDeclaration
                | NodeKind::EnumConstantDeclaration
                | NodeKind::FieldDeclaration
                | NodeKind::MethodDeclaration { .. }
                | NodeKind::Initializer
        )
    }

    pub fn is_type_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::TypeDeclaration { .. }
                | NodeKind::EnumDeclaration
                | NodeKind::RecordDeclaration
                | NodeKind::AnnotationTypeDeclaration
        )
    }

    pub fn is_name(&self) -> bool {
        matches!(self, NodeKind::SimpleName { .. } | NodeKind::QualifiedName)
    }

    pub fn is_annotation(&self) -> bool {
        matches!(
            self,
            NodeKind::MarkerAnnotation | NodeKind::NormalAnnotation | NodeKind::SingleMemberAnnotation
        )
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::PrimitiveType { .. }
                | NodeKind::SimpleType
                | NodeKind::QualifiedType
                | NodeKind::ArrayType
                | NodeKind::ParameterizedType
                | NodeKind::WildcardType { .. }
                | NodeKind::UnionType
                | NodeKind::IntersectionType
        )
    }

    pub fn same_variant(&self, other: &NodeKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Structural property through which a parent owns a child.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    Javadoc,
    Modifiers,
    Annotations,
    Name,
    Package,
    Imports,
    Types,
    TypeParameters,
    SuperclassType,
    SuperInterfaceTypes,
    PermittedTypes,
    BodyDeclarations,
    EnumConstants,
    RecordComponents,
    Type,
    Fragments,
    ReturnType,
    Parameters,
    ThrownExceptionTypes,
    Body,
    Initializer,
    Expression,
    Statements,
    ThenStatement,
    ElseStatement,
    Initializers,
    Updaters,
    Parameter,
    Label,
    Expressions,
    Resources,
    CatchClauses,
    Finally,
    Exception,
    Message,
    TypeArguments,
    Arguments,
    Qualifier,
    AnonymousClassDeclaration,
    Dimensions,
    LeftOperand,
    RightOperand,
    ExtendedOperands,
    Operand,
    LeftHandSide,
    RightHandSide,
    ThenExpression,
    ElseExpression,
    Pattern,
    TypeName,
    Values,
    Value,
    Default,
    ElementType,
    Bound,
    Bounds,
    Array,
    Index,
    Declaration,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOperator {
    Times,
    Divide,
    Remainder,
    Plus,
    Minus,
    LeftShift,
    RightShiftSigned,
    RightShiftUnsigned,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    Equals,
    NotEquals,
    Xor,
    And,
    Or,
    ConditionalAnd,
    ConditionalOr,
}

impl InfixOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfixOperator::Times => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Remainder => "%",
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::LeftShift => "<<",
            InfixOperator::RightShiftSigned => ">>",
            InfixOperator::RightShiftUnsigned => ">>>",
            InfixOperator::Less => "<",
            InfixOperator::Greater => ">",
            InfixOperator::LessEquals => "<=",
            InfixOperator::GreaterEquals => ">=",
            InfixOperator::Equals => "==",
            InfixOperator::NotEquals => "!=",
            InfixOperator::Xor => "^",
            InfixOperator::And => "&",
            InfixOperator::Or => "|",
            InfixOperator::ConditionalAnd => "&&",
            InfixOperator::ConditionalOr => "||",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOperator {
    Increment,
    Decrement,
    Plus,
    Minus,
    Complement,
    Not,
}

impl PrefixOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixOperator::Increment => "++",
            PrefixOperator::Decrement => "--",
            PrefixOperator::Plus => "+",
            PrefixOperator::Minus => "-",
            PrefixOperator::Complement => "~",
            PrefixOperator::Not => "!",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOperator {
    Increment,
    Decrement,
}

impl PostfixOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostfixOperator::Increment => "++",
            PostfixOperator::Decrement => "--",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    Assign,
    PlusAssign,
    MinusAssign,
    TimesAssign,
    DivideAssign,
    RemainderAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    LeftShiftAssign,
    RightShiftSignedAssign,
    RightShiftUnsignedAssign,
}

impl AssignmentOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::PlusAssign => "+=",
            AssignmentOperator::MinusAssign => "-=",
            AssignmentOperator::TimesAssign => "*=",
            AssignmentOperator::DivideAssign => "/=",
            AssignmentOperator::RemainderAssign => "%=",
            AssignmentOperator::BitAndAssign => "&=",
            AssignmentOperator::BitOrAssign => "|=",
            AssignmentOperator::BitXorAssign => "^=",
            AssignmentOperator::LeftShiftAssign => "<<=",
            AssignmentOperator::RightShiftSignedAssign => ">>=",
            AssignmentOperator::RightShiftUnsignedAssign => ">>>=",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKeyword {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,
    Sealed,
    NonSealed,
}

impl ModifierKeyword {
    pub const ALL: [ModifierKeyword; 14] = [
        ModifierKeyword::Public,
        ModifierKeyword::Protected,
        ModifierKeyword::Private,
        ModifierKeyword::Abstract,
        ModifierKeyword::Default,
        ModifierKeyword::Static,
        ModifierKeyword::Sealed,
        ModifierKeyword::NonSealed,
        ModifierKeyword::Final,
        ModifierKeyword::Transient,
        ModifierKeyword::Volatile,
        ModifierKeyword::Synchronized,
        ModifierKeyword::Native,
        ModifierKeyword::Strictfp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKeyword::Public => "public",
            ModifierKeyword::Protected => "protected",
            ModifierKeyword::Private => "private",
            ModifierKeyword::Static => "static",
            ModifierKeyword::Abstract => "abstract",
            ModifierKeyword::Final => "final",
            ModifierKeyword::Native => "native",
            ModifierKeyword::Synchronized => "synchronized",
            ModifierKeyword::Transient => "transient",
            ModifierKeyword::Volatile => "volatile",
            ModifierKeyword::Strictfp => "strictfp",
            ModifierKeyword::Default => "default",
            ModifierKeyword::Sealed => "sealed",
            ModifierKeyword::NonSealed => "non-sealed",
        }
    }

    /// Bit used by the flag-word representation of modifiers.
    pub fn flag(&self) -> u32 {
        match self {
            ModifierKeyword::Public => 0x0001,
            ModifierKeyword::Private => 0x0002,
            ModifierKeyword::Protected => 0x0004,
            ModifierKeyword::Static => 0x0008,
            ModifierKeyword::Final => 0x0010,
            ModifierKeyword::Synchronized => 0x0020,
            ModifierKeyword::Volatile => 0x0040,
            ModifierKeyword::Transient => 0x0080,
            ModifierKeyword::Native => 0x0100,
            ModifierKeyword::Sealed => 0x0200,
            ModifierKeyword::Abstract => 0x0400,
            ModifierKeyword::Strictfp => 0x0800,
            ModifierKeyword::NonSealed => 0x1000,
            ModifierKeyword::Default => 0x10000,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveCode {
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Void,
}

impl PrimitiveCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveCode::Byte => "byte",
            PrimitiveCode::Short => "short",
            PrimitiveCode::Char => "char",
            PrimitiveCode::Int => "int",
            PrimitiveCode::Long => "long",
            PrimitiveCode::Float => "float",
            PrimitiveCode::Double => "double",
            PrimitiveCode::Boolean => "boolean",
            PrimitiveCode::Void => "void",
        }
    }
}
