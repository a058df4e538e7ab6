//! Diagnostics as the foreign front end reports them: a dotted code, a kind,
//! offsets, structured arguments and an optional position tree.

use crate::tree::{NOPOS, TreeId};
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Error,
    Warning,
    MandatoryWarning,
    Note,
    Other,
}

/// Kind keyword carried as a diagnostic argument ("kindname.class", ...).
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindName {
    Class,
    Interface,
    Enum,
    Record,
    Method,
    Constructor,
    Var,
    Package,
    Other,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Class { is_interface: bool },
    Method { is_constructor: bool },
    Var,
    Package,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SymbolArg {
    pub kind: SymbolKind,
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TypeArg {
    pub name: String,
    pub is_array: bool,
    pub is_void: bool,
}

#[derive(Serialize, Debug, Clone)]
pub enum DiagnosticArg {
    Text(String),
    KindName(KindName),
    Symbol(SymbolArg),
    Type(TypeArg),
    Diagnostic(Box<ForeignDiagnostic>),
}

impl fmt::Display for DiagnosticArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticArg::Text(text) => f.write_str(text),
            DiagnosticArg::KindName(kind) => {
                let text = match kind {
                    KindName::Class => "class",
                    KindName::Interface => "interface",
                    KindName::Enum => "enum",
                    KindName::Record => "record",
                    KindName::Method => "method",
                    KindName::Constructor => "constructor",
                    KindName::Var => "variable",
                    KindName::Package => "package",
                    KindName::Other => "kindname",
                };
                f.write_str(text)
            }
            DiagnosticArg::Symbol(symbol) => f.write_str(&symbol.name),
            DiagnosticArg::Type(ty) => f.write_str(&ty.name),
            DiagnosticArg::Diagnostic(diagnostic) => f.write_str(&diagnostic.message),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ForeignDiagnostic {
    pub code: String,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Preferred position.
    pub position: i32,
    pub start: i32,
    pub end: i32,
    /// 1-based.
    pub line: i32,
    /// 1-based.
    pub column: i32,
    pub args: Vec<DiagnosticArg>,
    pub tree: Option<TreeId>,
    pub multiline: bool,
    pub subdiagnostics: Vec<ForeignDiagnostic>,
}

impl ForeignDiagnostic {
    pub fn new(kind: DiagnosticKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            kind,
            message: message.into(),
            position: NOPOS,
            start: NOPOS,
            end: NOPOS,
            line: 0,
            column: 0,
            args: Vec::new(),
            tree: None,
            multiline: false,
            subdiagnostics: Vec::new(),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, code, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, code, message)
    }

    pub fn at(mut self, start: i32, position: i32, end: i32) -> Self {
        self.start = start;
        self.position = position;
        self.end = end;
        self
    }

    pub fn on_line(mut self, line: i32, column: i32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn with_arg(mut self, arg: DiagnosticArg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_tree(mut self, tree: TreeId) -> Self {
        self.tree = Some(tree);
        self
    }

    pub fn with_subdiagnostic(mut self, sub: ForeignDiagnostic) -> Self {
        self.subdiagnostics.push(sub);
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn kind_name(&self) -> Option<KindName> {
        self.args.iter().find_map(|arg| match arg {
            DiagnosticArg::KindName(kind) => Some(*kind),
            _ => None,
        })
    }

    /// First argument that is itself a diagnostic.
    pub fn nested(&self) -> Option<&ForeignDiagnostic> {
        self.args.iter().find_map(|arg| match arg {
            DiagnosticArg::Diagnostic(d) => Some(d.as_ref()),
            _ => None,
        })
    }

    /// Innermost nested diagnostic, following the first diagnostic argument.
    pub fn root_cause(&self) -> Option<&ForeignDiagnostic> {
        let mut cause = self.nested()?;
        while let Some(next) = cause.nested() {
            cause = next;
        }
        Some(cause)
    }
}

impl fmt::Display for ForeignDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {} ({})", self.line, self.column, self.message, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_follows_nested_arguments() {
        let inner = ForeignDiagnostic::error("compiler.misc.arg.length.mismatch", "length");
        let middle = ForeignDiagnostic::error("compiler.misc.no.conforming.assignment.exists", "x")
            .with_arg(DiagnosticArg::Diagnostic(Box::new(inner)));
        let outer = ForeignDiagnostic::error("compiler.err.cant.apply.symbol", "y")
            .with_arg(DiagnosticArg::KindName(KindName::Constructor))
            .with_arg(DiagnosticArg::Diagnostic(Box::new(middle)));

        assert_eq!(outer.kind_name(), Some(KindName::Constructor));
        assert_eq!(
            outer.root_cause().map(|d| d.code.as_str()),
            Some("compiler.misc.arg.length.mismatch")
        );
    }
}
