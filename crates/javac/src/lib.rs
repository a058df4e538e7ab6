pub mod diag;
pub mod error;
pub mod frontend;
pub mod tree;

pub use diag::{
    DiagnosticArg, DiagnosticKind, ForeignDiagnostic, KindName, SymbolArg, SymbolKind, TypeArg,
};
pub use error::{FrontendError, Result};
pub use frontend::{JavacFrontend, ParsedForeignUnit};
pub use tree::{
    BoundKind, ClassKind, EndPosTable, ForeignIndex, JcKind, JcTree, Modifiers, NOPOS,
    ReferenceMode, Tag, TreeFactory, TreeId, TreePath, TypeTag, flags,
};
