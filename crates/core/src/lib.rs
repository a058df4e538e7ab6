pub mod error;
pub mod logging;
pub mod options;

pub mod bindings;
pub mod comments;
pub mod convert;
pub mod diagnostics;
pub mod oracle;
pub mod pipeline;
pub mod reconcile;
pub mod scanner;

pub use bindings::DeclarationBindings;
pub use convert::{ConvertedUnit, convert_compilation_unit};
pub use diagnostics::{DiagnosticContext, DiagnosticConverter};
pub use error::{ConversionError, Result};
pub use options::CompilerOptions;
pub use oracle::{AstMatcher, OracleDivergence, RangeViolation, check_range_invariants, compare, compare_units};
pub use pipeline::{Cancellation, CompilationUnitResolver, SourceUnit};
