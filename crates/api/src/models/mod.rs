pub mod ast;
pub mod binding;
pub mod comment;
pub mod kind;
pub mod problem;
pub mod range;

pub use ast::*;
pub use binding::*;
pub use comment::*;
pub use kind::*;
pub use problem::*;
pub use range::*;
