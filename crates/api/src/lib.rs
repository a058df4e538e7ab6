pub mod error;
pub mod legacy;
pub mod level;
pub mod models;
pub mod render;
pub mod unit;

pub use error::{ApiError, ApiResult};
pub use legacy::LegacyView;
pub use level::ApiLevel;
pub use models::*;
pub use render::render;
pub use unit::{CompilationUnit, UnitSnapshot};
