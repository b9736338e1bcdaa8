//! Built-in compilation passes.

pub mod routing;
pub mod translation;

pub use routing::SquareLatticeRouting;
pub use translation::BasisTranslation;
