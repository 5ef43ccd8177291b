pub mod identity;
pub mod loader;
pub mod normalize;

pub use identity::IdentityResolver;
pub use loader::{BatchLoader, LoadReport};
pub use normalize::DocumentNormalizer;
