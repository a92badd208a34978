pub mod auth;
pub mod error;

pub use auth::AdminAuth;
pub use error::{RegistryError, RegistryResult};
