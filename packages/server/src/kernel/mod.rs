//! Infrastructure kernel: collaborator traits, their implementations, and
//! the dependency container domain actions run against.

pub mod deps;
pub mod email;
pub mod file_validation;
pub mod storage;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use email::{create_email_service, ConsoleEmailService, HttpEmailService};
pub use storage::{create_storage_service, FsStorageService};
pub use traits::{BaseEmailService, BaseMemberRepository, BaseStorageService};
