mod container;
mod content;
mod credentials;

pub use container::INITIAL_CAPACITY;
pub use container::ResultContainer;
pub use content::ContentAggregate;
pub use content::ContentKind;
pub use content::Record;
pub use credentials::CredentialStore;
pub use credentials::Credentials;
