pub mod credential;
pub mod error;
pub mod outcome;
pub mod policy;
pub mod request;

pub use credential::Credential;
pub use error::FetchError;
pub use outcome::{GenerationResult, Outcome};
pub use policy::RetryPolicy;
pub use request::{ImageRequest, DEFAULT_BATCH};
