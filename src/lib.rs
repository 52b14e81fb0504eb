pub mod browser;
pub mod errors;
pub mod types;
pub mod verify;

pub use browser::BrowserSession;
pub use errors::VerifyError;
pub use types::*;
