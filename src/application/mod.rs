mod application;
mod confirmation;
pub mod data;
mod runtime_config;

pub use application::{Application, ApplicationError};
pub use confirmation::confirm;
pub use runtime_config::RuntimeConfig;
