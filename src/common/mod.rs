pub mod command;
pub mod context;
pub mod error;

pub use command::CommandDescriptor;
pub use context::ShellContext;
pub use error::Error;
