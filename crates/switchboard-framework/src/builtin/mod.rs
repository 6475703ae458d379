//! Built-in commands shipped with the Switchboard framework.
//!
//! | Command | Name | Description |
//! |---------|------|-------------|
//! | [`HelpCommand`] | `help` | Lists commands or shows one command's help |
//!
//! Built-ins are ordinary [`Command`](crate::Command)s; register them like any
//! other:
//!
//! ```rust,ignore
//! router.register([Arc::new(HelpCommand::new()) as BoxedCommand, ping]);
//! ```

pub mod help;

pub use help::HelpCommand;
