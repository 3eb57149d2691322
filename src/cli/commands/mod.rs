//! One module per subcommand.  Each exposes an `execute` function called
//! from `main`.

pub mod add;
pub mod audit_cmd;
pub mod backup;
pub mod balance;
pub mod completions;
pub mod create;
pub mod delete;
pub mod export;
pub mod list;
pub mod restore;
pub mod shell;
pub mod show;
