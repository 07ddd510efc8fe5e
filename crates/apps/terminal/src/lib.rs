//! Line-oriented terminal that runs shell-style commands against the shared virtual filesystem.
//!
//! Each [`TerminalSession`] keeps its own working directory and history; all file changes go
//! through the [`desktop_vfs::VfsStore`] passed to [`TerminalSession::execute`].

#![warn(rustdoc::broken_intra_doc_links)]

mod commands;
pub mod session;
pub mod tokenize;

pub use session::{TerminalOutput, TerminalSession, BANNER, MAX_HISTORY};
pub use tokenize::{tokenize, TerminalError};
