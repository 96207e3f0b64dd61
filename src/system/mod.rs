//! # System Interaction Layer
//!
//! The boundary between the command tree and the outside world: where output goes and
//! where externally stored text comes from.
//!
//! ## Modules
//!
//! - **`logger`**: The `Logger` trait every command prints through, the default console
//!   implementation, an in-memory one for tests, and the error sink that receives parse and
//!   dispatch failures.
//! - **`text_source`**: Resolves help and version texts, reading `@path` references from
//!   disk.

pub mod logger;
pub mod text_source;
