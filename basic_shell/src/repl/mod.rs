//! Interactive session facade.
//!
//! A [`Session`] joins the line parser to the lowering core: feed it
//! source lines, drain warnings between them, and serialize the module
//! when done. The interactive loop and script runner in the `bshell`
//! binary are thin wrappers around this type.

mod session;

pub use session::Session;
