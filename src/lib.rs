//! # Introduction
//!
//! `minic` runs short C programs entirely in-process so that learners can
//! edit a program and observe its output without a toolchain. The crate
//! is the runner core only: callers hand it a source string and consume a
//! result value. Editors, program catalogs and result presentation live
//! outside.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → preprocess → Lexer → Parser → AST → Interpreter → RunOutput
//! ```
//!
//! 1. [`preprocess`] — normalises line endings, folds smart quotes and
//!    dashes that mobile keyboards insert, and strips `#` lines.
//! 2. [`parser`] — tokenises the sanitized source and builds the
//!    statement tree for the body of `main`, accumulating non-fatal
//!    parser warnings.
//! 3. [`interpreter`] — walks the tree with a stack of lexical scopes and
//!    a buffered stdout string.
//! 4. [`runner`] — the one public entry point: composes the stages,
//!    times the run, and maps failures into [`runner::RunError`].
//!
//! ## Supported C subset
//!
//! `int`-typed scalars, a single `main` function, block structure,
//! `if/else`, `while`, `for`, `return`, integer arithmetic and
//! comparison, and a restricted `printf`. No pointers, arrays, structs,
//! user-defined functions, floating point or heap allocation.

pub mod interpreter;
pub mod parser;
pub mod preprocess;
pub mod runner;
