//! A bounded-tape Brainfuck interpreter library.
//!
//! Programs run on a fixed-length tape of byte cells (32,768 by default) with
//! a single data pointer, in two passes:
//!
//! 1. [`match_brackets`] scans the source once and pairs every `[` with its
//!    `]`, rejecting unbalanced programs and loops nested deeper than the
//!    configured limit (512 by default).
//! 2. [`execute`] walks the source against a [`Tape`], jumping between paired
//!    brackets through the resulting [`LoopTable`].
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; cells wrap modulo 256.
//! - Strict pointer bounds: moving left from cell 0 or right past the last
//!   cell is an error, never a wraparound.
//! - `,` reads one byte from the injected input; on EOF the cell is set to 0.
//! - `.` writes the current cell as one raw byte to the injected output.
//! - Any byte outside `><+-.,[]` is a comment.
//! - Every failure maps to a distinct [`ExitStatus`] for the process exit code.
//!
//! Quick start:
//!
//! ```
//! use bfi::Interpreter;
//!
//! let mut out = Vec::new();
//! Interpreter::default()
//!     .run(b"++++++++[>++++++++<-]>+.", &b""[..], &mut out)
//!     .expect("program should run");
//! assert_eq!(out, b"A");
//! ```

pub mod brackets;
pub mod cli_util;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod tape;

pub mod commands {
    pub mod run;
}

pub use brackets::{match_brackets, LoopTable};
pub use config::{Limits, MAX_LOOP_DEPTH, TAPE_SIZE};
pub use error::{ExitStatus, InterpreterError};
pub use interpreter::{execute, Interpreter, Program, RunStats};
pub use tape::Tape;
