use std::collections::TryReserveError;
use std::fmt;
use std::process::ExitCode;

/// Errors that can abort a run, from bracket matching through execution.
///
/// Every variant is terminal: the run stops at the first one and nothing is
/// rolled back. Positions (`ip`) are byte offsets into the program source.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// A `[` would nest deeper than the configured limit.
    #[error("loop nesting exceeds the limit of {limit} at instruction {ip}")]
    LoopOverflow { ip: usize, limit: usize },

    /// A `]` was found with no pending `[`.
    #[error("unmatched ']' at instruction {ip}")]
    LoopUnderflow { ip: usize },

    /// The program ended while a `[` was still open.
    #[error("unmatched '[' at instruction {ip}")]
    UnmatchedOpen { ip: usize },

    /// `>` tried to move the pointer past the last cell.
    #[error("tape pointer moved past the last cell at instruction {ip}")]
    TapeOverflow { ip: usize },

    /// `<` tried to move the pointer left of cell 0.
    #[error("tape pointer moved left of cell 0 at instruction {ip}")]
    TapeUnderflow { ip: usize },

    /// Reading the input or writing the output failed. End of input is not an error.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    /// The tape or the loop tables could not be allocated.
    #[error("cannot allocate {what}: {source}")]
    OutOfMemory {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },
}

impl InterpreterError {
    /// The status a caller should report for this error.
    pub fn status(&self) -> ExitStatus {
        match self {
            InterpreterError::LoopOverflow { .. } => ExitStatus::LoopOverflow,
            InterpreterError::LoopUnderflow { .. } => ExitStatus::LoopUnderflow,
            InterpreterError::UnmatchedOpen { .. } => ExitStatus::UnmatchedOpen,
            InterpreterError::TapeOverflow { .. } => ExitStatus::TapeOverflow,
            InterpreterError::TapeUnderflow { .. } => ExitStatus::TapeUnderflow,
            InterpreterError::Io { .. } => ExitStatus::Io,
            InterpreterError::OutOfMemory { .. } => ExitStatus::OutOfMemory,
        }
    }

    /// Source position the error refers to, if any.
    pub fn ip(&self) -> Option<usize> {
        match self {
            InterpreterError::LoopOverflow { ip, .. }
            | InterpreterError::LoopUnderflow { ip }
            | InterpreterError::UnmatchedOpen { ip }
            | InterpreterError::TapeOverflow { ip }
            | InterpreterError::TapeUnderflow { ip }
            | InterpreterError::Io { ip, .. } => Some(*ip),
            InterpreterError::OutOfMemory { .. } => None,
        }
    }

    /// True for errors found by the bracket matcher, before any execution.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            InterpreterError::LoopOverflow { .. }
                | InterpreterError::LoopUnderflow { .. }
                | InterpreterError::UnmatchedOpen { .. }
        )
    }
}

/// Outcome of a whole invocation, as a small integer for the process exit code.
///
/// `0x2X` codes are environment failures unrelated to the program text,
/// `0x4X` codes are faults in the program itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0x00,
    InvalidArgs = 0x21,
    Io = 0x22,
    OutOfMemory = 0x23,
    TapeOverflow = 0x41,
    TapeUnderflow = 0x42,
    LoopUnderflow = 0x43,
    LoopOverflow = 0x44,
    UnmatchedOpen = 0x45,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }

    pub fn is_environment_error(self) -> bool {
        self.code() & 0xf0 == 0x20
    }

    pub fn is_program_error(self) -> bool {
        self.code() & 0xf0 == 0x40
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitStatus::Success => "success",
            ExitStatus::InvalidArgs => "invalid arguments",
            ExitStatus::Io => "I/O error",
            ExitStatus::OutOfMemory => "out of memory",
            ExitStatus::TapeOverflow => "tape overflow",
            ExitStatus::TapeUnderflow => "tape underflow",
            ExitStatus::LoopUnderflow => "loop underflow",
            ExitStatus::LoopOverflow => "loop overflow",
            ExitStatus::UnmatchedOpen => "unmatched loop",
        };
        f.write_str(name)
    }
}

impl<T> From<&Result<T, InterpreterError>> for ExitStatus {
    fn from(result: &Result<T, InterpreterError>) -> Self {
        match result {
            Ok(_) => ExitStatus::Success,
            Err(err) => err.status(),
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
