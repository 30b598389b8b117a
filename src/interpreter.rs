use std::io::{self, Read, Write};

use tracing::{debug, trace};

use crate::brackets::{match_brackets, LoopTable};
use crate::config::Limits;
use crate::tape::Tape;
use crate::InterpreterError;

/// Program source together with the loop table built from it.
///
/// Both are read-only once constructed, so one `Program` can drive any number
/// of independent runs, each against its own [`Tape`].
#[derive(Debug, Clone)]
pub struct Program<'src> {
    source: &'src [u8],
    loops: LoopTable,
}

impl<'src> Program<'src> {
    /// Match brackets in `source`, allowing at most `max_depth` nested loops.
    pub fn parse(source: &'src [u8], max_depth: usize) -> Result<Self, InterpreterError> {
        let loops = match_brackets(source, max_depth)?;
        Ok(Self { source, loops })
    }

    pub fn source(&self) -> &'src [u8] {
        self.source
    }

    pub fn loops(&self) -> &LoopTable {
        &self.loops
    }
}

/// Counters from a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Source bytes executed, comments and repeated loop bodies included.
    pub steps: u64,
}

/// Run `program` against `tape`, reading `,` bytes from `input` and writing
/// `.` bytes to `output`.
///
/// End of input stores 0 in the current cell. The output is flushed when the
/// program finishes; bytes written before an error are not taken back.
pub fn execute<R, W>(
    program: &Program<'_>,
    tape: &mut Tape,
    mut input: R,
    mut output: W,
) -> Result<RunStats, InterpreterError>
where
    R: Read,
    W: Write,
{
    let source = program.source();
    let loops = program.loops();

    let mut ip = 0;
    let mut depth = 0usize;
    let mut steps = 0u64;

    while ip < source.len() {
        let instr = source[ip];
        trace!(
            ip,
            ptr = tape.pointer(),
            cell = tape.get(),
            depth,
            instr = %char::from(instr),
            "step"
        );

        match instr {
            b'>' => {
                if !tape.move_right() {
                    return Err(InterpreterError::TapeOverflow { ip });
                }
            }
            b'<' => {
                if !tape.move_left() {
                    return Err(InterpreterError::TapeUnderflow { ip });
                }
            }
            b'+' => tape.increment(),
            b'-' => tape.decrement(),
            b',' => match read_byte(&mut input) {
                Ok(Some(byte)) => tape.set(byte),
                Ok(None) => tape.set(0),
                Err(source) => return Err(InterpreterError::Io { ip, source }),
            },
            b'.' => {
                output
                    .write_all(&[tape.get()])
                    .map_err(|source| InterpreterError::Io { ip, source })?;
            }
            b'[' => {
                if tape.get() == 0 {
                    ip = loops.jump(ip);
                } else {
                    depth += 1;
                }
            }
            b']' => {
                if tape.get() == 0 {
                    depth -= 1;
                } else {
                    ip = loops.jump(ip);
                }
            }
            _ => {}
        }

        steps += 1;
        ip += 1;
    }

    debug_assert_eq!(depth, 0, "loop depth must unwind by the end of the program");

    let end = source.len();
    output.flush().map_err(|source| InterpreterError::Io { ip: end, source })?;

    Ok(RunStats { steps })
}

/// Read a single byte, `None` on end of input.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Parses and runs whole programs under a fixed set of [`Limits`].
///
/// Every call to [`Interpreter::run`] starts from a freshly zeroed tape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter {
    limits: Limits,
}

impl Interpreter {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Allocate a tape, match brackets, then execute `source`.
    pub fn run<R, W>(&self, source: &[u8], input: R, output: W) -> Result<RunStats, InterpreterError>
    where
        R: Read,
        W: Write,
    {
        let mut tape = Tape::new(self.limits.tape_size)?;
        debug!(tape_size = tape.len(), "allocated tape");

        let program = Program::parse(source, self.limits.max_loop_depth)?;

        match execute(&program, &mut tape, input, output) {
            Ok(stats) => {
                debug!(steps = stats.steps, "program finished");
                Ok(stats)
            }
            Err(err) => {
                debug!(%err, ptr = tape.pointer(), "run aborted");
                Err(err)
            }
        }
    }
}
