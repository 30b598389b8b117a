use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::cli_util::print_interpreter_error;
use crate::config::Limits;
use crate::{ExitStatus, Interpreter};

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true, disable_version_flag = true)]
pub struct RunArgs {
    /// Brainfuck source file
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Read Brainfuck code from PATH
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Run CODE given inline instead of reading a file
    #[arg(short = 'x', long = "execute", value_name = "CODE", allow_hyphen_values = true)]
    pub execute: Option<String>,

    /// Number of tape cells (fallback BF_TAPE_SIZE; default 32768)
    #[arg(long = "tape-size", value_name = "CELLS")]
    pub tape_size: Option<usize>,

    /// Maximum loop nesting depth (fallback BF_MAX_LOOP_DEPTH; default 512)
    #[arg(long = "max-depth", value_name = "N")]
    pub max_loop_depth: Option<usize>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

enum Source {
    File(PathBuf),
    Inline(String),
}

pub fn run(program: &str, args: RunArgs) -> ExitStatus {
    if args.help {
        print_usage(program);
        return ExitStatus::Success;
    }

    let RunArgs {
        path,
        file,
        execute,
        tape_size,
        max_loop_depth,
        ..
    } = args;

    let mut sources: Vec<Source> = Vec::new();
    sources.extend(path.map(Source::File));
    sources.extend(file.map(Source::File));
    sources.extend(execute.map(Source::Inline));

    let source = match sources.len() {
        0 => {
            print_usage(program);
            return ExitStatus::InvalidArgs;
        }
        1 => sources.remove(0),
        _ => {
            eprintln!("{program}: give exactly one of PATH, --file or --execute");
            print_usage(program);
            return ExitStatus::InvalidArgs;
        }
    };

    let code = match source {
        Source::Inline(code) => code.into_bytes(),
        Source::File(path) => match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{program}: {}: {e}", path.display());
                let _ = io::stderr().flush();
                return ExitStatus::Io;
            }
        },
    };

    let limits = match Limits::resolve(tape_size, max_loop_depth) {
        Ok(limits) => limits,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return ExitStatus::InvalidArgs;
        }
    };
    debug!(?limits, len = code.len(), "starting run");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let result = Interpreter::new(limits).run(&code, stdin.lock(), &mut output);
    let status = ExitStatus::from(&result);

    if let Err(err) = result {
        // Keep whatever the program printed before failing.
        let _ = output.flush();
        print_interpreter_error(Some(program), &code, &err);
    }

    status
}

pub fn print_usage(program: &str) {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] <PATH>          # Run Brainfuck code loaded from PATH
  {0} [OPTIONS] -f <PATH>       # Same as above
  {0} [OPTIONS] -x "<code>"     # Run Brainfuck code given inline

Options:
  --file,    -f <PATH>   Read Brainfuck code from PATH
  --execute, -x <CODE>   Run CODE instead of reading a file
  --tape-size <CELLS>    Number of tape cells (env BF_TAPE_SIZE; default 32768)
  --max-depth <N>        Maximum loop nesting (env BF_MAX_LOOP_DEPTH; default 512)
  --help,    -h          Show this help

Notes:
- Input (`,`) reads a single byte from stdin; on EOF the current cell is set to 0.
- Characters outside of Brainfuck's ><+-.,[] are treated as comments.
- Moving the pointer off either end of the tape is an error; cells wrap at 256.
- Limits may also be set in a TOML file ($BF_CONFIG or ~/.config/bf.toml):
    [limits]
    tape_size = 32768
    max_loop_depth = 512

Exit status:
  0     success
  0x21  invalid arguments or configuration
  0x22  I/O error
  0x23  out of memory
  0x41  tape overflow     0x42  tape underflow
  0x43  unmatched ']'     0x44  loops nested too deeply
  0x45  unmatched '['
"#,
        program
    );
    let _ = io::stderr().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunArgs {
        RunArgs::try_parse_from(std::iter::once("bf").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn positional_path() {
        let args = parse(&["prog.bf"]);
        assert_eq!(args.path, Some(PathBuf::from("prog.bf")));
        assert!(args.file.is_none() && args.execute.is_none());
    }

    #[test]
    fn inline_code_may_start_with_hyphen() {
        let args = parse(&["-x", "-[--->+<]>."]);
        assert_eq!(args.execute.as_deref(), Some("-[--->+<]>."));
    }

    #[test]
    fn limit_flags() {
        let args = parse(&["--tape-size", "100", "--max-depth", "4", "-f", "a.bf"]);
        assert_eq!(args.tape_size, Some(100));
        assert_eq!(args.max_loop_depth, Some(4));
        assert_eq!(args.file, Some(PathBuf::from("a.bf")));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let result = RunArgs::try_parse_from(["bf", "--frobnicate"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_source_is_invalid_args() {
        let status = run("bf", parse(&[]));
        assert_eq!(status, ExitStatus::InvalidArgs);
        assert!(!status.is_success());
    }

    #[test]
    fn two_sources_are_invalid_args() {
        assert_eq!(run("bf", parse(&["a.bf", "-x", "+"])), ExitStatus::InvalidArgs);
    }

    #[test]
    fn help_is_success() {
        assert!(run("bf", parse(&["-h"])).is_success());
    }

    #[test]
    fn unreadable_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.bf");
        let args = parse(&["-f", missing.to_str().unwrap()]);
        assert_eq!(run("bf", args), ExitStatus::Io);
    }
}
