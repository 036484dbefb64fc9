//! radare2 child process spoken to over its pipe protocol.
//!
//! With `-q0`, radare2 reads one command per line from stdin and terminates
//! every reply on stdout with a NUL byte, including the initial banner.

use std::cell::RefCell;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

/// Executable names tried when no explicit path is given.
const CANDIDATES: [&str; 2] = ["radare2", "r2"];

/// Finds a radare2 executable on `PATH`.
pub fn locate_radare2() -> io::Result<PathBuf> {
    CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "radare2 not found in PATH"))
}

/// A running radare2 process.
pub struct Radare2Pipe {
    child: Child,
    stdin: RefCell<ChildStdin>,
    stdout: RefCell<BufReader<ChildStdout>>,
}

impl Radare2Pipe {
    /// Starts `program` on `file` and waits for it to become ready.
    pub fn spawn(program: &Path, file: &Path) -> io::Result<Self> {
        debug!(program = %program.display(), file = %file.display(), "spawning radare2");

        let mut child = Command::new(program)
            .arg("-q0")
            .arg(file)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("radare2 stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("radare2 stdout unavailable"))?;

        let pipe = Self {
            child,
            stdin: RefCell::new(stdin),
            stdout: RefCell::new(BufReader::new(stdout)),
        };
        pipe.read_reply()?;

        Ok(pipe)
    }

    /// Runs one command and returns its output.
    pub fn cmd(&self, command: &str) -> io::Result<String> {
        {
            let mut stdin = self.stdin.borrow_mut();
            writeln!(stdin, "{}", command.replace('\n', ";"))?;
            stdin.flush()?;
        }
        self.read_reply()
    }

    fn read_reply(&self) -> io::Result<String> {
        read_reply(&mut *self.stdout.borrow_mut())
    }
}

/// Reads up to and including the next NUL byte.
fn read_reply(reader: &mut impl BufRead) -> io::Result<String> {
    let mut buf = Vec::new();
    let n = reader.read_until(0, &mut buf)?;

    if n == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "radare2 closed its output",
        ));
    }
    if buf.last() == Some(&0) {
        buf.pop();
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

impl Drop for Radare2Pipe {
    fn drop(&mut self) {
        let stdin = self.stdin.get_mut();
        let _ = writeln!(stdin, "q!");
        let _ = stdin.flush();

        if let Err(e) = self.child.wait() {
            warn!(error = %e, "failed to reap radare2");
        }
    }
}
