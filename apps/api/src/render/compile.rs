//! LaTeX → PDF via an installed TeX toolchain (`pdflatex` by default).
//!
//! Each compile runs in its own temporary directory, which is removed when the
//! `TempDir` guard drops, on success and failure alike. The child process is
//! killed if the timeout fires.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

const JOB_NAME: &str = "resume";
const LOG_TAIL_LINES: usize = 20;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("LaTeX compiler '{0}' is not installed on this server")]
    Unavailable(String),

    #[error("LaTeX compilation failed ({status}):\n{log_tail}")]
    Failed { status: String, log_tail: String },

    #[error("LaTeX compilation timed out after {0:?}")]
    TimedOut(Duration),

    #[error("LaTeX compilation I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct LatexCompiler {
    program: String,
    base_args: Vec<String>,
    timeout: Duration,
}

impl LatexCompiler {
    pub fn new<I, S>(program: &str, base_args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            base_args: base_args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    /// Splits a command line such as `pdflatex` or `xelatex -8bit` on whitespace.
    pub fn from_command_line(command: &str, timeout: Duration) -> Self {
        let mut parts = command.split_whitespace();
        let program = parts.next().unwrap_or("pdflatex");
        Self::new(program, parts, timeout)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Compiles `tex` and returns the PDF bytes.
    pub async fn compile(&self, tex: &str) -> Result<Vec<u8>, CompileError> {
        let workdir = tempfile::Builder::new().prefix("resume-tex-").tempdir()?;
        let tex_path = workdir.path().join(format!("{JOB_NAME}.tex"));
        tokio::fs::write(&tex_path, tex).await?;

        debug!("Compiling {} bytes of LaTeX in {}", tex.len(), workdir.path().display());

        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg("-no-shell-escape")
            .arg(format!("{JOB_NAME}.tex"))
            .current_dir(workdir.path())
            // Restrict \input / \openout to the working directory.
            .env("openin_any", "p")
            .env("openout_any", "p")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CompileError::Unavailable(self.program.clone()),
            _ => CompileError::Io(e),
        })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CompileError::TimedOut(self.timeout))??;

        let pdf_path = workdir.path().join(format!("{JOB_NAME}.pdf"));

        if !output.status.success() {
            return Err(CompileError::Failed {
                status: output.status.to_string(),
                log_tail: log_tail(workdir.path(), &output.stdout).await,
            });
        }

        match tokio::fs::read(&pdf_path).await {
            Ok(pdf) => {
                info!("LaTeX compiled to {} byte PDF", pdf.len());
                Ok(pdf)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CompileError::Failed {
                status: "no PDF produced".to_string(),
                log_tail: log_tail(workdir.path(), &output.stdout).await,
            }),
            Err(e) => Err(CompileError::Io(e)),
        }
    }
}

/// Last lines of the TeX log, falling back to the compiler's stdout.
async fn log_tail(workdir: &Path, stdout: &[u8]) -> String {
    let log = match tokio::fs::read(workdir.join(format!("{JOB_NAME}.log"))).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::from_utf8_lossy(stdout).into_owned(),
    };
    tail_lines(&log, LOG_TAIL_LINES)
}

pub fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_lines() {
        let text = "a\n\nb\nc\n  \nd\n";
        assert_eq!(tail_lines(text, 2), "c\nd");
        assert_eq!(tail_lines(text, 10), "a\nb\nc\nd");
        assert_eq!(tail_lines("", 3), "");
    }

    #[test]
    fn test_from_command_line() {
        let compiler = LatexCompiler::from_command_line("xelatex -8bit", Duration::from_secs(5));
        assert_eq!(compiler.program(), "xelatex");
        assert_eq!(compiler.base_args, vec!["-8bit".to_string()]);

        let fallback = LatexCompiler::from_command_line("   ", Duration::from_secs(5));
        assert_eq!(fallback.program(), "pdflatex");
    }

    #[tokio::test]
    async fn test_missing_compiler_is_unavailable() {
        let compiler = LatexCompiler::new(
            "resume-latex-compiler-that-does-not-exist",
            Vec::<String>::new(),
            Duration::from_secs(5),
        );
        let err = compiler.compile("\\relax").await.unwrap_err();
        assert!(matches!(err, CompileError::Unavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_compile_returns_pdf_bytes() {
        // Stands in for pdflatex: writes resume.pdf into the working directory.
        let compiler = LatexCompiler::new(
            "sh",
            ["-c", "printf '%%PDF-1.4 fake' > resume.pdf", "sh"],
            Duration::from_secs(10),
        );
        let pdf = compiler.compile("\\relax").await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compile_passes_relative_job_file() {
        // Echoes its arguments into the PDF; the source must sit in the working directory.
        let compiler = LatexCompiler::new(
            "sh",
            [
                "-c",
                "test -f resume.tex || exit 2; printf '%%PDF-1.4 %s' \"$*\" > resume.pdf",
                "sh",
            ],
            Duration::from_secs(10),
        );
        let pdf = compiler.compile("\\relax").await.unwrap();
        assert_eq!(
            String::from_utf8(pdf).unwrap(),
            "%PDF-1.4 -interaction=nonstopmode -halt-on-error -no-shell-escape resume.tex"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_compile_reports_log_tail() {
        let compiler = LatexCompiler::new(
            "sh",
            [
                "-c",
                "echo 'This is pdfTeX' > resume.log; echo '! Undefined control sequence.' >> resume.log; exit 1",
                "sh",
            ],
            Duration::from_secs(10),
        );
        match compiler.compile("\\bogus").await.unwrap_err() {
            CompileError::Failed { log_tail, .. } => {
                assert!(log_tail.ends_with("! Undefined control sequence."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_zero_without_pdf_is_failure() {
        let compiler = LatexCompiler::new("sh", ["-c", "exit 0", "sh"], Duration::from_secs(10));
        let err = compiler.compile("\\relax").await.unwrap_err();
        assert!(matches!(err, CompileError::Failed { ref status, .. } if status == "no PDF produced"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_compiler_times_out() {
        let compiler = LatexCompiler::new("sh", ["-c", "sleep 5", "sh"], Duration::from_millis(100));
        let err = compiler.compile("\\relax").await.unwrap_err();
        assert!(matches!(err, CompileError::TimedOut(_)));
    }
}
