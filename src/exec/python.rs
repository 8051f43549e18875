//! Python subprocess harness for plot execution.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

// The harness reads the untrusted code from stdin and runs it against a
// context exposing exactly two bindings: `plt` and `np`. The figure is
// saved tightly cropped and released in `finally`, whether or not the
// save raises. argv[1] is the output path, argv[2] the address-space
// ceiling in MiB (best effort, unix only).
const HARNESS: &str = r#"
import sys
try:
    import resource
    limit = int(sys.argv[2]) * 1024 * 1024
    resource.setrlimit(resource.RLIMIT_AS, (limit, limit))
except Exception:
    pass
import matplotlib
matplotlib.use("Agg")
import matplotlib.pyplot as plt
import numpy as np
code = sys.stdin.read()
try:
    exec(compile(code, "<plot>", "exec"), {"plt": plt, "np": np})
    plt.savefig(sys.argv[1], bbox_inches="tight")
finally:
    plt.close("all")
"#;

/// Run `code` under the harness, writing the figure to `out_path`.
///
/// The child is spawned with `kill_on_drop`, so blowing the wall-clock
/// budget kills the interpreter rather than leaking it.
pub async fn run_plot(
    python_bin: &str,
    code: &str,
    out_path: &Path,
    timeout: Duration,
    memory_mb: u64,
) -> Result<()> {
    let mut cmd = Command::new(python_bin);
    cmd.arg("-u") // unbuffered
        .arg("-c")
        .arg(HARNESS)
        .arg(out_path)
        .arg(memory_mb.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to start {}", python_bin))?;

    let mut stdin = child
        .stdin
        .take()
        .context("no stdin on plot subprocess")?;
    stdin
        .write_all(code.as_bytes())
        .await
        .context("failed to hand code to plot subprocess")?;
    drop(stdin); // EOF so the harness's read() returns

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.context("plot subprocess wait failed")?,
        Err(_) => bail!(
            "plot execution exceeded the {}s time budget",
            timeout.as_secs()
        ),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{}", summarize_stderr(&stderr, output.status.code()));
    }

    Ok(())
}

// A Python traceback ends with the one line worth repeating to the
// user; keep that and drop the frames above it.
fn summarize_stderr(stderr: &str, exit_code: Option<i32>) -> String {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| match exit_code {
            Some(code) => format!("plot subprocess exited with status {}", code),
            None => "plot subprocess terminated by signal".to_string(),
        })
}
