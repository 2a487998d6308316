//! Supervising a compiler process

use airship_foundation::{AirshipError, AirshipResult};
use airship_services::{is_compilable_workspace, CompilerInvocation};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{error, info, warn};

/// Exit code reported when the user stops the compiler
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Run the compiler, forwarding its output, until it exits or Ctrl-C
///
/// Returns the process exit code. A signal-terminated process reports 1.
pub async fn supervise(invocation: &CompilerInvocation) -> AirshipResult<i32> {
    if !invocation.local_install && !is_compilable_workspace(&invocation.working_dir) {
        warn!(
            workspace = %invocation.working_dir.display(),
            "No local compiler install, using the compiler on PATH"
        );
    }

    info!(
        command = %invocation.display_command(),
        workspace = %invocation.working_dir.display(),
        "Starting TypeScript compiler"
    );

    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            error!(program = %invocation.program.display(), error = %e, "Error while starting compiler");
            AirshipError::io_at(&invocation.program, e)
        })?;

    let mut forwarders = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        forwarders.push(tokio::spawn(forward_lines(stdout, Stream::Stdout)));
    }
    if let Some(stderr) = child.stderr.take() {
        forwarders.push(tokio::spawn(forward_lines(stderr, Stream::Stderr)));
    }

    let code = tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|e| AirshipError::io_at(&invocation.program, e))?;
            // Drain whatever the process wrote before exiting
            for forwarder in forwarders {
                let _ = forwarder.await;
            }
            status.code().unwrap_or(1)
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Stopping TypeScript compiler");
            if let Err(e) = child.kill().await {
                warn!(error = %e, "Failed to stop compiler");
            }
            return Ok(INTERRUPTED_EXIT_CODE);
        }
    };

    if code == 0 {
        info!(code, "Compiler exited");
    } else {
        error!(code, "Compiler did not exit successfully");
    }
    Ok(code)
}

async fn forward_lines<R>(reader: R, stream: Stream)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match stream {
                Stream::Stdout => println!("{}", line),
                Stream::Stderr => eprintln!("{}", line),
            },
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read compiler output");
                break;
            }
        }
    }
}
