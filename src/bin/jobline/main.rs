mod args;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use jobline::interpreter::Interpreter;
use jobline::line_reader::{read_on_thread, LineReader};
use tokio::fs::File;
use tokio::io::{self, AsyncRead, AsyncWriteExt};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};

use crate::args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logging. Stdout carries the program's output, so logs go to stderr.
    if args.debug {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .init();
    }

    // Cancellation: stop between commands on ctrl-c.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(error) = signal::ctrl_c().await {
                warn!(%error, "something strange with ctrl-c handling!");
            };
            cancel.cancel();
        });
    }

    match begin(args, cancel).await {
        Ok(exit_code) => exit_code,
        Err(error) => {
            let error = format!("{error:#}");
            error!(%error, "encountered runtime error");
            ExitCode::FAILURE
        },
    }
}

async fn begin(args: Args, cancel: CancellationToken) -> Result<ExitCode> {
    let input = open_input(&args.input)
        .await
        .with_context(|| format!("opening {}", args.input.display()))?;
    info!(input = %args.input.display(), "running");

    let mut lines: LineReader<_> = input.into();
    let mut out = io::stdout();
    let mut interp = Interpreter::new(args.halt_on_empty);

    interp
        .run(&mut lines, &mut out, &cancel)
        .await
        .context("processing commands")?;

    if args.stats {
        let summary = serde_yaml::to_string(&interp.summary())
            .context("serialising run summary")?;
        out.write_all(summary.as_bytes()).await?;
        out.flush().await?;
    }

    let stats = interp.stats();
    info!(
        commands = stats.commands_executed,
        remaining = interp.queue().len(),
        "finished"
    );

    // A dequeue from an empty queue is the one hard fault.
    Ok(if stats.empty_dequeues > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn open_input(path: &Path) -> Result<Box<dyn AsyncRead + Unpin>> {
    Ok(if path == Path::new("-") {
        // tokio's own stdin would keep ctrl-c from exiting until a line or EOF
        // arrived.
        Box::new(read_on_thread(std::io::stdin()))
    } else {
        Box::new(File::open(path).await?)
    })
}
