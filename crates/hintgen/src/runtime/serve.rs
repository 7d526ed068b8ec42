//! Serve — read discovery events from stdin, write documents to stdout.
//!
//! Input is one JSON event per line. Output is one line per event:
//!
//! ```text
//! {"id":"<container id>","configs":[{...},{...}]}
//! ```
//!
//! Events are built concurrently but answered in input order.

use futures_util::StreamExt;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tracing::{info, warn};

use crate::builder::HintBuilder;
use crate::compose::ConfigDocument;
use crate::event::DiscoveryEvent;
use crate::runtime::stop::shutdown_signal;

#[derive(Debug, Serialize)]
struct EventOutput {
    id: Option<String>,
    configs: Vec<ConfigDocument>,
}

/// Serve stdin until end of input or a shutdown signal.
pub async fn serve(builder: HintBuilder) -> Result<(), Box<dyn std::error::Error>> {
    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();

    info!(
        "Reading discovery events from stdin (max concurrent events: {})",
        builder.config().max_concurrent_events
    );

    tokio::select! {
        result = process(&builder, input, output) => result?,
        _ = shutdown_signal() => {}
    }

    info!("Shutdown complete");
    Ok(())
}

/// Answer every event line of `input` on `output`.
pub async fn process<R, W>(builder: &HintBuilder, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let limit = builder.config().max_concurrent_events;
    let mut answers = LinesStream::new(input.lines())
        .map(move |line| async move {
            let line = line?;
            if line.trim().is_empty() {
                return Ok::<_, std::io::Error>(None);
            }
            match serde_json::from_str::<DiscoveryEvent>(&line) {
                Ok(event) => {
                    let configs = builder.create_configs(&event).await;
                    Ok(Some(EventOutput {
                        id: event.id,
                        configs,
                    }))
                }
                Err(e) => {
                    warn!("Skipping malformed event: {}", e);
                    Ok(None)
                }
            }
        })
        .buffered(limit);

    while let Some(answer) = answers.next().await {
        let Some(answer) = answer? else {
            continue;
        };
        let mut line = serde_json::to_vec(&answer)?;
        line.push(b'\n');
        output.write_all(&line).await?;
        output.flush().await?;
    }
    Ok(())
}
