//! Line-oriented console host.
//!
//! Reads invocation lines from any async reader and writes replies to any
//! async writer. A line starting with `?` is a completion request for the
//! rest of the line; anything else is dispatched. Replies travel through a
//! [`ChannelSender`] and are flushed to the writer after each line.
//!
//! A malformed line (too long, control characters, bad UTF-8) is answered
//! with a rejection and the session keeps reading. Only I/O failure ends it.

pub mod commands;

use bytes::BytesMut;
use futures_util::{SinkExt, StreamExt};
use plugcmd_line::{Invocation, LineCodec, LineError};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::codec::{Decoder, FramedRead, FramedWrite};
use tracing::{debug, warn};

use crate::command::{ChannelSender, CommandRegistry, CommandSender};
use crate::config::ConsoleConfig;

/// Reply for a line no registered command claimed.
pub const UNKNOWN_COMMAND: &str = "Unknown command. Type \"/help\" for help.";

/// Reply for a completion request with nothing to offer.
pub const NO_SUGGESTIONS: &str = "(no suggestions)";

/// Reply for a line longer than `console.max_line_len`.
pub const INPUT_TOO_LONG: &str = "Input line too long.";

/// Line decoding for the console: recoverable line errors become items so
/// the stream keeps going.
struct ConsoleCodec(LineCodec);

type Frame = Result<String, LineError>;

fn lift(decoded: Result<Option<String>, LineError>) -> Result<Option<Frame>, LineError> {
    match decoded {
        Ok(line) => Ok(line.map(Ok)),
        Err(e) if e.is_recoverable() => Ok(Some(Err(e))),
        Err(e) => Err(e),
    }
}

impl Decoder for ConsoleCodec {
    type Item = Frame;
    type Error = LineError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, LineError> {
        lift(self.0.decode(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, LineError> {
        lift(self.0.decode_eof(src))
    }
}

/// Text sent back for a line the codec rejected.
pub fn rejection(error: &LineError) -> String {
    match error {
        LineError::LineTooLong { .. } => INPUT_TOO_LONG.to_string(),
        other => format!("Rejected input: {other}"),
    }
}

/// Serve lines from `input` until it is exhausted or fails.
pub async fn run<R, W>(
    registry: &CommandRegistry,
    config: &ConsoleConfig,
    input: R,
    output: W,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sender = ChannelSender::new(config.sender_name.clone(), tx);

    let mut lines = FramedRead::new(
        input,
        ConsoleCodec(LineCodec::with_max_len(config.max_line_len)),
    );
    let mut out = FramedWrite::new(output, LineCodec::with_max_len(config.max_line_len));

    write_prompt(&mut out, &config.prompt).await?;
    while let Some(line) = lines.next().await {
        match line? {
            Ok(line) => handle_line(registry, &sender, &line),
            Err(e) => {
                warn!(error = %e, sender = %sender.name(), "Rejected console line");
                sender.send_message(&rejection(&e));
            }
        }

        while let Ok(reply) = rx.try_recv() {
            out.send(reply).await?;
        }
        write_prompt(&mut out, &config.prompt).await?;
    }
    Ok(())
}

async fn write_prompt<W>(out: &mut FramedWrite<W, LineCodec>, prompt: &str) -> Result<(), LineError>
where
    W: AsyncWrite + Unpin,
{
    if prompt.is_empty() {
        return Ok(());
    }
    let writer = out.get_mut();
    writer.write_all(prompt.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Handle one console line. Replies go to `sender`.
pub fn handle_line(registry: &CommandRegistry, sender: &dyn CommandSender, line: &str) {
    if line.trim().is_empty() {
        return;
    }

    if let Some(partial) = line.strip_prefix('?') {
        let suggestions = match Invocation::parse(partial) {
            Ok(inv) => registry.on_completion_request(sender, inv.label, &inv.args_owned()),
            Err(_) => registry.on_completion_request(sender, "", &[]),
        };
        if suggestions.is_empty() {
            sender.send_message(NO_SUGGESTIONS);
        } else {
            sender.send_message(&suggestions.join(" "));
        }
        return;
    }

    let claimed = match Invocation::parse(line) {
        Ok(inv) => registry.on_invocation(sender, inv.label, &inv.args_owned()),
        Err(e) => {
            debug!(error = %e, "Unparsable console line");
            false
        }
    };
    if !claimed {
        sender.send_message(UNKNOWN_COMMAND);
    }
}
