//! Simulator processes and the channels a bridge talks to them through

use std::process::Stdio;

use anyhow::Result;
use tandem_protocol::{SimChunk, parse_sim_chunk};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::mpsc;

use crate::config::SimulatorConfig;
use crate::error::BridgeError;

pub type ChunkResult = Result<SimChunk, BridgeError>;

/// Both ends of a running simulator as seen by its bridge
pub struct SimulatorIo {
    /// Lines for the simulator's input, without the trailing newline
    pub input: mpsc::UnboundedSender<String>,
    /// Parsed output. Closes when the simulator goes away.
    pub chunks: mpsc::Receiver<ChunkResult>,
}

/// Starts one simulator per match
pub trait SimulatorLauncher: Send + Sync {
    fn launch(&self, chunk_capacity: usize) -> Result<SimulatorIo, BridgeError>;
}

/// Runs the simulator as a child process speaking the stdio battle protocol.
/// The child is killed once its input channel closes.
pub struct ProcessSimulator {
    config: SimulatorConfig,
}

impl ProcessSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }
}

impl SimulatorLauncher for ProcessSimulator {
    fn launch(&self, chunk_capacity: usize) -> Result<SimulatorIo, BridgeError> {
        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BridgeError::Launch(format!("{}: {}", self.config.program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Launch("stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Launch("stdout not captured".to_string()))?;

        tracing::debug!(program = %self.config.program, pid = ?child.id(), "Simulator started");

        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (chunk_tx, chunk_rx) = mpsc::channel(chunk_capacity.max(1));

        tokio::spawn(write_input(child, stdin, input_rx));
        tokio::spawn(read_output(stdout, chunk_tx));

        Ok(SimulatorIo {
            input: input_tx,
            chunks: chunk_rx,
        })
    }
}

async fn write_input(
    mut child: Child,
    mut stdin: ChildStdin,
    mut input: mpsc::UnboundedReceiver<String>,
) {
    while let Some(line) = input.recv().await {
        tracing::trace!(line = %line, "Simulator input");
        let written = async {
            stdin.write_all(line.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.flush().await
        }
        .await;

        if let Err(e) = written {
            tracing::warn!(error = %e, "Simulator input closed");
            break;
        }
    }

    if let Err(e) = child.kill().await {
        tracing::debug!(error = %e, "Simulator already gone");
    }
}

async fn read_output(stdout: ChildStdout, chunks: mpsc::Sender<ChunkResult>) {
    let mut lines = BufReader::new(stdout).lines();
    let mut assembler = ChunkAssembler::default();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(block) = assembler.push_line(&line)
                    && chunks.send(parse_block(&block)).await.is_err()
                {
                    return;
                }
            }
            Ok(None) => break,
            Err(e) => {
                let _ = chunks.send(Err(e.into())).await;
                return;
            }
        }
    }

    if let Some(block) = assembler.finish() {
        let _ = chunks.send(parse_block(&block)).await;
    }
}

fn parse_block(block: &str) -> ChunkResult {
    parse_sim_chunk(block).map_err(|e| BridgeError::Malformed(format!("{:#}", e)))
}

/// Groups output lines into blank-line-terminated chunks
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    block: String,
}

impl ChunkAssembler {
    /// Returns a finished chunk when `line` terminates one
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            if self.block.is_empty() {
                return None;
            }
            return Some(std::mem::take(&mut self.block));
        }
        self.block.push_str(line);
        self.block.push('\n');
        None
    }

    /// Whatever is left once output ends
    pub fn finish(self) -> Option<String> {
        (!self.block.is_empty()).then_some(self.block)
    }
}

/// A launcher with no process behind it: each launch hands the other ends
/// of the channels out as a [`MemorySimulator`].
pub struct MemoryLauncher {
    sessions: mpsc::UnboundedSender<MemorySimulator>,
}

impl MemoryLauncher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MemorySimulator>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sessions: tx }, rx)
    }
}

impl SimulatorLauncher for MemoryLauncher {
    fn launch(&self, chunk_capacity: usize) -> Result<SimulatorIo, BridgeError> {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (chunk_tx, chunk_rx) = mpsc::channel(chunk_capacity.max(1));

        self.sessions
            .send(MemorySimulator {
                input: input_rx,
                chunks: chunk_tx,
            })
            .map_err(|_| BridgeError::Launch("no one is driving the simulator".to_string()))?;

        Ok(SimulatorIo {
            input: input_tx,
            chunks: chunk_rx,
        })
    }
}

/// The simulator side of a [`MemoryLauncher`] session
pub struct MemorySimulator {
    input: mpsc::UnboundedReceiver<String>,
    chunks: mpsc::Sender<ChunkResult>,
}

impl MemorySimulator {
    /// Next line the bridge wrote, `None` once the match is gone
    pub async fn next_line(&mut self) -> Option<String> {
        self.input.recv().await
    }

    /// Lines written so far that have not been read
    pub fn pending_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = self.input.try_recv() {
            lines.push(line);
        }
        lines
    }

    /// Stop reading input, as a crashed process would
    pub fn close_input(&mut self) {
        self.input.close();
    }

    /// Send one chunk of output, given as it would appear on stdout
    pub async fn emit(&self, chunk: &str) -> Result<()> {
        let parsed = parse_sim_chunk(chunk)?;
        self.chunks
            .send(Ok(parsed))
            .await
            .map_err(|_| anyhow::anyhow!("Bridge disconnected"))
    }

    pub async fn fail(&self, error: BridgeError) -> Result<()> {
        self.chunks
            .send(Err(error))
            .await
            .map_err(|_| anyhow::anyhow!("Bridge disconnected"))
    }
}
