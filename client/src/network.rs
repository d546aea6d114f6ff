//! Client network layer: WebSocket connection, snapshot intake and the
//! interactive loop

use crate::game::ViewerState;
use crate::input::{parse_line, script_commands, InputAction, HELP};
use crate::rendering::{render_net, render_status};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{CodecError, Command, ProtocolError};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    #[error("failed to encode command: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("bad snapshot: {0}")]
    Snapshot(#[from] CodecError),

    #[error("bad script: {0}")]
    Script(#[from] ProtocolError),

    #[error("server closed the connection")]
    Closed,
}

impl From<tungstenite::Error> for ClientError {
    fn from(e: tungstenite::Error) -> Self {
        ClientError::WebSocket(Box::new(e))
    }
}

/// A connected viewer
pub struct Client {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    state: ViewerState,
    quiet: bool,
    pending_script: Option<String>,
    pub commands_sent: u64,
}

impl Client {
    pub async fn connect(url: &str, quiet: bool) -> Result<Self, ClientError> {
        info!("Connecting to {}...", url);
        let (ws, _) = connect_async(url).await?;
        info!("Connected");

        Ok(Client {
            ws,
            state: ViewerState::new(),
            quiet,
            pending_script: None,
            commands_sent: 0,
        })
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Queues a move script to send once the first snapshot has arrived.
    pub fn set_script(&mut self, script: impl Into<String>) {
        self.pending_script = Some(script.into());
    }

    pub async fn send(&mut self, command: &Command) -> Result<(), ClientError> {
        let text = command.to_json()?;
        debug!("Sending {}", text);
        self.ws.send(Message::Text(text)).await?;
        self.commands_sent += 1;
        Ok(())
    }

    /// Waits for the next snapshot and applies it. Undecodable frames are
    /// logged and skipped.
    pub async fn next_snapshot(&mut self) -> Result<(), ClientError> {
        loop {
            let frame = match self.ws.next().await {
                Some(frame) => frame?,
                None => return Err(ClientError::Closed),
            };
            match frame {
                Message::Text(text) => match self.state.apply_text(&text) {
                    Ok(()) => return Ok(()),
                    Err(e) => warn!("Ignoring snapshot: {}", e),
                },
                Message::Close(_) => return Err(ClientError::Closed),
                _ => {}
            }
        }
    }

    fn show(&self) {
        if self.quiet {
            return;
        }
        if let Some(grid) = self.state.grid() {
            println!("{}", render_net(grid));
        }
        println!(
            "{}",
            render_status(self.state.is_solved(), self.state.snapshots_received)
        );
    }

    async fn send_pending_script(&mut self) -> Result<(), ClientError> {
        if let Some(script) = self.pending_script.take() {
            let commands = script_commands(&script)?;
            info!("Sending script `{}` as {} rotations", script, commands.len());
            for command in &commands {
                self.send(command).await?;
            }
        }
        Ok(())
    }

    /// Handles one line of terminal input. Returns false to quit.
    async fn handle_line(&mut self, line: &str) -> Result<bool, ClientError> {
        match parse_line(line, &self.state) {
            Ok(InputAction::Send(commands)) => {
                for command in &commands {
                    self.send(command).await?;
                }
            }
            Ok(InputAction::Help) => println!("{}", HELP),
            Ok(InputAction::Quit) => return Ok(false),
            Ok(InputAction::Nothing) => {}
            Err(e) => warn!("{}", e),
        }
        Ok(true)
    }

    /// Interactive loop: prints each snapshot and forwards stdin commands
    /// until `quit`, end of input, or the server going away.
    pub async fn run(&mut self) -> Result<(), ClientError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        loop {
            tokio::select! {
                snapshot = self.next_snapshot() => {
                    match snapshot {
                        Ok(()) => {}
                        Err(ClientError::Closed) => {
                            info!("Server closed the connection");
                            break;
                        }
                        Err(e) => {
                            error!("Connection error: {}", e);
                            return Err(e);
                        }
                    }
                    self.show();
                    self.send_pending_script().await?;
                }
                line = lines.next_line(), if stdin_open => {
                    match line? {
                        Some(line) => {
                            if !self.handle_line(&line).await? {
                                break;
                            }
                        }
                        None => stdin_open = false,
                    }
                }
            }
        }

        let _ = self.ws.close(None).await;
        info!("Sent {} commands", self.commands_sent);
        Ok(())
    }
}
