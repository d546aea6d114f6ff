//! Server network layer handling WebSocket viewers and the command loop

use crate::client_manager::{ClientManager, ViewerId, OUTGOING_QUEUE_CAPACITY};
use crate::game::CubeSession;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::Command;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::{self, Message};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    #[error("failed to serialize snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<tungstenite::Error> for ServerError {
    fn from(e: tungstenite::Error) -> Self {
        ServerError::WebSocket(Box::new(e))
    }
}

/// Messages sent from connection tasks to the main server loop
#[derive(Debug)]
pub enum ServerMessage {
    ViewerConnected {
        addr: SocketAddr,
        sender: mpsc::Sender<Message>,
        reply: oneshot::Sender<Option<ViewerId>>,
    },
    CommandReceived {
        viewer_id: ViewerId,
        text: String,
    },
    ViewerDisconnected {
        viewer_id: ViewerId,
    },
    Shutdown,
}

/// Main server owning the live cube and its viewers
///
/// Every mutation of the cube happens inside `run`, one message at a time,
/// so commands from concurrent viewers are applied in arrival order and each
/// one is followed by exactly one broadcast.
pub struct Server {
    listener: Arc<TcpListener>,
    clients: ClientManager,
    session: CubeSession,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl Server {
    pub async fn new(
        addr: &str,
        max_viewers: usize,
        seed: Option<u64>,
    ) -> Result<Self, ServerError> {
        let listener = Arc::new(TcpListener::bind(addr).await?);
        info!("Server listening on {}", listener.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            clients: ClientManager::new(max_viewers),
            session: CubeSession::new(seed),
            server_tx,
            server_rx,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping a running server with `ServerMessage::Shutdown`.
    pub fn shutdown_sender(&self) -> mpsc::UnboundedSender<ServerMessage> {
        self.server_tx.clone()
    }

    /// Spawns task that accepts TCP connections and hands each to its own
    /// viewer task
    fn spawn_acceptor(&self) {
        let listener = Arc::clone(&self.listener);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accepted = listener.accept() => match accepted {
                        Ok((stream, addr)) => {
                            let server_tx = server_tx.clone();
                            tokio::spawn(async move {
                                if let Err(e) = serve_viewer(stream, addr, server_tx).await {
                                    warn!("Connection from {} ended with error: {}", addr, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Error accepting connection: {}", e);
                        }
                    },
                    _ = server_tx.closed() => break,
                }
            }
        });
    }

    fn snapshot_text(&self) -> Result<String, ServerError> {
        Ok(self.session.snapshot().to_json()?)
    }

    /// Registers a viewer and queues the current snapshot as its first frame.
    fn handle_connect(
        &mut self,
        addr: SocketAddr,
        sender: mpsc::Sender<Message>,
    ) -> Option<ViewerId> {
        let viewer_id = match self.clients.add_viewer(addr, sender) {
            Some(viewer_id) => viewer_id,
            None => {
                warn!("Rejected viewer from {}: server full", addr);
                return None;
            }
        };

        match self.snapshot_text() {
            Ok(text) => {
                self.clients.send_to(viewer_id, &text);
            }
            Err(e) => error!("Initial snapshot for viewer {} failed: {}", viewer_id, e),
        }
        Some(viewer_id)
    }

    /// Parses and applies one command, then broadcasts the resulting state.
    /// Malformed or rejected commands change nothing and are not broadcast.
    fn handle_command(&mut self, viewer_id: ViewerId, text: &str) {
        self.clients.record_command(viewer_id);

        let command = match Command::parse(text) {
            Ok(command) => command,
            Err(e) => {
                warn!("Ignoring message from viewer {}: {}", viewer_id, e);
                return;
            }
        };
        debug!("Viewer {} sent {}", viewer_id, command.event());

        if self.session.apply(&command).is_err() {
            return;
        }

        match self.snapshot_text() {
            Ok(text) => {
                let dropped = self.clients.broadcast(&text);
                if !dropped.is_empty() {
                    debug!("Broadcast dropped {} viewers", dropped.len());
                }
            }
            Err(e) => error!("Failed to broadcast snapshot: {}", e),
        }
    }

    /// Main server loop serializing all cube access
    pub async fn run(mut self) -> Result<(), ServerError> {
        self.spawn_acceptor();
        info!("Server started successfully");

        while let Some(message) = self.server_rx.recv().await {
            match message {
                ServerMessage::ViewerConnected {
                    addr,
                    sender,
                    reply,
                } => {
                    let viewer_id = self.handle_connect(addr, sender);
                    if reply.send(viewer_id).is_err() {
                        if let Some(viewer_id) = viewer_id {
                            self.clients.remove_viewer(&viewer_id);
                        }
                    }
                }
                ServerMessage::CommandReceived { viewer_id, text } => {
                    self.handle_command(viewer_id, &text);
                }
                ServerMessage::ViewerDisconnected { viewer_id } => {
                    self.clients.remove_viewer(&viewer_id);
                }
                ServerMessage::Shutdown => {
                    info!("Server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Drives one WebSocket connection: a writer task drains the viewer's
/// outgoing queue while this task forwards incoming text frames. The
/// connection ends when either side stops, including when the server drops
/// the viewer's queue.
async fn serve_viewer(
    stream: TcpStream,
    addr: SocketAddr,
    server_tx: mpsc::UnboundedSender<ServerMessage>,
) -> Result<(), ServerError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws_stream.split();

    let (tx, mut rx) = mpsc::channel::<Message>(OUTGOING_QUEUE_CAPACITY);
    let (reply_tx, reply_rx) = oneshot::channel();
    if server_tx
        .send(ServerMessage::ViewerConnected {
            addr,
            sender: tx,
            reply: reply_tx,
        })
        .is_err()
    {
        return Ok(());
    }

    let viewer_id = match reply_rx.await {
        Ok(Some(viewer_id)) => viewer_id,
        _ => {
            write.send(Message::Close(None)).await?;
            return Ok(());
        }
    };

    let mut writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = write.send(message).await {
                debug!("Writer for viewer {} stopped: {}", viewer_id, e);
                break;
            }
        }
    });

    let reader = async {
        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    if server_tx
                        .send(ServerMessage::CommandReceived { viewer_id, text })
                        .is_err()
                    {
                        break;
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(Message::Binary(_)) => {
                    warn!("Ignoring binary frame from viewer {}", viewer_id);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Read error from viewer {}: {}", viewer_id, e);
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = reader => {}
        _ = &mut writer => {
            debug!("Outgoing queue for viewer {} closed", viewer_id);
        }
    }

    let _ = server_tx.send(ServerMessage::ViewerDisconnected { viewer_id });
    writer.abort();
    Ok(())
}
