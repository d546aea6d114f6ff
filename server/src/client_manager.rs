//! Viewer connection management for the cube server
//!
//! This module tracks the viewers currently attached to the shared cube:
//! - Viewer connection lifecycle (connect, disconnect, dead channel cleanup)
//! - Capacity limits and viewer ID assignment
//! - IDLE/LIVE presence, which never affects the cube itself
//! - Fan-out of serialized snapshots to every viewer's outgoing queue
//!
//! The manager only holds outgoing queues. Socket I/O happens in the
//! per-connection tasks owned by the network module.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::Message;

pub type ViewerId = u32;

/// Snapshots that may wait in one viewer's outgoing queue. A viewer that
/// falls further behind is dropped and gets a fresh snapshot on reconnect.
pub const OUTGOING_QUEUE_CAPACITY: usize = 32;

/// Server presence: `Idle` with no viewers, `Live` with at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Idle,
    Live,
}

/// A connected viewer and its outgoing message queue
#[derive(Debug)]
pub struct Viewer {
    /// Unique viewer identifier assigned by the server
    pub id: ViewerId,
    /// Remote address, for logging
    pub addr: SocketAddr,
    pub connected_at: Instant,
    /// Commands received from this viewer, accepted or not
    pub commands_received: u64,
    sender: mpsc::Sender<Message>,
}

impl Viewer {
    pub fn new(id: ViewerId, addr: SocketAddr, sender: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            addr,
            connected_at: Instant::now(),
            commands_received: 0,
            sender,
        }
    }

    /// Queues a text frame. Returns false if the connection task is gone
    /// or the queue is full.
    pub fn send_text(&self, text: &str) -> bool {
        match self.sender.try_send(Message::Text(text.to_string())) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Viewer {} is not keeping up", self.id);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

/// Registry of connected viewers
///
/// Viewers join and leave independently; the registry only decides who
/// receives the next snapshot. IDs start at 1 and are never reused.
pub struct ClientManager {
    viewers: HashMap<ViewerId, Viewer>,
    next_viewer_id: ViewerId,
    max_viewers: usize,
}

impl ClientManager {
    pub fn new(max_viewers: usize) -> Self {
        Self {
            viewers: HashMap::new(),
            next_viewer_id: 1,
            max_viewers,
        }
    }

    /// Registers a viewer. Returns None when the server is at capacity.
    pub fn add_viewer(
        &mut self,
        addr: SocketAddr,
        sender: mpsc::Sender<Message>,
    ) -> Option<ViewerId> {
        if self.viewers.len() >= self.max_viewers {
            return None;
        }

        let viewer_id = self.next_viewer_id;
        self.next_viewer_id += 1;

        let was_idle = self.presence() == Presence::Idle;
        self.viewers
            .insert(viewer_id, Viewer::new(viewer_id, addr, sender));
        info!("Viewer {} connected from {}", viewer_id, addr);
        if was_idle {
            info!("Presence IDLE -> LIVE");
        }

        Some(viewer_id)
    }

    /// Removes a viewer. Returns true if it was registered.
    pub fn remove_viewer(&mut self, viewer_id: &ViewerId) -> bool {
        match self.viewers.remove(viewer_id) {
            Some(viewer) => {
                info!(
                    "Viewer {} disconnected after {:.1}s and {} commands",
                    viewer.id,
                    viewer.connected_at.elapsed().as_secs_f32(),
                    viewer.commands_received
                );
                if self.viewers.is_empty() {
                    info!("Presence LIVE -> IDLE");
                }
                true
            }
            None => false,
        }
    }

    pub fn record_command(&mut self, viewer_id: ViewerId) {
        if let Some(viewer) = self.viewers.get_mut(&viewer_id) {
            viewer.commands_received += 1;
        }
    }

    /// Sends to one viewer, dropping it if its queue is closed or full.
    pub fn send_to(&mut self, viewer_id: ViewerId, text: &str) -> bool {
        let delivered = self
            .viewers
            .get(&viewer_id)
            .map(|viewer| viewer.send_text(text))
            .unwrap_or(false);
        if !delivered {
            self.remove_viewer(&viewer_id);
        }
        delivered
    }

    /// Sends to every viewer. Viewers whose queue is closed or full are
    /// dropped and returned.
    pub fn broadcast(&mut self, text: &str) -> Vec<ViewerId> {
        let dead: Vec<ViewerId> = self
            .viewers
            .values()
            .filter(|viewer| !viewer.send_text(text))
            .map(|viewer| viewer.id)
            .collect();

        for viewer_id in &dead {
            debug!("Dropping viewer {} with closed or full queue", viewer_id);
            self.remove_viewer(viewer_id);
        }
        dead
    }

    pub fn presence(&self) -> Presence {
        if self.viewers.is_empty() {
            Presence::Idle
        } else {
            Presence::Live
        }
    }

    pub fn viewer(&self, viewer_id: ViewerId) -> Option<&Viewer> {
        self.viewers.get(&viewer_id)
    }

    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }
}
