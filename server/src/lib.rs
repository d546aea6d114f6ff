//! # Cube Server Library
//!
//! This library provides the authoritative server for the shared cube. It
//! owns the one live cube, applies commands from any viewer, and pushes the
//! resulting state to every connected viewer.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! The server holds the only mutable copy of the cube. Viewers never edit
//! their local copy; they send commands and wait for the next snapshot.
//!
//! ### Viewer Management
//! Handles the lifecycle of viewer connections:
//! - Connection establishment and viewer ID assignment
//! - Capacity limits, with a close frame for viewers that do not fit
//! - Disconnection handling and cleanup of dead outgoing queues
//! - IDLE/LIVE presence tracking
//!
//! ### State Broadcasting
//! A newly connected viewer receives the current snapshot as its first frame.
//! Every accepted command is followed by one snapshot sent to all viewers,
//! serialized once and shared.
//!
//! ## Architecture Design
//!
//! ### Single Command Loop
//! Connection tasks only move frames. All cube access happens in one loop fed
//! by a single channel, so commands from concurrent viewers never interleave
//! and every viewer observes the same sequence of states.
//!
//! ### WebSocket Transport
//! Commands and snapshots are JSON text frames. Malformed frames and commands
//! naming an unknown face are logged and dropped without closing the
//! connection.
//!
//! ## Module Organization
//!
//! ### Client Manager Module (`client_manager`)
//! Viewer registry, ID assignment, presence and fan-out.
//!
//! ### Game Module (`game`)
//! The cube session: applies ROTATE, RESET, SCRAMBLE and CHECKERBOARD.
//!
//! ### Network Module (`network`)
//! Listener, per-connection tasks and the main server loop.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Bind on the default port, allow 64 viewers, random piece ids
//!     let server = Server::new("127.0.0.1:8888", 64, None).await?;
//!
//!     // Runs until a Shutdown message arrives
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod game;
pub mod network;
