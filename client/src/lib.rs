//! # Cube Viewer Library
//!
//! Terminal viewer for the shared cube. It keeps a read-only copy of the
//! server's cube, prints it as an unfolded net, and turns typed commands into
//! protocol messages.
//!
//! ## Architecture Overview
//!
//! The viewer never predicts. Every command goes to the server, and the
//! local copy changes only when the next snapshot arrives. Since every
//! snapshot is complete, a viewer that joins late or misses a frame is back
//! in sync after the next one.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! Local cube state:
//! - Snapshot decoding into a piece grid
//! - The face-center table used to resolve clicked pieces
//! - Solved status as reported by the server
//!
//! ### Input Module (`input`)
//! Parses terminal lines (`reset`, `rotate RED ccw`, `pick <id>`,
//! `R U R' U'`, ...) into commands.
//!
//! ### Network Module (`network`)
//! WebSocket connection, snapshot intake and the interactive loop.
//!
//! ### Rendering Module (`rendering`)
//! Text net of the cube built from each sticker's world position.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//! use shared::{Command, Direction, Face};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect("ws://127.0.0.1:8888", true).await?;
//!
//!     // The first frame is always a full snapshot
//!     client.next_snapshot().await?;
//!
//!     client.send(&Command::rotate(Face::Red, Direction::Clockwise)).await?;
//!     client.next_snapshot().await?;
//!     assert!(!client.state().is_solved());
//!
//!     Ok(())
//! }
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
