//! casement runtime: a tiling window display on a UI thread serving an
//! embedded program on its own thread.
//!
//! [`session::Session`] is what the program talks to. It owns the window
//! tree and mirrors every change to the [`display::Display`] through the
//! shared task channel. The display's [`controller::Controller`]s turn
//! those changes, and the renderer's input, into layout and events.

pub mod controller;
pub mod display;
pub mod program;
pub mod session;
pub mod timer;

#[cfg(test)]
mod testing;
