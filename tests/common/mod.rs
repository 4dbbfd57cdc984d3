//! Common test infrastructure
//!
//! Tests import the server harness and file fixtures from here.

mod fixtures;
mod server;

#[allow(unused_imports)]
pub use fixtures::{png_bytes, wav_bytes, write_png_cover, write_wav};
pub use server::TestServer;
