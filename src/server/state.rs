use axum::extract::FromRef;

use crate::library::MusicLibrary;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::ServerConfig;

/// The selected music library, if any. Set once by `set_music_folder` and
/// cloned out by every request that needs it.
pub type GuardedLibrary = Arc<Mutex<Option<MusicLibrary>>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub library: GuardedLibrary,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, library: GuardedLibrary) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            library,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedLibrary {
    fn from_ref(input: &ServerState) -> Self {
        input.library.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
