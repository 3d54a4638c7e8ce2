mod data;
mod error;
pub mod markdown;
mod playback_server;
mod util;

pub use data::{InteractionData, RequestData, ResponseData};
pub use error::Error;
pub use playback_server::PlaybackServer;
pub use smoke_codegen::playback_test;
