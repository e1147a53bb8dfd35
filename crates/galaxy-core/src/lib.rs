pub mod audio;
pub mod billboard;
pub mod camera;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod hover;
pub mod playlist;
pub mod scene;

pub use audio::*;
pub use billboard::*;
pub use camera::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use hover::*;
pub use playlist::*;
pub use scene::*;
