/// Main configuration module.
///
/// Re-exports the game configuration: default constants and the per-match [`GameConfig`].
pub mod game;

pub use game::GameConfig;
