pub mod effects;
pub mod rules;
pub mod timer;
pub mod render;

pub use effects::BoardPatch;
pub use rules::CaptureRules;
pub use timer::BlitzTimer;
pub use render::*;
