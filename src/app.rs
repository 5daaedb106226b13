//! Application module: the session controller used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the track and prompt
//! lists, the prompt field and the generation state. `app::intent` maps UI
//! intents onto it.

mod intent;
mod model;

pub use intent::*;
pub use model::*;
