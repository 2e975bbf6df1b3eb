mod refresh;
mod types;
mod view;

pub use refresh::RefreshLoop;
pub use view::{CountdownView, Phase};
