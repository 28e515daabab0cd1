pub mod menu;
pub mod session;

pub use menu::Menu;
pub use session::{LoadOutcome, Session};
