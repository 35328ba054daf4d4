pub mod app;
pub mod draw;
pub mod events;
pub mod graph;
pub mod layout;
pub mod run;
pub mod views;

pub use app::Dashboard;
pub use layout::*;
pub use run::run;
