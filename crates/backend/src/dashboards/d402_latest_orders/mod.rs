pub mod render;
pub mod service;
pub mod state;

pub use render::RenderError;
pub use state::DashboardState;
