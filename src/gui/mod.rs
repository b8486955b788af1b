//! GUI module - User interface components

mod app;
mod nav_panel;
mod page_viewer;

pub use app::DashboardApp;
pub use nav_panel::{DataStatus, NavigationAction, NavigationPanel};
pub use page_viewer::PageViewer;
