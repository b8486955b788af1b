//! Car Price Analysis Main Application
//! Main window with navigation panel and page viewer.

use crate::config::AppConfig;
use crate::data::{DataLoader, Table};
use crate::gui::{DataStatus, NavigationAction, NavigationPanel, PageViewer};
use crate::page::Page;
use crate::views::Section;
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Dataset loading result from background thread
enum LoadResult {
    Complete(Table),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: AppConfig,
    table: Option<Table>,
    nav_panel: NavigationPanel,
    page_viewer: PageViewer,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    /// Section changed or data arrived since the last render
    needs_render: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            config,
            table: None,
            nav_panel: NavigationPanel::new(),
            page_viewer: PageViewer::new(),
            load_rx: None,
            is_loading: false,
            needs_render: false,
        };
        app.start_loading();
        app
    }

    /// Fetch the dataset once, off the UI thread
    fn start_loading(&mut self) {
        if self.is_loading || self.table.is_some() {
            return;
        }

        let source = self.config.source();
        self.nav_panel
            .set_status(DataStatus::Loading(format!("Loading {source}...")));
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match DataLoader::new(source).into_table() {
                Ok(table) => LoadResult::Complete(table),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(table)) => {
                self.nav_panel.set_status(DataStatus::Ready(format!(
                    "Loaded {} rows, {} columns",
                    table.height(),
                    table.width()
                )));
                self.table = Some(table);
                self.is_loading = false;
                self.needs_render = true;
            }
            Ok(LoadResult::Error(error)) => {
                log::error!("{error}");
                self.nav_panel.set_status(DataStatus::Failed(error.clone()));
                self.page_viewer.set_error(error);
                self.is_loading = false;
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                let error = "Data unavailable: loader thread stopped".to_string();
                log::error!("{error}");
                self.nav_panel.set_status(DataStatus::Failed(error.clone()));
                self.page_viewer.set_error(error);
                self.is_loading = false;
            }
        }
    }

    /// Render the selected section into the viewer
    fn render_section(&mut self, ctx: &egui::Context) {
        self.needs_render = false;
        let Some(table) = &self.table else {
            return;
        };

        let section = self.nav_panel.selected;
        let mut page = Page::new();
        match section.render(table, &mut page) {
            Ok(()) => self.page_viewer.set_page(
                ctx,
                page,
                self.config.plot_width,
                self.config.plot_height,
            ),
            Err(e) => {
                log::error!("Section '{section}' failed: {e}");
                self.page_viewer
                    .set_error(format!("Could not render '{section}': {e}"));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Navigation
        SidePanel::left("nav_panel")
            .min_width(220.0)
            .max_width(280.0)
            .show(ctx, |ui| {
                if let NavigationAction::Selected(section) = self.nav_panel.show(ui) {
                    log::debug!("Navigated to '{section}'");
                    self.needs_render = true;
                }
            });

        if self.needs_render {
            self.render_section(ctx);
        }

        // Central panel - Page Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.page_viewer.show(ui);
        });
    }
}
