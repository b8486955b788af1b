//! Page Viewer Widget
//! Central scrollable panel that displays a rendered page: headings, text,
//! striped tables and plot images rasterized once per navigation.

use crate::charts::StaticChartRenderer;
use crate::page::{Page, RenderOp, TableData};
use egui::load::SizedTexture;
use egui::{Color32, ColorImage, RichText, ScrollArea, TextureHandle, TextureOptions};

const TITLE: &str = "Car Price Analysis";
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Rasterized plot, or why it could not be drawn.
enum PlotImage {
    Texture(TextureHandle),
    Failed(String),
}

/// What the central panel currently shows.
enum Content {
    Empty(String),
    Page {
        page: Page,
        /// One entry per image op, in page order.
        images: Vec<PlotImage>,
    },
    Error(String),
}

pub struct PageViewer {
    content: Content,
}

impl Default for PageViewer {
    fn default() -> Self {
        Self {
            content: Content::Empty("Loading dataset...".to_string()),
        }
    }
}

impl PageViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a page, rasterizing its plots at the given size.
    pub fn set_page(&mut self, ctx: &egui::Context, page: Page, width: u32, height: u32) {
        let images = page
            .images()
            .enumerate()
            .map(|(i, plot)| match StaticChartRenderer::render(plot, width, height) {
                Ok(image) => {
                    let size = [image.width() as usize, image.height() as usize];
                    let color_image = ColorImage::from_rgb(size, image.as_raw());
                    PlotImage::Texture(ctx.load_texture(
                        format!("plot_{i}"),
                        color_image,
                        TextureOptions::LINEAR,
                    ))
                }
                Err(err) => {
                    log::warn!("Could not render {}: {err}", plot.title());
                    PlotImage::Failed(err.to_string())
                }
            })
            .collect();

        self.content = Content::Page { page, images };
    }

    /// Replace the page with a visible error.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.content = Content::Error(message.into());
    }

    /// Draw the viewer
    pub fn show(&mut self, ui: &mut egui::Ui) {
        ScrollArea::vertical().show(ui, |ui| {
            ui.label(RichText::new(TITLE).size(28.0).strong());
            ui.add_space(10.0);

            match &self.content {
                Content::Empty(message) => {
                    ui.label(RichText::new(message).size(16.0).color(Color32::GRAY));
                }
                Content::Error(message) => {
                    ui.label(RichText::new(message).size(16.0).color(ERROR_COLOR));
                }
                Content::Page { page, images } => Self::show_page(ui, page, images),
            }
        });
    }

    fn show_page(ui: &mut egui::Ui, page: &Page, images: &[PlotImage]) {
        let mut images = images.iter();

        for (index, op) in page.ops().iter().enumerate() {
            match op {
                RenderOp::Heading { level: 1, text } => {
                    ui.label(RichText::new(text).size(22.0).strong());
                }
                RenderOp::Heading { text, .. } => {
                    ui.label(RichText::new(text).size(17.0).strong());
                }
                RenderOp::Paragraph(text) => {
                    ui.label(text);
                }
                RenderOp::Table(table) => Self::show_table(ui, index, table),
                RenderOp::Image(_) => match images.next() {
                    Some(PlotImage::Texture(texture)) => {
                        ui.image(SizedTexture::new(texture.id(), texture.size_vec2()));
                    }
                    Some(PlotImage::Failed(message)) => {
                        ui.label(
                            RichText::new(format!("Plot unavailable: {message}"))
                                .color(ERROR_COLOR),
                        );
                    }
                    None => {}
                },
            }
            ui.add_space(8.0);
        }
    }

    fn show_table(ui: &mut egui::Ui, index: usize, table: &TableData) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal()
                    .id_salt(("page_table_scroll", index))
                    .show(ui, |ui| {
                        egui::Grid::new(("page_table", index))
                            .striped(true)
                            .min_col_width(40.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for cell in &table.header {
                                    ui.label(RichText::new(cell).strong().size(12.0));
                                }
                                ui.end_row();

                                for row in &table.rows {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(12.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
