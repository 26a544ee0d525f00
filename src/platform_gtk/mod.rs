use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use gtk4 as gtk;
use gtk::glib;
use gtk::prelude::*;
use tracing::warn;

use crate::api::ChartEngine;
use crate::core::Viewport;
use crate::render::CairoPainter;

/// Hosts a [`ChartEngine`] inside a GTK4 `DrawingArea`.
///
/// The draw callback resizes the engine viewport to the widget, paints with
/// [`CairoPainter`] and arms a one-shot timer for debounced range commits.
pub struct GtkChartAdapter {
    engine: Rc<RefCell<ChartEngine>>,
    area: gtk::DrawingArea,
}

impl GtkChartAdapter {
    #[must_use]
    pub fn new(engine: ChartEngine) -> Self {
        let viewport = engine.viewport();
        let engine = Rc::new(RefCell::new(engine));
        let area = gtk::DrawingArea::new();
        area.set_content_width(i32::try_from(viewport.width).unwrap_or(i32::MAX));
        area.set_content_height(i32::try_from(viewport.height).unwrap_or(i32::MAX));

        let draw_engine = Rc::clone(&engine);
        let wakeup_armed = Rc::new(Cell::new(false));
        area.set_draw_func(move |area, context, width, height| {
            let mut engine = draw_engine.borrow_mut();
            if let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) {
                if let Err(err) = engine.set_viewport(Viewport::new(width, height)) {
                    warn!(error = %err, "skip resize to invalid widget size");
                }
            }

            let mut painter = CairoPainter::new(context);
            if let Err(err) = engine.draw(&mut painter) {
                warn!(error = %err, "chart draw failed");
            }

            if let Some(deadline) = engine.next_wakeup() {
                if !wakeup_armed.replace(true) {
                    let area = area.clone();
                    let armed = Rc::clone(&wakeup_armed);
                    let delay = deadline.saturating_duration_since(Instant::now());
                    glib::timeout_add_local_once(delay, move || {
                        armed.set(false);
                        area.queue_draw();
                    });
                }
            }
        });

        Self { engine, area }
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }

    #[must_use]
    pub fn engine(&self) -> Rc<RefCell<ChartEngine>> {
        Rc::clone(&self.engine)
    }

    /// Queues a redraw unless one is already pending.
    pub fn request_repaint(&self) {
        if self.engine.borrow_mut().request_repaint() {
            self.area.queue_draw();
        }
    }
}
