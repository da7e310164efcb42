//! Menu component
//!
//! Ties the controller to everything the toggle button and the overlay
//! need to draw: localized labels, the hamburger icon and the link list.

use std::sync::Arc;

use crate::content::{MenuData, MenuLink, MenuView};
use crate::controller::OverlayController;
use crate::locale::{LabelCatalog, MenuLabels};
use crate::navigation::NavigationSink;
use crate::state::OverlayState;

/// Bars drawn by the hamburger icon while the overlay is closed
const CLOSED_ICON_BARS: usize = 3;
/// Bars left once the overlay is mounted (the middle one)
const MOUNTED_ICON_BARS: usize = 1;

/// The slide-in navigation menu
pub struct Menu {
    controller: OverlayController,
    data: MenuData,
    locale: String,
    labels: MenuLabels,
    sink: Arc<dyn NavigationSink>,
}

impl Menu {
    pub fn new(
        controller: OverlayController,
        data: MenuData,
        catalog: &LabelCatalog,
        locale: &str,
        sink: Arc<dyn NavigationSink>,
    ) -> Self {
        Self {
            controller,
            data,
            locale: locale.to_string(),
            labels: catalog.labels(locale).clone(),
            sink,
        }
    }

    pub fn controller(&self) -> &OverlayController {
        &self.controller
    }

    pub fn state(&self) -> OverlayState {
        self.controller.state()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn labels(&self) -> &MenuLabels {
        &self.labels
    }

    pub fn data(&self) -> &MenuData {
        &self.data
    }

    /// Replace the content shown on the next render
    pub fn set_data(&mut self, data: MenuData) {
        self.data = data;
    }

    /// Text on the toggle button
    pub fn toggle_label(&self) -> &str {
        if self.controller.is_mounted() {
            self.labels.close.as_str()
        } else {
            self.labels.open.as_str()
        }
    }

    /// Number of bars in the hamburger icon
    pub fn icon_bars(&self) -> usize {
        if self.controller.is_mounted() {
            MOUNTED_ICON_BARS
        } else {
            CLOSED_ICON_BARS
        }
    }

    /// Overlay content, or `None` while unmounted
    pub fn view(&self) -> Option<MenuView> {
        self.controller
            .is_mounted()
            .then(|| MenuView::build(&self.data, &self.labels))
    }

    /// Follow a link from the overlay
    pub fn activate(&self, link: &MenuLink) {
        tracing::debug!("Menu: activating '{}' -> {}", link.label, link.path);
        self.sink.navigate(&link.path);
    }

    /// Toggle button click
    pub async fn toggle(&self) -> OverlayState {
        self.controller.request_toggle().await
    }
}
