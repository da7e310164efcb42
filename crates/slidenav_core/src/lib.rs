//! Slidenav Core
//!
//! State machine and wiring for a slide-in navigation overlay: a toggle
//! reveals a full-screen panel of links, the panel animates in and out,
//! and it closes by itself whenever the host starts a page change.
//!
//! # Components
//!
//! - [`OverlayController`]: owns [`OverlayState`] and gates transitions
//! - [`Menu`]: labels, icon and link list derived from controller state
//! - [`NavigationBus`]: in-process navigation events and command sink
//! - [`LabelCatalog`]: locale tag to label table with fallback
//! - [`SlidenavConfig`]: TOML configuration for timings and labels
//!
//! Transitions are executed by a [`slidenav_animation::TransitionRunner`].

pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod locale;
pub mod menu;
pub mod navigation;
pub mod state;

pub use config::{LabelOverrides, SlidenavConfig, TransitionConfig};
pub use content::{MenuData, MenuEntry, MenuLink, MenuView, NavItem, ABOUT_PATH};
pub use controller::{OverlayController, OverlayTimings};
pub use error::{Result, SlidenavError};
pub use locale::{LabelCatalog, MenuLabels, DEFAULT_LOCALE};
pub use menu::Menu;
pub use navigation::{
    NavigationBus, NavigationEvent, NavigationEvents, NavigationSink, NavigationSubscription,
    NAVIGATION_HISTORY_LIMIT,
};
pub use state::{OverlayEvent, OverlayState, StateTransitions};
