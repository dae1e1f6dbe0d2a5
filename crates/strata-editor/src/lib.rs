//! # Strata Editor
//!
//! The interactive layer of Strata: a [`World`] of depth-ordered layers
//! driven by a per-frame loop, the [`Workshop`] state machine that turns
//! clicked points into shapes, demo worlds, and a [`Session`] tying a
//! world to its database and the text command prompt.
//!
//! Input arrives as [`InputEvent`]s; drawing goes to any
//! [`strata_renderer::Surface`].

pub mod catalog;
pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod input;
pub mod observer;
pub mod session;
pub mod workshop;
pub mod world;

pub use catalog::{CatalogEntry, WorldCatalog};
pub use commands::{CommandRegistry, PointAcquisition, WorkshopCommand};
pub use config::EditorConfig;
pub use demo::{demo_names, DemoKind, TiledContent};
pub use error::EditorError;
pub use input::{Button, InputEvent, Key};
pub use observer::{Observers, SubscriptionId};
pub use session::{PromptOutcome, Session};
pub use workshop::{GridSettings, Workshop, WorkshopOutcome, WorkshopSettings};
pub use world::{LayerInfo, World};
