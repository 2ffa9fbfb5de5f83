//! # Designer Core
//!
//! Design-canvas engine for composing text and image elements inside a
//! printable area: scene model, print-area clipping, viewport transform,
//! selection and interaction state machine, and synchronous change
//! notification for the panels that mirror canvas state.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ CanvasHost (one per mount, init / dispose)           │
//! │  └─ CanvasSession                                    │
//! ├──────────────────────────────────────────────────────┤
//! │  Scene Store      │  Interaction Handler             │
//! │  - Elements       │  - Select / drag / rotate / scale│
//! │  - Guides         │  - Marquee, pan, delete keys     │
//! │  - Z-order        │  Viewport (zoom, pan)            │
//! ├──────────────────────────────────────────────────────┤
//! │  Clip Manager     │  Property Mutator                │
//! │  - Print area     │  - Typed edits -> Commands       │
//! │  - Alignment      │  - Text re-measurement           │
//! ├──────────────────────────────────────────────────────┤
//! │  Notifier ──► panels re-pull Layers / Selection      │
//! │  Commands ──► RenderSurface                          │
//! └──────────────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assist;
pub mod asset;
pub mod clip;
pub mod command;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod layers;
pub mod measure;
pub mod notify;
pub mod property;
pub mod scene;
pub mod selection;
pub mod session;
pub mod surface;
pub mod viewport;

pub use assist::{MarginStatus, Suggestion};
pub use asset::{AssetResolver, ResolvedAsset, StaticResolver};
pub use clip::{ClipManager, HorizontalAlign, PrintArea, VerticalAlign};
pub use command::Command;
pub use config::{CanvasConfig, ZOOM_LIMITS};
pub use element::{
    ClipRegion, DesignElement, ElementId, ElementKind, FontStyle, FontWeight, ImageContent,
    ImageStyle, Shadow, Stroke, TextAlign, TextContent, TextStyle, Transform,
};
pub use error::{CanvasError, CanvasResult, LifecycleError};
pub use event::{
    FocusTarget, InputEvent, KeyEvent, KeyModifiers, PointerButton, PointerEvent, PointerPhase,
    WheelEvent,
};
pub use geometry::{Point, Rect, Size};
pub use host::CanvasHost;
pub use interaction::{InteractionResponse, InteractionState};
pub use layers::{LayerEntry, LayerKind};
pub use measure::{HeuristicMeasurer, TextMeasurer};
pub use notify::{Subscription, SubscriptionId};
pub use property::Property;
pub use scene::{Background, Guide, GuideKind, Scene};
pub use selection::Selection;
pub use session::{CanvasSession, PendingAsset};
pub use surface::{NullSurface, RecordingSurface, RenderSurface};
pub use viewport::Viewport;

/// Designer core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
