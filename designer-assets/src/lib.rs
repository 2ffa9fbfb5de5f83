//! # Designer Assets
//!
//! Image asset resolution for the design canvas. Turns the opaque source
//! strings handed over by an upload component into natural dimensions the
//! scene can place.
//!
//! ## Sources
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            ImageResolver (AssetResolver)    │
//! ├─────────────┬─────────────┬─────────────────┤
//! │ data: URI   │ File path / │ http(s), blob:  │
//! │ (base64 or  │ file:// URL │ (rejected, host │
//! │  percent)   │ (tokio::fs) │  fetches these) │
//! └─────────────┴─────────────┴─────────────────┘
//! ```
//!
//! ```no_run
//! use designer_assets::ImageResolver;
//! use designer_core::{CanvasConfig, CanvasHost, ImageStyle};
//!
//! # async fn run() -> designer_core::CanvasResult<()> {
//! let host = CanvasHost::new(CanvasConfig::default())?;
//! host.init()?;
//! let resolver = ImageResolver::new().with_base_dir("uploads");
//! let id = host.add_image(&resolver, "logo.png", ImageStyle::default()).await?;
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod error;
pub mod resolver;
pub mod source;

pub use decode::ImageInfo;
pub use image::ImageFormat;
pub use error::{AssetError, AssetResult};
pub use resolver::{CacheStats, ImageResolver};
pub use source::ImageSource;
