//! Session host tied to a canvas mount.
//!
//! A [`CanvasHost`] is created per mount point and passed by reference to
//! every panel. It owns at most one live [`CanvasSession`]; `init()` replaces
//! any previous one and `dispose()` tears it down. Using the host outside that
//! window is a [`LifecycleError`].
//!
//! ```
//! use designer_core::{CanvasConfig, CanvasHost};
//!
//! let host = CanvasHost::new(CanvasConfig::default()).unwrap();
//! assert!(host.read(|s| s.layer_count()).is_err());
//!
//! host.init().unwrap();
//! let id = host.update(|s| s.add_text("Hello", None)).unwrap();
//! assert_eq!(host.read(|s| s.get_layers()[0].id).unwrap(), id);
//!
//! host.dispose().unwrap();
//! assert!(host.read(|s| s.layer_count()).is_err());
//! ```

use std::cell::RefCell;

use crate::asset::AssetResolver;
use crate::config::CanvasConfig;
use crate::element::{ElementId, ImageStyle};
use crate::error::{CanvasError, CanvasResult, LifecycleError};
use crate::measure::{HeuristicMeasurer, TextMeasurer};
use crate::session::CanvasSession;
use crate::surface::{NullSurface, RenderSurface};

#[derive(Debug)]
enum HostState {
    Uninitialized,
    Live(Box<CanvasSession>),
    Disposed,
}

/// Owner of the live session for one canvas mount.
#[derive(Debug)]
pub struct CanvasHost {
    state: RefCell<HostState>,
    config: CanvasConfig,
}

impl CanvasHost {
    /// Create a host. No session exists until [`Self::init`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::CanvasError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: CanvasConfig) -> CanvasResult<Self> {
        config.validate()?;
        Ok(Self {
            state: RefCell::new(HostState::Uninitialized),
            config,
        })
    }

    /// Start a headless session, replacing any live one.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Busy`] if called from inside [`Self::read`] or
    /// [`Self::update`].
    pub fn init(&self) -> CanvasResult<()> {
        self.init_with(Box::new(NullSurface), Box::new(HeuristicMeasurer::default()))
    }

    /// Start a session on a render surface, replacing any live one.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Busy`] if called from inside [`Self::read`] or
    /// [`Self::update`].
    pub fn init_with(
        &self,
        surface: Box<dyn RenderSurface>,
        measurer: Box<dyn TextMeasurer>,
    ) -> CanvasResult<()> {
        let session = CanvasSession::new(self.config.clone(), surface, measurer);
        let previous = self.swap(HostState::Live(Box::new(session)))?;
        if let HostState::Live(mut old) = previous {
            old.dispose();
            tracing::info!("Replaced live canvas session");
        } else {
            tracing::info!("Canvas session initialized");
        }
        Ok(())
    }

    /// Tear down the live session. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Busy`] if called from inside [`Self::read`] or
    /// [`Self::update`].
    pub fn dispose(&self) -> CanvasResult<bool> {
        let previous = self.swap(HostState::Disposed)?;
        if let HostState::Live(mut session) = previous {
            session.dispose();
            tracing::info!("Canvas session disposed");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn swap(&self, next: HostState) -> CanvasResult<HostState> {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| LifecycleError::Busy)?;
        Ok(std::mem::replace(&mut *state, next))
    }

    /// Whether a session is live.
    #[must_use]
    pub fn is_live(&self) -> bool {
        // only read/update hold a borrow past their call, and only on a live session
        matches!(
            self.state.try_borrow().as_deref(),
            Ok(HostState::Live(_)) | Err(_)
        )
    }

    /// The host's configuration.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Run `f` with shared access to the live session.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if no session is live or it is already
    /// mutably borrowed.
    pub fn read<R, F>(&self, f: F) -> CanvasResult<R>
    where
        F: FnOnce(&CanvasSession) -> R,
    {
        let state = self.state.try_borrow().map_err(|_| LifecycleError::Busy)?;
        match &*state {
            HostState::Live(session) => Ok(f(session)),
            HostState::Uninitialized => Err(LifecycleError::NotInitialized.into()),
            HostState::Disposed => Err(LifecycleError::Disposed.into()),
        }
    }

    /// Run `f` with exclusive access to the live session.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if no session is live or it is already borrowed.
    pub fn update<R, F>(&self, f: F) -> CanvasResult<R>
    where
        F: FnOnce(&mut CanvasSession) -> R,
    {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| LifecycleError::Busy)?;
        match &mut *state {
            HostState::Live(session) => Ok(f(session)),
            HostState::Uninitialized => Err(LifecycleError::NotInitialized.into()),
            HostState::Disposed => Err(LifecycleError::Disposed.into()),
        }
    }

    /// Resolve an image and place it on the live session.
    ///
    /// The session is not borrowed while the resolver runs. If the session
    /// was disposed or replaced in the meantime the result is discarded and
    /// `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if no session is live when the call starts
    /// or the session is borrowed when the image is placed, and
    /// [`crate::CanvasError::Resource`] if resolution fails. The scene is
    /// unchanged in every error case.
    pub async fn add_image<R>(
        &self,
        resolver: &R,
        source: &str,
        style: ImageStyle,
    ) -> CanvasResult<Option<ElementId>>
    where
        R: AssetResolver + ?Sized,
    {
        let pending = self.read(|s| s.begin_image(source, style))?;
        let asset = resolver
            .resolve(source)
            .await
            .inspect_err(|e| tracing::warn!("Failed to resolve image {}: {}", source, e))?;

        let placed = self.update(move |s| s.place_image(pending, &asset));
        discard_if_gone(placed, None, source)
    }

    /// Resolve and install a background image on the live session.
    ///
    /// Returns `Ok(false)` if the session went away during resolution.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if no session is live when the call starts
    /// or the session is borrowed when the background is placed, and
    /// [`crate::CanvasError::Resource`] if resolution fails. The previous
    /// background stays in place on error.
    pub async fn set_background<R>(&self, resolver: &R, source: &str) -> CanvasResult<bool>
    where
        R: AssetResolver + ?Sized,
    {
        let pending = self.read(|s| s.begin_background(source))?;
        let asset = resolver
            .resolve(source)
            .await
            .inspect_err(|e| tracing::warn!("Failed to resolve background {}: {}", source, e))?;

        let placed = self.update(move |s| s.place_background(pending, &asset));
        discard_if_gone(placed, false, source)
    }
}

/// Swap a placement that failed because the session is gone for `fallback`.
/// A busy session is still an error.
fn discard_if_gone<T>(placed: CanvasResult<T>, fallback: T, source: &str) -> CanvasResult<T> {
    match placed {
        Err(CanvasError::Lifecycle(LifecycleError::Disposed | LifecycleError::NotInitialized)) => {
            tracing::info!("Discarding {}: session no longer live", source);
            Ok(fallback)
        }
        other => other,
    }
}
