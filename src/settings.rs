//! Lightbox settings: options, callbacks, and how overrides merge onto defaults.
//!
//! Settings come in two halves:
//!
//! - **Options**: plain values the session and the renderer read
//!   (`autoplaySpeed`, `overlayColor`, ...). Typed as [`Options`], supplied
//!   as a flat TOML table of overrides.
//! - **Callbacks**: closures fired on session transitions
//!   (`onSlideChange`, `onLightboxOpened`, `onLightboxClosed`, `onCountSlides`).
//!
//! ## Merge
//!
//! Precedence is `defaults < overrides`, per key and shallow: a key present in
//! the overrides replaces the default, every other key keeps its default.
//! Unknown option keys are ignored, not rejected. When both halves of the
//! overrides are empty the defaults are returned as they are.
//!
//! ```toml
//! # lightbox.toml: override only what differs
//! autoplaySpeed = 5000
//! showThumbnails = false
//! ```
//!
//! ## Change detection
//!
//! [`merge`] is pure. Whether a freshly merged value should replace the
//! stored one is a separate question answered by [`settings_differ`]: options
//! are compared by value, callbacks by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Settings validation error: {0}")]
    Validation(String),
}

/// Recognized lightbox options. Keys are camelCase in TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Milliseconds between automatic slides. `0` disables autoplay.
    pub autoplay_speed: u64,
    pub buttons_icon_padding: String,
    pub buttons_background_color: String,
    pub buttons_icon_color: String,
    pub buttons_size: String,
    pub caption_color: String,
    pub caption_font_family: String,
    pub caption_font_size: String,
    pub caption_font_style: String,
    pub caption_font_weight: String,
    pub enable_panzoom: bool,
    /// Milliseconds of inactivity before controls hide. `0` keeps them visible.
    pub hide_controls_after: u64,
    pub overlay_color: String,
    pub show_caption: bool,
    pub show_thumbnails: bool,
    pub slide_transition_speed: u64,
    /// Opacity of inactive thumbnails, 0 to 1.
    pub thumbnails_opacity: f64,
    pub transition_speed: u64,
    pub transition_timing_function: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            autoplay_speed: 3000,
            buttons_icon_padding: "0px".to_string(),
            buttons_background_color: "rgba(30,30,36,0.8)".to_string(),
            buttons_icon_color: "rgba(255, 255, 255, 0.8)".to_string(),
            buttons_size: "40px".to_string(),
            caption_color: "#FFFFFF".to_string(),
            caption_font_family: "inherit".to_string(),
            caption_font_size: "inherit".to_string(),
            caption_font_style: "inherit".to_string(),
            caption_font_weight: "inherit".to_string(),
            enable_panzoom: true,
            hide_controls_after: 3000,
            overlay_color: "rgba(0, 0, 0, 0.9)".to_string(),
            show_caption: true,
            show_thumbnails: true,
            slide_transition_speed: 600,
            thumbnails_opacity: 0.4,
            transition_speed: 500,
            transition_timing_function: "ease".to_string(),
        }
    }
}

impl Options {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.thumbnails_opacity) {
            return Err(SettingsError::Validation(
                "thumbnailsOpacity must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }

    /// Autoplay period, `None` when disabled.
    pub fn autoplay_interval(&self) -> Option<Duration> {
        (self.autoplay_speed > 0).then(|| Duration::from_millis(self.autoplay_speed))
    }

    /// Idle time before controls hide, `None` when they never hide.
    pub fn controls_idle(&self) -> Option<Duration> {
        (self.hide_controls_after > 0).then(|| Duration::from_millis(self.hide_controls_after))
    }
}

/// Transition callbacks. `None` means "use the default", which is a no-op.
///
/// Callbacks run synchronously inside a session transition and must not
/// call back into the session.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_slide_change: Option<Rc<dyn Fn(usize)>>,
    pub on_lightbox_opened: Option<Rc<dyn Fn()>>,
    pub on_lightbox_closed: Option<Rc<dyn Fn()>>,
    pub on_count_slides: Option<Rc<dyn Fn(usize)>>,
}

impl Callbacks {
    pub fn on_slide_change(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_slide_change = Some(Rc::new(f));
        self
    }

    pub fn on_lightbox_opened(mut self, f: impl Fn() + 'static) -> Self {
        self.on_lightbox_opened = Some(Rc::new(f));
        self
    }

    pub fn on_lightbox_closed(mut self, f: impl Fn() + 'static) -> Self {
        self.on_lightbox_closed = Some(Rc::new(f));
        self
    }

    pub fn on_count_slides(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_count_slides = Some(Rc::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_slide_change.is_none()
            && self.on_lightbox_opened.is_none()
            && self.on_lightbox_closed.is_none()
            && self.on_count_slides.is_none()
    }

    /// Per-slot override: `self`'s callbacks win, gaps fall back to `base`.
    fn over(&self, base: &Callbacks) -> Callbacks {
        Callbacks {
            on_slide_change: self
                .on_slide_change
                .clone()
                .or_else(|| base.on_slide_change.clone()),
            on_lightbox_opened: self
                .on_lightbox_opened
                .clone()
                .or_else(|| base.on_lightbox_opened.clone()),
            on_lightbox_closed: self
                .on_lightbox_closed
                .clone()
                .or_else(|| base.on_lightbox_closed.clone()),
            on_count_slides: self
                .on_count_slides
                .clone()
                .or_else(|| base.on_count_slides.clone()),
        }
    }

    /// Same closure in every slot.
    pub fn same_as(&self, other: &Callbacks) -> bool {
        fn same<T: ?Sized>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        }
        same(&self.on_slide_change, &other.on_slide_change)
            && same(&self.on_lightbox_opened, &other.on_lightbox_opened)
            && same(&self.on_lightbox_closed, &other.on_lightbox_closed)
            && same(&self.on_count_slides, &other.on_count_slides)
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_slide_change", &self.on_slide_change.is_some())
            .field("on_lightbox_opened", &self.on_lightbox_opened.is_some())
            .field("on_lightbox_closed", &self.on_lightbox_closed.is_some())
            .field("on_count_slides", &self.on_count_slides.is_some())
            .finish()
    }
}

/// Merged settings. Replaced as a whole, never edited key by key.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub options: Options,
    pub callbacks: Callbacks,
}

/// Caller-supplied overrides.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Flat `camelCaseKey = value` table.
    pub options: toml::Table,
    pub callbacks: Callbacks,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.callbacks.is_empty()
    }
}

/// Merge `overrides` onto `defaults`.
///
/// Fails if an override has the wrong type for its key or the merged
/// options are out of range; the caller keeps its previous settings then.
pub fn merge(defaults: &Settings, overrides: &Overrides) -> Result<Settings, SettingsError> {
    if overrides.is_empty() {
        return Ok(defaults.clone());
    }

    let mut table = options_table(&defaults.options)?;
    for (key, value) in &overrides.options {
        if table.contains_key(key) {
            table.insert(key.clone(), value.clone());
        } else {
            tracing::debug!(key = %key, "ignoring unrecognized option");
        }
    }
    let options: Options = toml::Value::Table(table).try_into()?;
    options.validate()?;

    Ok(Settings {
        options,
        callbacks: overrides.callbacks.over(&defaults.callbacks),
    })
}

/// Options serialized as a flat TOML table.
pub fn options_table(options: &Options) -> Result<toml::Table, SettingsError> {
    match toml::Value::try_from(options)? {
        toml::Value::Table(table) => Ok(table),
        _ => Err(SettingsError::Validation(
            "options must serialize to a table".into(),
        )),
    }
}

/// Whether replacing `current` with `next` is observable.
pub fn settings_differ(current: &Settings, next: &Settings) -> bool {
    current.options != next.options || !current.callbacks.same_as(&next.callbacks)
}

/// Read option overrides from a TOML file. A missing file means no overrides.
pub fn load_overrides(path: &Path) -> Result<toml::Table, SettingsError> {
    if !path.exists() {
        return Ok(toml::Table::new());
    }
    let content = std::fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&content)?;
    Ok(table)
}

/// A fully commented `lightbox.toml` listing every option at its default.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lightbox options
# ================
# Every key is optional. Keys you leave out keep the value shown here.
# Unknown keys are ignored.

# Milliseconds between automatic slides while the lightbox is open.
# 0 disables autoplay.
autoplaySpeed = 3000

# Milliseconds without interaction before the controls hide.
# 0 keeps them visible.
hideControlsAfter = 3000

# Overlay behind the current slide.
overlayColor = "rgba(0, 0, 0, 0.9)"

# Caption below the slide.
showCaption = true
captionColor = "#FFFFFF"
captionFontFamily = "inherit"
captionFontSize = "inherit"
captionFontStyle = "inherit"
captionFontWeight = "inherit"

# Thumbnail strip; inactive thumbnails are drawn at this opacity (0 to 1).
showThumbnails = true
thumbnailsOpacity = 0.4

# Pan and zoom on the current slide.
enablePanzoom = true

# Navigation buttons.
buttonsBackgroundColor = "rgba(30,30,36,0.8)"
buttonsIconColor = "rgba(255, 255, 255, 0.8)"
buttonsIconPadding = "0px"
buttonsSize = "40px"

# Transitions, in milliseconds.
slideTransitionSpeed = 600
transitionSpeed = 500
transitionTimingFunction = "ease"
"##
}
