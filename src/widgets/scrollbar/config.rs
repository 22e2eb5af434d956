// tokio-scrollbar/src/widgets/scrollbar/config.rs
use anyhow::{Context as _, Result};
use serde::{Deserialize, Deserializer};

/// Which dimension the scrollbar drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
}

impl Axis {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Axis::X)
    }
}

/// Resolved, immutable options of a single scrollbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarOptions {
    /// Vertical or horizontal scrollbar.
    pub axis: Axis,
    /// Handle wheel input at all.
    pub wheel: bool,
    /// Distance scrolled per wheel unit.
    pub wheel_speed: f64,
    /// Always swallow the native scroll, even at the content edges.
    pub wheel_lock: bool,
    /// Reverse the direction of touch drags.
    pub scroll_invert: bool,
    /// Fixed track length, `None` follows the viewport.
    pub track_size: Option<f64>,
    /// Fixed thumb length, `None` is proportional to the visible share.
    pub thumb_size: Option<f64>,
    /// When false the bar rests hidden and is flashed on interaction.
    pub always_visible: bool,
}

impl Default for ScrollbarOptions {
    fn default() -> Self {
        Self {
            axis: Axis::Y,
            wheel: true,
            wheel_speed: 40.0,
            wheel_lock: true,
            scroll_invert: false,
            track_size: None,
            thumb_size: None,
            always_visible: true,
        }
    }
}

impl ScrollbarOptions {
    /// Merge partial overrides field by field over `self`.
    pub fn merge(mut self, overrides: ScrollbarOverrides) -> Self {
        if let Some(axis) = overrides.axis {
            self.axis = axis;
        }
        if let Some(wheel) = overrides.wheel {
            self.wheel = wheel;
        }
        if let Some(speed) = overrides.wheel_speed {
            self.wheel_speed = speed;
        }
        if let Some(lock) = overrides.wheel_lock {
            self.wheel_lock = lock;
        }
        if let Some(invert) = overrides.scroll_invert {
            self.scroll_invert = invert;
        }
        if let Some(size) = overrides.track_size {
            self.track_size = size.fixed();
        }
        if let Some(size) = overrides.thumb_size {
            self.thumb_size = size.fixed();
        }
        if let Some(visible) = overrides.always_visible {
            self.always_visible = visible;
        }
        self
    }

    /// Parse a JSON override mapping such as `{"axis": "x", "wheelSpeed": 20}`
    /// and merge it over the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: ScrollbarOverrides =
            serde_json::from_str(json).context("invalid scrollbar options")?;
        Ok(Self::default().merge(overrides))
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_wheel_speed(mut self, wheel_speed: f64) -> Self {
        self.wheel_speed = wheel_speed;
        self
    }

    pub fn with_track_size(mut self, track_size: f64) -> Self {
        self.track_size = SizeOption::Fixed(track_size).fixed();
        self
    }

    pub fn with_thumb_size(mut self, thumb_size: f64) -> Self {
        self.thumb_size = SizeOption::Fixed(thumb_size).fixed();
        self
    }

    pub fn with_always_visible(mut self, always_visible: bool) -> Self {
        self.always_visible = always_visible;
        self
    }
}

/// A size option as it appears in user overrides: a number or `false` for auto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeOption {
    Auto,
    Fixed(f64),
}

impl SizeOption {
    /// Zero and non-finite sizes fall back to auto.
    fn fixed(self) -> Option<f64> {
        match self {
            SizeOption::Fixed(size) if size.is_finite() && size != 0.0 => Some(size),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for SizeOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Size(f64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(_) => SizeOption::Auto,
            Raw::Size(size) => SizeOption::Fixed(size),
        })
    }
}

/// User-supplied partial options. Unset fields keep their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScrollbarOverrides {
    pub axis: Option<Axis>,
    pub wheel: Option<bool>,
    pub wheel_speed: Option<f64>,
    pub wheel_lock: Option<bool>,
    pub scroll_invert: Option<bool>,
    pub track_size: Option<SizeOption>,
    pub thumb_size: Option<SizeOption>,
    pub always_visible: Option<bool>,
}

/// Command line flags for the scrollbar options.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScrollbarArgs {
    /// Scroll axis
    #[arg(long, value_enum)]
    pub axis: Option<Axis>,
    /// Disable wheel handling
    #[arg(long)]
    pub no_wheel: bool,
    /// Distance per wheel notch
    #[arg(long)]
    pub wheel_speed: Option<f64>,
    /// Let the host scroll once the content reaches an edge
    #[arg(long)]
    pub wheel_unlock: bool,
    /// Invert touch drag direction
    #[arg(long)]
    pub scroll_invert: bool,
    /// Fixed track length
    #[arg(long)]
    pub track_size: Option<f64>,
    /// Fixed thumb length
    #[arg(long)]
    pub thumb_size: Option<f64>,
    /// Hide the bar while idle
    #[arg(long)]
    pub auto_hide: bool,
    /// JSON override mapping applied before the flags
    #[arg(long)]
    pub options: Option<String>,
}

impl ScrollbarArgs {
    pub fn overrides(&self) -> ScrollbarOverrides {
        ScrollbarOverrides {
            axis: self.axis,
            wheel: self.no_wheel.then_some(false),
            wheel_speed: self.wheel_speed,
            wheel_lock: self.wheel_unlock.then_some(false),
            scroll_invert: self.scroll_invert.then_some(true),
            track_size: self.track_size.map(SizeOption::Fixed),
            thumb_size: self.thumb_size.map(SizeOption::Fixed),
            always_visible: self.auto_hide.then_some(false),
        }
    }

    /// Resolve defaults, then the JSON mapping, then explicit flags.
    pub fn resolve(&self) -> Result<ScrollbarOptions> {
        let base = match &self.options {
            Some(json) => ScrollbarOptions::from_json(json)?,
            None => ScrollbarOptions::default(),
        };
        Ok(base.merge(self.overrides()))
    }
}
