/// Attach-time options, set by the embedding host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Expose debug-only values and the `handles` listing.
    pub debug: bool,
    /// SPIC event classes to report; bits as in [`crate::spic::EventClass`].
    pub event_mask: u32,
    /// SPIC compatibility init sequence (`0x92` instead of `0x82`).
    pub compat: bool,
    /// Allow SPIC motion eye camera commands.
    pub camera: bool,
    /// Initial keyboard backlight mode; `None` keeps the firmware's setting.
    pub kbd_backlight: Option<u8>,
    /// Initial keyboard backlight timeout; `None` keeps the firmware's setting.
    pub kbd_backlight_timeout: Option<u8>,
    /// Initial hybrid graphics mode; `None` leaves it untouched.
    pub speed_stamina: Option<GfxMode>,
    /// Another driver owns the panel backlight.
    pub video_backlight_owned: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            event_mask: u32::MAX,
            compat: false,
            camera: false,
            kbd_backlight: None,
            kbd_backlight_timeout: None,
            speed_stamina: None,
            video_backlight_owned: false,
        }
    }
}

/// Hybrid graphics selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GfxMode {
    Speed,
    Stamina,
    Auto,
}

impl GfxMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Stamina => "stamina",
            Self::Auto => "auto",
        }
    }
}
