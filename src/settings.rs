/// How the window occupies the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Windowed { width: u32, height: u32 },
    /// Fullscreen on the primary monitor, keeping the desktop video mode.
    Borderless,
    /// Exclusive fullscreen on the primary monitor, using its largest video mode.
    Fullscreen,
}
impl Default for WindowMode {
    fn default() -> Self {
        WindowMode::Windowed {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    pub title: String,
    pub mode: WindowMode,
    pub srgb: bool,
    pub vsync: bool,
}
impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: env!("CARGO_PKG_NAME").to_owned(),
            mode: WindowMode::default(),
            srgb: false,
            vsync: true,
        }
    }
}
impl WindowSettings {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
    pub fn with_mode(mut self, mode: WindowMode) -> Self {
        self.mode = mode;
        self
    }
    pub fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_windowed_vsync() {
        let settings = WindowSettings::default();
        assert_eq!(settings.title, "skia-gl-glue");
        assert_eq!(
            settings.mode,
            WindowMode::Windowed {
                width: 1280,
                height: 720
            }
        );
        assert!(settings.vsync);
        assert!(!settings.srgb);
    }

    #[test]
    fn builders_override_fields() {
        let settings = WindowSettings::default()
            .with_title("demo")
            .with_mode(WindowMode::Borderless)
            .with_srgb(true)
            .with_vsync(false);

        assert_eq!(settings.title, "demo");
        assert_eq!(settings.mode, WindowMode::Borderless);
        assert!(settings.srgb);
        assert!(!settings.vsync);
    }
}
