use crate::{
    context::{SkiaGlContext, SurfaceSettings},
    error::{Error, Result},
    gl::{self, Gl},
    loader,
    settings::{WindowMode, WindowSettings},
    skia::Canvas,
};
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{
        ContextApi, ContextAttributesBuilder, NotCurrentContext, PossiblyCurrentContext, Version,
    },
    display::{Display, GetGlDisplay},
    prelude::*,
    surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use raw_window_handle::{HasRawWindowHandle, RawWindowHandle};
use std::num::NonZeroU32;
use winit::{
    dpi::PhysicalSize,
    event_loop::EventLoopWindowTarget,
    window::{Fullscreen, Window as WinitWindow, WindowBuilder},
};

/// A winit window with a current GL context and a Skia surface on its
/// default framebuffer.
pub struct GlWindow {
    // XXX field order is drop order: Skia needs the context, the surface must
    // go before the window.
    skia: SkiaGlContext,
    gl_context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    gl: &'static Gl,
    window: WinitWindow,
}
impl GlWindow {
    pub fn new(
        window_target: &EventLoopWindowTarget<()>,
        settings: &WindowSettings,
    ) -> Result<Self> {
        let window_builder = window_builder(window_target, settings)?;

        // Only windows requires the window to be present before creating the display.
        let display_window_builder = if cfg!(wgl_backend) {
            Some(window_builder.clone())
        } else {
            None
        };

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_stencil_size(8)
            .with_transparency(cfg!(cgl_backend));

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(display_window_builder)
            .build(window_target, template, |configs| {
                // glutin only calls the picker with at least one matching config.
                pick_config(configs, settings.srgb).expect("display offered no GL config")
            })
            .map_err(|err| Error::Display(err.to_string()))?;

        tracing::debug!(
            samples = gl_config.num_samples(),
            stencil = gl_config.stencil_size(),
            srgb = gl_config.srgb_capable(),
            "picked GL config"
        );

        let window = match window {
            Some(window) => window,
            None => glutin_winit::finalize_window(window_target, window_builder, &gl_config)?,
        };

        let size = window.inner_size();
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Err(Error::InvalidSize {
                width: size.width,
                height: size.height,
            });
        };

        let raw_window_handle = window.raw_window_handle();
        let gl_display = gl_config.display();
        let not_current = try_create_context(&gl_display, &gl_config, raw_window_handle)?;

        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new()
            .with_srgb(Some(settings.srgb))
            .build(raw_window_handle, width, height);
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs)? };

        // The loader needs a current context.
        let gl_context = not_current.make_current(&surface)?;
        let gl = loader::ensure_gl_loaded(&gl_display);

        if settings.srgb {
            unsafe { gl.Enable(gl::FRAMEBUFFER_SRGB_EXT) };
        }

        if settings.vsync {
            if let Err(err) =
                surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                tracing::warn!(%err, "cannot enable vsync");
            }
        }

        let (width, height) = gl_size(width, height)?;
        unsafe { gl.Viewport(0, 0, width, height) };

        let skia = SkiaGlContext::new(
            &gl_display,
            gl,
            width,
            height,
            SurfaceSettings::default()
                .with_srgb(settings.srgb)
                .with_samples(gl_config.num_samples().into())
                .with_stencil_bits(gl_config.stencil_size().into()),
        )?;

        Ok(Self {
            skia,
            gl_context,
            surface,
            gl,
            window,
        })
    }
    pub fn winit_window(&self) -> &WinitWindow {
        &self.window
    }
    pub fn skia(&mut self) -> &mut SkiaGlContext {
        &mut self.skia
    }
    pub fn make_current_if_needed(&self) -> Result<()> {
        if !self.gl_context.is_current() {
            self.gl_context.make_current(&self.surface)?;
        }
        Ok(())
    }
    pub fn draw(&mut self, paint: impl FnOnce(&mut Canvas)) -> Result<()> {
        self.make_current_if_needed()?;
        self.skia.draw(paint);
        self.surface.swap_buffers(&self.gl_context)?;
        Ok(())
    }
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(());
        };

        self.make_current_if_needed()?;
        // Some platforms like EGL require resizing GL surface to update the size.
        self.surface.resize(&self.gl_context, width, height);

        let (width, height) = gl_size(width, height)?;
        unsafe { self.gl.Viewport(0, 0, width, height) };
        self.skia.resize(width, height)
    }
    /// Runs raw GL calls between Skia frames. Skia's pending work is flushed
    /// first and all of its cached GL state is invalidated afterwards.
    pub fn with_raw_gl<T>(&mut self, f: impl FnOnce(&Gl) -> T) -> Result<T> {
        self.make_current_if_needed()?;
        self.skia.flush();
        let out = f(self.gl);
        self.skia.reset_backend_state();
        Ok(out)
    }
}

fn window_builder(
    window_target: &EventLoopWindowTarget<()>,
    settings: &WindowSettings,
) -> Result<WindowBuilder> {
    let builder = WindowBuilder::new().with_title(settings.title.as_str());

    Ok(match settings.mode {
        WindowMode::Windowed { width, height } => {
            builder.with_inner_size(PhysicalSize::new(width, height))
        }
        WindowMode::Borderless => {
            let monitor = window_target
                .primary_monitor()
                .ok_or(Error::NoPrimaryMonitor)?;
            builder.with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))))
        }
        WindowMode::Fullscreen => {
            let monitor = window_target
                .primary_monitor()
                .ok_or(Error::NoPrimaryMonitor)?;
            let video_mode = monitor
                .video_modes()
                .max_by_key(|mode| {
                    video_mode_rank(mode.size(), mode.refresh_rate_millihertz())
                })
                .ok_or(Error::NoVideoMode)?;
            builder.with_fullscreen(Some(Fullscreen::Exclusive(video_mode)))
        }
    })
}

/// Larger area first, then higher refresh rate.
fn video_mode_rank(size: PhysicalSize<u32>, refresh_rate_millihertz: u32) -> (u64, u32) {
    (
        u64::from(size.width) * u64::from(size.height),
        refresh_rate_millihertz,
    )
}

fn pick_config(configs: impl Iterator<Item = Config>, srgb: bool) -> Option<Config> {
    configs.reduce(|accum, config| {
        if srgb && config.srgb_capable() != accum.srgb_capable() {
            return if config.srgb_capable() { config } else { accum };
        }

        let transparency_check = config.supports_transparency().unwrap_or(false)
            & !accum.supports_transparency().unwrap_or(false);

        if transparency_check || config.num_samples() > accum.num_samples() {
            config
        } else {
            accum
        }
    })
}

fn try_create_context(
    gl_display: &Display,
    gl_config: &Config,
    raw_window_handle: RawWindowHandle,
) -> glutin::error::Result<NotCurrentContext> {
    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));

    // Since glutin by default tries to create OpenGL core context, which may not be
    // present we should try gles.
    let fallback_context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::Gles(None))
        .build(Some(raw_window_handle));

    // There are also some old devices that support neither modern OpenGL nor GLES.
    let legacy_context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(2, 1))))
        .build(Some(raw_window_handle));

    unsafe {
        gl_display
            .create_context(gl_config, &context_attributes)
            .or_else(|_| gl_display.create_context(gl_config, &fallback_context_attributes))
            .or_else(|_| gl_display.create_context(gl_config, &legacy_context_attributes))
    }
}

fn gl_size(width: NonZeroU32, height: NonZeroU32) -> Result<(i32, i32)> {
    match (i32::try_from(width.get()), i32::try_from(height.get())) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(Error::InvalidSize {
            width: width.get(),
            height: height.get(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_mode_rank_prefers_area_then_refresh_rate() {
        let hd = video_mode_rank(PhysicalSize::new(1920, 1080), 60_000);
        let hd_fast = video_mode_rank(PhysicalSize::new(1920, 1080), 144_000);
        let uhd = video_mode_rank(PhysicalSize::new(3840, 2160), 30_000);

        assert!(hd_fast > hd);
        assert!(uhd > hd_fast);
    }

    #[test]
    fn video_mode_rank_does_not_overflow() {
        let (area, _) = video_mode_rank(PhysicalSize::new(u32::MAX, u32::MAX), 0);
        assert_eq!(area, u64::from(u32::MAX) * u64::from(u32::MAX));
    }

    #[test]
    fn backend_aliases_follow_platform_and_features() {
        assert_eq!(cfg!(wgl_backend), cfg!(all(feature = "wgl", windows)));
        assert_eq!(cfg!(cgl_backend), cfg!(target_os = "macos"));
    }

    #[test]
    fn gl_size_accepts_regular_sizes() {
        let size = gl_size(NonZeroU32::new(800).unwrap(), NonZeroU32::new(600).unwrap());
        assert_eq!(size.unwrap(), (800, 600));
    }

    #[test]
    fn gl_size_rejects_sizes_beyond_glsizei() {
        let err = gl_size(NonZeroU32::MAX, NonZeroU32::new(600).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSize {
                width: u32::MAX,
                height: 600
            }
        ));
    }
}
