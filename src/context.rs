use crate::{
    error::{Error, Result},
    gl::{self, types::GLint, Gl},
    loader::{self, ProcAddressResolver},
    skia::{
        self, BackendRenderTarget, Canvas, ColorSpace, ColorType, DirectContext,
        FramebufferInfo, GlFormat, Interface, Surface, SurfaceOrigin,
    },
};
use std::ffi::CStr;

/// How the Skia surface on top of the window framebuffer is set up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSettings {
    pub srgb: bool,
    pub samples: usize,
    pub stencil_bits: usize,
}
impl SurfaceSettings {
    pub fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }
    pub fn with_stencil_bits(mut self, stencil_bits: usize) -> Self {
        self.stencil_bits = stencil_bits;
        self
    }

    fn framebuffer_format(&self) -> u32 {
        if self.srgb {
            GlFormat::SRGB8_ALPHA8.into()
        } else {
            GlFormat::RGBA8.into()
        }
    }
}

/// A Skia GPU context drawing into the framebuffer bound when it was created.
///
/// The GL context must be current and the function table loaded before
/// creating one.
pub struct SkiaGlContext {
    fb_info: FramebufferInfo,
    settings: SurfaceSettings,
    surface: Surface,
    gr_context: DirectContext,
}
impl SkiaGlContext {
    pub fn new<R>(
        resolver: &R,
        gl: &Gl,
        width: i32,
        height: i32,
        settings: SurfaceSettings,
    ) -> Result<Self>
    where
        R: ProcAddressResolver + ?Sized,
    {
        let interface = Interface::new_load_with(|name| loader::resolve_str(resolver, name))
            .ok_or(Error::SkiaInterface)?;
        let mut gr_context = DirectContext::new_gl(interface, None).ok_or(Error::SkiaContext)?;

        let fb_info = {
            let mut fboid: GLint = 0;
            unsafe { gl.GetIntegerv(gl::FRAMEBUFFER_BINDING, &mut fboid) };

            FramebufferInfo {
                fboid: fboid.try_into().unwrap_or_default(),
                format: settings.framebuffer_format(),
            }
        };
        let surface = create_skia_surface(width, height, &settings, &fb_info, &mut gr_context)?;

        log_context_info(gl, width, height);

        Ok(Self {
            fb_info,
            settings,
            surface,
            gr_context,
        })
    }
    pub fn canvas(&mut self) -> &mut Canvas {
        self.surface.canvas()
    }
    pub fn direct_context(&mut self) -> &mut DirectContext {
        &mut self.gr_context
    }
    pub fn size(&self) -> (i32, i32) {
        (self.surface.width(), self.surface.height())
    }
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        self.surface = create_skia_surface(
            width,
            height,
            &self.settings,
            &self.fb_info,
            &mut self.gr_context,
        )?;
        Ok(())
    }
    /// Lets `paint` draw over the current framebuffer content and flushes to
    /// the GPU.
    pub fn draw(&mut self, paint: impl FnOnce(&mut Canvas)) {
        paint(self.surface.canvas());
        self.flush();
    }
    pub fn flush(&mut self) {
        self.gr_context.flush_and_submit();
    }
    /// To be called after GL state was changed behind Skia's back.
    pub fn reset_backend_state(&mut self) {
        skia::reset_backend_state(&mut self.gr_context);
    }
}

fn create_skia_surface(
    width: i32,
    height: i32,
    settings: &SurfaceSettings,
    fb_info: &FramebufferInfo,
    gr_context: &mut DirectContext,
) -> Result<Surface> {
    let backend_render_target = BackendRenderTarget::new_gl(
        (width, height),
        Some(settings.samples),
        settings.stencil_bits,
        *fb_info,
    );
    let color_space = settings.srgb.then(ColorSpace::new_srgb);

    Surface::from_backend_render_target(
        gr_context,
        &backend_render_target,
        SurfaceOrigin::BottomLeft,
        ColorType::RGBA8888,
        color_space,
        None,
    )
    .ok_or(Error::SkiaSurface)
}

fn log_context_info(gl: &Gl, width: i32, height: i32) {
    let (mut major, mut minor): (GLint, GLint) = (0, 0);
    let glsl = unsafe {
        gl.GetIntegerv(gl::MAJOR_VERSION, &mut major);
        gl.GetIntegerv(gl::MINOR_VERSION, &mut minor);

        let glsl = gl.GetString(gl::SHADING_LANGUAGE_VERSION);
        if glsl.is_null() {
            "unknown".to_owned()
        } else {
            CStr::from_ptr(glsl.cast()).to_string_lossy().into_owned()
        }
    };

    let version = format!("{major}.{minor}");
    tracing::info!(
        width,
        height,
        version = %version,
        glsl = %glsl,
        "created OpenGL Skia context"
    );
}
