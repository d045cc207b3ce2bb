use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The process-wide GL function table was already populated.
    #[error("the OpenGL loader has already been initialized")]
    LoaderAlreadyInitialized,

    #[error("windowing error: {0}")]
    Os(#[from] winit::error::OsError),

    #[error("GL context error: {0}")]
    Glutin(#[from] glutin::error::Error),

    #[error("cannot create GL display: {0}")]
    Display(String),

    #[error("no primary monitor available")]
    NoPrimaryMonitor,

    #[error("primary monitor reports no video mode")]
    NoVideoMode,

    #[error("window size must be non-zero, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("cannot create Skia GL interface")]
    SkiaInterface,

    #[error("cannot create Skia GPU context")]
    SkiaContext,

    #[error("cannot create Skia surface")]
    SkiaSurface,
}
