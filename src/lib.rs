pub mod gl {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));

    pub use Gles2 as Gl;
}

mod app;
mod context;
mod error;
pub mod ffi;
pub mod loader;
mod settings;
pub mod skia;
mod window;

pub use skia_safe;
pub use {
    app::{run, App},
    context::{SkiaGlContext, SurfaceSettings},
    error::{Error, Result},
    loader::{
        ensure_gl_loaded, initialize_gl_loader, resolve_proc_address, GetProcAddressFn,
        ProcAddressResolver,
    },
    settings::{WindowMode, WindowSettings},
    window::GlWindow,
};
