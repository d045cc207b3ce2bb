//! C entry points, declared in `include/skia_gl_glue.h`.
//!
//! C callers hand over their windowing library's resolver once (for GLFW,
//! `glfwGetProcAddress`), then use the two loader functions as they would
//! any other GL loader.

use crate::{
    loader::{self, GetProcAddressFn},
    skia,
};
use std::{
    ffi::{c_char, c_void, CStr},
    ptr,
    sync::OnceLock,
};

static RESOLVER: OnceLock<GetProcAddressFn> = OnceLock::new();

#[no_mangle]
pub static SKIA_GL_GLUE_ALL_BACKEND_STATE: u32 = skia::ALL_BACKEND_STATE;

/// Installs the resolver used by [`initialize_gl_loader`] and
/// [`resolve_proc_address`]. Returns `false` if `resolver` is null or one was
/// already installed.
#[no_mangle]
pub extern "C" fn skia_gl_glue_set_proc_address_resolver(
    resolver: Option<GetProcAddressFn>,
) -> bool {
    match resolver {
        Some(resolver) => RESOLVER.set(resolver).is_ok(),
        None => false,
    }
}

/// Loads the GL function table. Call once, after the context is current.
/// Nothing is reported back; problems are logged.
#[no_mangle]
pub extern "C" fn initialize_gl_loader() {
    let Some(resolver) = RESOLVER.get() else {
        tracing::error!("initialize_gl_loader called before a resolver was installed");
        return;
    };

    if let Err(err) = loader::initialize_gl_loader(resolver) {
        tracing::error!(%err, "cannot initialize OpenGL loader");
    }
}

/// Resolves `name` with the installed resolver. Returns null when `name` is
/// null, no resolver is installed, or the symbol is unknown to the current
/// context.
///
/// # Safety
///
/// `name` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn resolve_proc_address(name: *const c_char) -> *const c_void {
    if name.is_null() {
        return ptr::null();
    }
    let Some(resolver) = RESOLVER.get() else {
        return ptr::null();
    };

    let name = unsafe { CStr::from_ptr(name) };
    loader::resolve_proc_address(resolver, name).map_or(ptr::null(), |address| {
        address.as_ptr().cast_const()
    })
}
