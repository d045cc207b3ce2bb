//! Loads OpenGL function pointers through a windowing library's
//! procedure-address resolver.
//!
//! The process keeps a single function table, filled once after a context is
//! made current and read for the rest of the process lifetime. Calling any
//! function from the table still requires a current context on the calling
//! thread.

use crate::{
    error::{Error, Result},
    gl::Gl,
};
use glutin::{display::Display, prelude::*};
use std::{
    ffi::{c_char, c_void, CStr, CString},
    ptr::{self, NonNull},
    sync::OnceLock,
};

/// C signature of a procedure-address resolver, as exposed by GLFW, SDL and
/// the native `*GetProcAddress` entry points.
pub type GetProcAddressFn = unsafe extern "C" fn(name: *const c_char) -> *const c_void;

/// Something able to turn a GL symbol name into an address for the current
/// context.
pub trait ProcAddressResolver {
    /// Returns the address of `name`, or null if it cannot be resolved.
    fn proc_address(&self, name: &CStr) -> *const c_void;
}

impl ProcAddressResolver for Display {
    fn proc_address(&self, name: &CStr) -> *const c_void {
        self.get_proc_address(name)
    }
}

impl ProcAddressResolver for GetProcAddressFn {
    fn proc_address(&self, name: &CStr) -> *const c_void {
        unsafe { (*self)(name.as_ptr()) }
    }
}

impl<F> ProcAddressResolver for F
where
    F: Fn(&CStr) -> *const c_void,
{
    fn proc_address(&self, name: &CStr) -> *const c_void {
        self(name)
    }
}

struct GlTable(Gl);

// SAFETY: the table only holds function addresses and is never written after
// it has been loaded.
unsafe impl Send for GlTable {}
unsafe impl Sync for GlTable {}

static GL: OnceLock<GlTable> = OnceLock::new();

/// Forwards `name` to the resolver. No caching and no check of the returned
/// address: the caller casts it to the right function type.
pub fn resolve_proc_address<R>(resolver: &R, name: &CStr) -> Option<NonNull<c_void>>
where
    R: ProcAddressResolver + ?Sized,
{
    NonNull::new(resolver.proc_address(name).cast_mut())
}

/// Like [`resolve_proc_address`] for Rust string names. Names containing an
/// interior NUL never resolve.
pub fn resolve_str<R>(resolver: &R, name: &str) -> *const c_void
where
    R: ProcAddressResolver + ?Sized,
{
    match CString::new(name) {
        Ok(name) => resolver.proc_address(&name),
        Err(_) => ptr::null(),
    }
}

/// Builds a standalone function table without touching the process-wide one.
pub fn load_gl<R>(resolver: &R) -> Gl
where
    R: ProcAddressResolver + ?Sized,
{
    let mut requested = 0usize;
    let mut resolved = 0usize;

    let gl = Gl::load_with(|symbol| {
        let address = resolve_str(resolver, symbol);
        requested += 1;
        if !address.is_null() {
            resolved += 1;
        }
        address
    });

    tracing::debug!(requested, resolved, "loaded OpenGL function table");
    gl
}

/// Populates the process-wide OpenGL function table.
///
/// Must run after a context has been made current on this thread. Doing it
/// earlier is not supported: on some platforms every lookup fails, on others
/// the addresses belong to a different context.
///
/// Only the first call loads anything; later calls leave the table as it is
/// and return [`Error::LoaderAlreadyInitialized`].
pub fn initialize_gl_loader<R>(resolver: &R) -> Result<&'static Gl>
where
    R: ProcAddressResolver + ?Sized,
{
    let mut loaded_now = false;
    let table = GL.get_or_init(|| {
        loaded_now = true;
        GlTable(load_gl(resolver))
    });

    if loaded_now {
        Ok(&table.0)
    } else {
        Err(Error::LoaderAlreadyInitialized)
    }
}

/// Returns the process-wide table, loading it with `resolver` if nobody has
/// done so yet.
pub fn ensure_gl_loaded<R>(resolver: &R) -> &'static Gl
where
    R: ProcAddressResolver + ?Sized,
{
    &GL.get_or_init(|| GlTable(load_gl(resolver))).0
}

/// The process-wide table, if it has been loaded.
pub fn gl() -> Option<&'static Gl> {
    GL.get().map(|table| &table.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    extern "C" fn stub() {}

    struct FakeResolver {
        known: &'static [&'static str],
    }
    impl ProcAddressResolver for FakeResolver {
        fn proc_address(&self, name: &CStr) -> *const c_void {
            let name = name.to_str().unwrap();
            if self.known.contains(&name) {
                stub as *const c_void
            } else {
                ptr::null()
            }
        }
    }

    #[derive(Default)]
    struct RecordingResolver {
        names: RefCell<Vec<String>>,
    }
    impl ProcAddressResolver for RecordingResolver {
        fn proc_address(&self, name: &CStr) -> *const c_void {
            self.names
                .borrow_mut()
                .push(name.to_string_lossy().into_owned());
            ptr::null()
        }
    }

    unsafe extern "C" fn c_resolver(name: *const c_char) -> *const c_void {
        if CStr::from_ptr(name).to_bytes() == b"glClear" {
            stub as *const c_void
        } else {
            ptr::null()
        }
    }

    const CORE: &[&str] = &["glClear", "glClearColor", "glDrawArrays", "glViewport"];

    #[test]
    fn unsupported_name_resolves_to_none() {
        let resolver = FakeResolver { known: CORE };
        assert!(resolve_proc_address(&resolver, c"glNotARealFunction").is_none());
    }

    #[test]
    fn supported_name_resolves_to_address() {
        let resolver = FakeResolver { known: CORE };
        let address = resolve_proc_address(&resolver, c"glClear").unwrap();
        assert_eq!(address.as_ptr().cast_const(), stub as *const c_void);
    }

    #[test]
    fn interior_nul_never_resolves() {
        let resolver = FakeResolver { known: CORE };
        assert!(resolve_str(&resolver, "glCl\0ear").is_null());
    }

    #[test]
    fn c_resolver_is_forwarded() {
        let resolver: GetProcAddressFn = c_resolver;
        assert!(resolve_proc_address(&resolver, c"glClear").is_some());
        assert!(resolve_proc_address(&resolver, c"glFlush").is_none());
    }

    #[test]
    fn closure_is_a_resolver() {
        let resolver = |name: &CStr| -> *const c_void {
            if name.to_bytes() == b"glViewport" {
                stub as *const c_void
            } else {
                ptr::null()
            }
        };

        assert!(resolve_proc_address(&resolver, c"glViewport").is_some());
        assert!(resolve_proc_address(&resolver, c"glClear").is_none());
        assert!(load_gl(&resolver).Viewport.is_loaded());
    }

    #[test]
    fn loaded_table_has_core_functions() {
        let gl = load_gl(&FakeResolver { known: CORE });

        assert!(gl.Clear.is_loaded());
        assert!(gl.DrawArrays.is_loaded());
        assert!(gl.Viewport.is_loaded());
        assert!(!gl.BlendFunc.is_loaded());
    }

    #[test]
    fn loader_asks_for_gl_symbols() {
        let resolver = RecordingResolver::default();
        let gl = load_gl(&resolver);

        let names = resolver.names.borrow();
        assert!(names.iter().any(|name| name == "glClear"));
        assert!(names.iter().all(|name| name.starts_with("gl")));
        assert!(!gl.Clear.is_loaded());
    }
}
