use cfg_aliases::cfg_aliases;
use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};
use std::{env, fs::File, path::PathBuf};

fn main() {
    // Backend aliases read by the window setup, matching the glutin feature set.
    cfg_aliases! {
        wasm_platform: { target_family = "wasm" },
        macos_platform: { target_os = "macos" },

        wgl_backend: { all(feature = "wgl", windows, not(wasm_platform)) },
        cgl_backend: { all(macos_platform, not(wasm_platform)) },
    }

    let dest = PathBuf::from(&env::var("OUT_DIR").unwrap());

    println!("cargo:rerun-if-changed=build.rs");

    let mut file = File::create(dest.join("gl_bindings.rs")).unwrap();
    Registry::new(
        Api::Gles2,
        (3, 0),
        Profile::Core,
        Fallbacks::All,
        ["GL_EXT_sRGB_write_control"],
    )
    .write_bindings(StructGenerator, &mut file)
    .unwrap();
}
