//! Purpose: Compile the Hammer layout shim and optionally link libhammer for Rust FFI.
//! Role: Cargo build-script; configures `cc` inputs/includes and rebuild triggers.
//! Invariants: The shim is compiled with the same compiler/ABI as the crate's C objects.
//! Invariants: `HAMMER_INCLUDE_DIR` selects the engine's real `hammer.h` over the bundled mirror.
//! Invariants: libhammer is only linked with the `link-hammer` feature.
//! Invariants: Uses only Cargo-provided env vars plus `HAMMER_INCLUDE_DIR`/`HAMMER_LIB_DIR`.
use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let shim_dir = manifest_dir.join("c");

    println!("cargo:rerun-if-changed=c/hammer_shim.c");
    println!("cargo:rerun-if-changed=c/hammer_layout.h");
    println!("cargo:rerun-if-env-changed=HAMMER_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=HAMMER_LIB_DIR");

    let mut build = cc::Build::new();
    build.include(&shim_dir).file(shim_dir.join("hammer_shim.c"));

    if let Some(include_dir) = env::var_os("HAMMER_INCLUDE_DIR") {
        let include_dir = PathBuf::from(include_dir);
        if !include_dir.join("hammer.h").exists() {
            panic!(
                "HAMMER_INCLUDE_DIR is set to `{}` but it does not contain hammer.h.\n\
                 Fix: point it at the directory holding the engine's public headers, or unset it \
                 to use the bundled layout mirror.",
                include_dir.display()
            );
        }
        build
            .include(&include_dir)
            .define("HAMMER_AST_SYSTEM_HEADER", None);
    }

    build.compile("hammer_ast_shim");

    if env::var_os("CARGO_FEATURE_LINK_HAMMER").is_some() {
        link_hammer();
    }
}

fn link_hammer() {
    if let Some(lib_dir) = env::var_os("HAMMER_LIB_DIR") {
        let lib_dir = PathBuf::from(lib_dir);
        if !lib_dir.exists() {
            panic!(
                "HAMMER_LIB_DIR is set to `{}` but the directory does not exist",
                lib_dir.display()
            );
        }
        println!("cargo:rustc-link-search=native={}", lib_dir.display());
    }
    println!("cargo:rustc-link-lib=static=hammer");
}
