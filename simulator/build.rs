//! Build script for efi-simulator
//!
//! With the `window` feature on Windows, points the linker at a vendored SDL2
//! and copies SDL2.dll next to the binary. Headless builds need no SDL2.

use std::path::{Path, PathBuf};
use std::{env, fs};

fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_WINDOW");

    if env::var_os("CARGO_FEATURE_WINDOW").is_none() {
        return;
    }
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from) else {
        return;
    };
    let Some(workspace_dir) = manifest_dir.parent() else {
        return;
    };
    let vendor_sdl2 = workspace_dir.join("vendor").join("sdl2");
    println!("cargo:rerun-if-changed={}", vendor_sdl2.display());

    if !vendor_sdl2.exists() {
        println!(
            "cargo:warning=SDL2 vendor directory not found at {}",
            vendor_sdl2.display()
        );
        println!("cargo:warning=The window feature needs SDL2.lib and SDL2.dll in vendor/sdl2/");
        return;
    }

    println!("cargo:rustc-link-search=native={}", vendor_sdl2.display());

    if let Some(target_dir) = env::var_os("OUT_DIR").as_deref().map(Path::new).and_then(profile_dir) {
        copy_dll(&vendor_sdl2.join("SDL2.dll"), &target_dir.join("SDL2.dll"));
    }
}

/// `target/<profile>` above OUT_DIR (`target/<profile>/build/<pkg>-<hash>/out`).
fn profile_dir(out_dir: &Path) -> Option<PathBuf> {
    out_dir
        .ancestors()
        .find(|p| p.file_name().is_some_and(|n| n == "release" || n == "debug"))
        .map(Path::to_path_buf)
}

fn copy_dll(
    src: &Path,
    dst: &Path,
) {
    if !src.exists() || dst.exists() {
        return;
    }
    if let Err(e) = fs::copy(src, dst) {
        println!("cargo:warning=Failed to copy SDL2.dll: {e}");
    }
}
