use std::env;
use std::path::PathBuf;

/// Environment variables that change how `ffmpeg-sys-next` finds FFmpeg.
const WATCHED_VARIABLES: [&str; 4] = [
    "FFMPEG_DIR",
    "VCPKG_ROOT",
    "VCPKGRS_DYNAMIC",
    "VCPKGRS_TRIPLET",
];

fn main() {
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    // Only Windows builds need help locating FFmpeg; elsewhere pkg-config does it.
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    if env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    match vcpkg_ffmpeg_dir() {
        None => println!(
            "cargo:warning=thumbpick: FFMPEG_DIR is not set. Install FFmpeg via vcpkg and set VCPKG_ROOT or FFMPEG_DIR."
        ),
        Some(dir) if dir.exists() => {
            println!(
                "cargo:warning=thumbpick: found vcpkg FFmpeg at {}; set FFMPEG_DIR={} to use it explicitly.",
                dir.display(),
                dir.display(),
            );
            if env::var_os("VCPKGRS_DYNAMIC").is_none() {
                println!(
                    "cargo:warning=thumbpick: set VCPKGRS_DYNAMIC=1 when linking a dynamic vcpkg FFmpeg."
                );
            }
        }
        Some(dir) => println!(
            "cargo:warning=thumbpick: VCPKG_ROOT is set but {} does not exist.",
            dir.display(),
        ),
    }
}

/// `$VCPKG_ROOT/installed/<triplet>`, if `VCPKG_ROOT` is set.
fn vcpkg_ffmpeg_dir() -> Option<PathBuf> {
    let root = env::var("VCPKG_ROOT").ok()?;
    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    Some(PathBuf::from(root).join("installed").join(triplet))
}
