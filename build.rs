// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

const SHIM: &str = "sbmbo_notice";

fn main() {
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "macos" {
        return;
    }

    // CFRunLoop and CFString for the tap and AX glue
    println!("cargo:rustc-link-lib=framework=CoreFoundation");
    println!("cargo:rustc-link-lib=framework=Foundation");
    // NSPanel, NSTextField and NSAnimationContext behind the size label
    println!("cargo:rustc-link-lib=framework=Cocoa");

    build_label_shim();
}

fn sdk_path() -> String {
    let output = Command::new("xcrun")
        .arg("--show-sdk-path")
        .output()
        .expect("xcrun not found; install the Xcode command line tools");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn run(cmd: &mut Command, what: &str) {
    let status = cmd.status().unwrap_or_else(|e| panic!("{}: could not start ({})", what, e));
    if !status.success() {
        panic!("{}: exited with {}", what, status);
    }
}

/// Compile the Swift label panel into libsbmbo_notice.a and link it with the
/// Swift runtime it needs
fn build_label_shim() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");

    let swift_file = src_dir.join(format!("{}.swift", SHIM));
    let header_file = src_dir.join(format!("{}.h", SHIM));
    let obj_file = out_dir.join(format!("{}.o", SHIM));
    let lib_file = out_dir.join(format!("lib{}.a", SHIM));
    let sdk = sdk_path();

    // -parse-as-library: the shim has no top-level code, only @_cdecl entry points
    run(
        Command::new("swiftc")
            .arg("-parse-as-library")
            .arg("-c")
            .arg(&swift_file)
            .arg("-import-objc-header")
            .arg(&header_file)
            .arg("-sdk")
            .arg(&sdk)
            .arg("-o")
            .arg(&obj_file),
        "swiftc",
    );
    run(Command::new("ar").arg("rcs").arg(&lib_file).arg(&obj_file), "ar");

    println!("cargo:rustc-link-search=native={}", out_dir.display());
    println!("cargo:rustc-link-lib=static={}", SHIM);

    println!("cargo:rustc-link-search=native={}/usr/lib/swift", sdk);
    for lib in ["swiftCore", "swiftFoundation", "swiftAppKit", "swiftCoreFoundation", "swiftDispatch"] {
        println!("cargo:rustc-link-lib=dylib={}", lib);
    }

    println!("cargo:rerun-if-changed={}", swift_file.display());
    println!("cargo:rerun-if-changed={}", header_file.display());
}
