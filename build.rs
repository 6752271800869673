use std::process::Command;

fn main() {
    // Git hash (short)
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|o| {
            if o.status.success() {
                Some(String::from_utf8_lossy(&o.stdout).trim().to_string())
            } else {
                None
            }
        });
    println!(
        "cargo:rustc-env=QUILT_GIT_HASH={}",
        git_hash.unwrap_or_else(|| "unknown".to_string())
    );
    // Dirty flag
    let dirty = Command::new("git")
        .args(["diff", "--quiet"])
        .status()
        .map(|s| if s.success() { "clean" } else { "dirty" })
        .unwrap_or("unknown");
    println!("cargo:rustc-env=QUILT_GIT_DIRTY={}", dirty);
    println!("cargo:rerun-if-changed=build.rs");
}
