// build.rs
use std::process::Command;

fn main() {
    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    let full_version = format!("{} {}{}-{}", version, short_head(), dirty_suffix(), profile);

    println!("cargo:rustc-env=HYPERSPECTRS_VERSION={}", full_version);
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn short_head() -> String {
    Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn dirty_suffix() -> &'static str {
    match Command::new("git").args(["diff", "--quiet"]).status() {
        // exit code 1 means changes; anything else (e.g. not a repo) is ignored
        Ok(status) if status.code() == Some(1) => "-dirty",
        _ => "",
    }
}
