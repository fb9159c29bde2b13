use std::path::Path;
use std::process::Command;

const SHA_ENV: &str = "KOPILKA_BUILD_SHA";

fn main() {
    println!("cargo:rerun-if-env-changed={SHA_ENV}");

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let workspace = Path::new(&manifest_dir).join("..");
    let head = workspace.join(".git").join("HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }

    // Release tarballs have no .git; packagers pass the revision in.
    let sha = std::env::var(SHA_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| git_revision(&workspace))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={SHA_ENV}={sha}");
}

/// Short commit id, suffixed `-dirty` when the tree has local edits
fn git_revision(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!rev.is_empty()).then_some(rev)
}
