use std::path::Path;
use std::process::Command;

/// `git describe` of the workspace, or "unknown" outside a checkout.
fn describe(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!rev.is_empty()).then_some(rev)
}

fn main() {
    let manifest = std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default();
    let workspace = Path::new(&manifest).join("..");

    // Source tarballs carry no .git; packagers can pin the revision instead.
    let rev = std::env::var("FINSIGHT_BUILD_SHA")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| describe(&workspace))
        .unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=FINSIGHT_BUILD_SHA={rev}");
    println!("cargo:rerun-if-env-changed=FINSIGHT_BUILD_SHA");
    println!("cargo:rerun-if-changed={}", workspace.join(".git/HEAD").display());
    println!("cargo:rerun-if-changed={}", workspace.join(".git/index").display());
}
