use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let values = [
        ("HASH", git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(unknown)),
        ("STATUS", git_status()),
        (
            "TIMESTAMP",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        ),
        ("TARGET", env::var("TARGET").unwrap_or_else(|_| unknown())),
        ("PROFILE", env::var("PROFILE").unwrap_or_else(|_| unknown())),
        ("RUSTC", command_output("rustc", &["--version"]).unwrap_or_else(unknown)),
    ];
    for (key, value) in values {
        println!("cargo:rustc-env=RENTAL_CORE_BUILD_{key}={value}");
    }
}

fn unknown() -> String {
    "unknown".to_string()
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn git(args: &[&str]) -> Option<String> {
    command_output("git", args)
}

fn git_status() -> String {
    match Command::new("git").args(["status", "--porcelain"]).output() {
        Ok(output) if output.status.success() => {
            if output.stdout.iter().all(u8::is_ascii_whitespace) {
                "clean".into()
            } else {
                "dirty".into()
            }
        }
        _ => unknown(),
    }
}
