use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Crates the domain crate is allowed to depend on (normal dependencies).
const DOMAIN_ALLOWED_DEPS: &[&str] = &["serde", "thiserror"];

/// The orchestration core must stay free of adapters and runtime I/O.
const CORE_FORBIDDEN: &[(&str, &str)] = &[
    (r"\bcrate::infrastructure\b", "infrastructure adapters"),
    (r"\bcrate::runner\b", "the session runner"),
    (r"\btokio::", "the tokio runtime"),
    (r"\bstd::time::(Instant|SystemTime)\b", "wall-clock time"),
];

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
    workspace_root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    kind: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let mut violations = domain_dependency_violations(&metadata)?;
    let core_dir = metadata
        .workspace_root
        .join("crates/player/src/application");
    violations.extend(core_source_violations(&core_dir)?);

    if violations.is_empty() {
        println!("arch-check: ok");
        return Ok(());
    }

    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("{} architecture violation(s)", violations.len())
}

fn domain_dependency_violations(metadata: &Metadata) -> anyhow::Result<Vec<String>> {
    let domain = metadata
        .packages
        .iter()
        .find(|p| p.name == "tomie-domain")
        .context("tomie-domain not found in workspace")?;

    Ok(domain
        .dependencies
        .iter()
        .filter(|dep| dep.kind.is_none())
        .filter(|dep| !DOMAIN_ALLOWED_DEPS.contains(&dep.name.as_str()))
        .map(|dep| format!("tomie-domain must not depend on `{}`", dep.name))
        .collect())
}

fn core_source_violations(dir: &Path) -> anyhow::Result<Vec<String>> {
    let rules = CORE_FORBIDDEN
        .iter()
        .map(|(pattern, what)| {
            regex_lite::Regex::new(pattern)
                .map(|re| (re, *what))
                .with_context(|| format!("invalid pattern {pattern}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut violations = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        violations.extend(scan_source(&path, &source, &rules));
    }
    Ok(violations)
}

fn scan_source(path: &Path, source: &str, rules: &[(regex_lite::Regex, &str)]) -> Vec<String> {
    // Only production code is checked; test modules sit at the end of each file.
    let production = source
        .split("#[cfg(test)]")
        .next()
        .unwrap_or_default();

    let mut violations = Vec::new();
    for (line_no, line) in production.lines().enumerate() {
        for (re, what) in rules {
            if re.is_match(line) {
                violations.push(format!(
                    "{}:{} reaches for {what}",
                    path.display(),
                    line_no + 1
                ));
            }
        }
    }
    violations
}
