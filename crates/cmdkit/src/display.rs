//! Display normalization for command lines.

use std::path::{Component, Path, PathBuf};

/// Best-effort relativization of a command line against `working_dir`.
///
/// The whole command line is treated as a path. When both it and
/// `working_dir` are absolute, the result is the lexical relative path from
/// `working_dir` to the command (`..` segments included). Otherwise the
/// command is returned unchanged. The filesystem is never consulted.
pub fn relativize(command: &str, working_dir: &Path) -> String {
    let target = Path::new(command);
    if !target.is_absolute() || !working_dir.is_absolute() {
        return command.to_string();
    }

    let target = normalize(target);
    let base = normalize(working_dir);

    let target_parts: Vec<_> = target.components().collect();
    let base_parts: Vec<_> = base.components().collect();

    let common = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        relative.display().to_string()
    }
}

/// Lexically clean a path: drop `.`, resolve `..` against earlier segments.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !matches!(out.components().next_back(), Some(Component::RootDir) | None) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
