use std::path::Path;

/// Render a byte count as a human-readable size ("17 MB").
///
/// Base-1024, picking the largest unit the value stays below 1024 in.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    let mut value = bytes as f64;
    for unit in &UNITS[..UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{:.0} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.0} {}", value, UNITS[UNITS.len() - 1])
}

/// Sanitize a file name: forbidden characters become `_`, surrounding
/// whitespace is trimmed, and an empty result falls back to "video".
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned = filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string();

    if cleaned.is_empty() {
        "video".to_string()
    } else {
        cleaned
    }
}

/// Sanitize a user-typed name and force the `.mp4` extension, replacing
/// whatever extension was typed. Idempotent.
pub fn force_mp4_name(name: &str) -> String {
    let cleaned = sanitize_filename(name);
    let stem = Path::new(&cleaned)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    format!("{}.mp4", stem)
}

/// Reveal a folder in the platform file manager.
pub fn open_in_file_manager(path: &Path) {
    let path = path.to_path_buf();
    std::thread::spawn(move || {
        #[cfg(target_os = "windows")]
        {
            let _ = std::process::Command::new("explorer").arg(&path).spawn();
        }
        #[cfg(target_os = "macos")]
        {
            let _ = std::process::Command::new("open").arg(&path).spawn();
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let _ = std::process::Command::new("xdg-open").arg(&path).spawn();
        }
    });
}
