/// File name an entry is written under inside the output directory.
///
/// The decoded listing name is kept as-is except for characters no common
/// file system accepts, which become `_`. The result never names a path
/// outside the output directory.
pub fn destination_file_name(display_name: &str) -> String {
    let mut name: String = display_name
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    if name.is_empty() || name == "." || name == ".." {
        return "_".to_string();
    }
    if is_reserved_windows_name(&name) {
        name.push('_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}
