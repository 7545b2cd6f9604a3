//! Pure `detect(path, first_bytes) -> Option<Language>` (§4.C).
//!
//! Primary dispatch is by extension; extensionless files are tie-broken by
//! a shebang scan. Binary or oversized files are skipped by the caller
//! using [`is_binary`] before `detect` is even invoked — that classifier
//! is length- and content-based, not a language decision.

use domain::Language;

/// Default binary/large-file skip threshold (§4.C): 1 MiB.
pub const DEFAULT_BINARY_THRESHOLD: u64 = 1024 * 1024;

pub fn detect(path: &str, first_bytes: &[u8]) -> Option<Language> {
    if let Some(lang) = detect_by_extension(path) {
        return Some(lang);
    }
    detect_by_shebang(first_bytes)
}

fn detect_by_extension(path: &str) -> Option<Language> {
    let ext = path.rsplit('.').next()?.to_ascii_lowercase();
    // No extension at all (rsplit returns the whole string): bail to shebang.
    if !path.contains('.') {
        return None;
    }
    match ext.as_str() {
        "py" | "pyi" => Some(Language::Python),
        "c" | "h" => Some(Language::C),
        "s" | "asm" => Some(Language::Assembly),
        "cob" | "cbl" => Some(Language::Cobol),
        _ => None,
    }
}

fn detect_by_shebang(first_bytes: &[u8]) -> Option<Language> {
    if !first_bytes.starts_with(b"#!") {
        return None;
    }
    let line_end = first_bytes.iter().position(|&b| b == b'\n').unwrap_or(first_bytes.len());
    let line = String::from_utf8_lossy(&first_bytes[..line_end]);
    if line.contains("python") {
        Some(Language::Python)
    } else {
        None
    }
}

/// Whether a file should be skipped as binary/oversized (§4.C): over
/// `threshold` bytes, or its leading bytes contain a NUL (a simple,
/// dependency-free binary heuristic).
pub fn is_binary(byte_size: u64, first_bytes: &[u8], threshold: u64) -> bool {
    byte_size > threshold || first_bytes.contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_python_by_extension() {
        assert_eq!(detect("src/main.py", b""), Some(Language::Python));
    }

    #[test]
    fn detects_c_header() {
        assert_eq!(detect("include/foo.h", b""), Some(Language::C));
    }

    #[test]
    fn detects_cobol_by_extension() {
        assert_eq!(detect("PROG.CBL", b""), Some(Language::Cobol));
    }

    #[test]
    fn detects_python_shebang_without_extension() {
        assert_eq!(detect("build-script", b"#!/usr/bin/env python3\n"), Some(Language::Python));
    }

    #[test]
    fn unrecognised_extensionless_file_is_unknown() {
        assert_eq!(detect("README", b"just some text"), None);
    }

    #[test]
    fn oversized_file_is_binary() {
        assert!(is_binary(2 * DEFAULT_BINARY_THRESHOLD, b"text", DEFAULT_BINARY_THRESHOLD));
    }

    #[test]
    fn nul_byte_marks_binary() {
        assert!(is_binary(10, b"\x00\x01", DEFAULT_BINARY_THRESHOLD));
    }
}
