//! Dynamic asset reference rewriting
//!
//! Bundlers resolve static imports at build time but cannot see through
//! path expressions computed at run time. This pass scans an addon for image
//! assets, emits a header that imports each one under a synthetic name and
//! defines a lookup function over the literal paths, then rewrites every
//! `addon.self.dir + <expr>` / `addon.self.lib + <expr>` reference in the
//! source into a call against that lookup.
//!
//! The two reference shapes are matched by a small hand-written scanner
//! rather than regular expressions, so string literals, escapes and nested
//! brackets are handled explicitly:
//!
//! - `${addon.self.dir + <expr>}` (inside a template literal) becomes
//!   `${_twGetAsset(<expr>)}`; the expression ends at the `}` that closes
//!   the interpolation and must not span a `;` or newline.
//! - `addon.self.dir + <expr>` (bare) becomes `_twGetAsset(<expr>)`; the
//!   expression ends at the first top-level `;`, `,` or closing bracket,
//!   and may continue across newlines.

use std::path::Path;

use crate::error::MirrorResult;
use crate::walk::walk;

const DIR_MARKER: &str = "addon.self.dir";
const LIB_MARKER: &str = "addon.self.lib";

/// True when the source references the dynamic resource root at all
pub fn has_dynamic_reference(text: &str) -> bool {
    text.contains(DIR_MARKER) || text.contains(LIB_MARKER)
}

/// List the addon's asset files, relative to the addon directory
pub fn collect_assets(addon_dir: &Path, extensions: &[String]) -> MirrorResult<Vec<String>> {
    let files = walk(addon_dir)?;
    Ok(files
        .into_iter()
        .filter(|file| {
            extensions
                .iter()
                .any(|ext| file.ends_with(&format!(".{ext}")))
        })
        .collect())
}

/// Generate the import prelude and `_twGetAsset` lookup for the given assets
pub fn asset_header(assets: &[String]) -> String {
    let mut header = String::from("/* inserted by addon-mirror */\n");
    for (index, file) in assets.iter().enumerate() {
        header.push_str(&format!(
            "import _twAsset{index} from {};\n",
            js_string(&format!("./{file}"))
        ));
    }
    header.push_str("const _twGetAsset = (path) => {\n");
    for (index, file) in assets.iter().enumerate() {
        header.push_str(&format!(
            "  if (path === {}) return _twAsset{index};\n",
            js_string(&format!("/{file}"))
        ));
    }
    header.push_str("  throw new Error(`Unknown asset: ${path}`);\n");
    header.push_str("};\n");
    header.push('\n');
    header
}

/// Apply both reference rewrites to a script body, without the header
///
/// The interpolated shape goes first; once it has been rewritten the marker
/// is gone, so the bare pass cannot match inside the replacement.
pub fn rewrite_references(text: &str) -> String {
    rewrite_bare(&rewrite_interpolated(text))
}

/// Rewrite one script: asset header followed by the transformed body
pub fn rewrite_source(addon_dir: &Path, text: &str, extensions: &[String]) -> MirrorResult<String> {
    let assets = collect_assets(addon_dir, extensions)?;
    Ok(format!("{}{}", asset_header(&assets), rewrite_references(text)))
}

/// Encode a path as a JavaScript double-quoted string literal
pub(crate) fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Clone, Copy)]
enum Mode {
    Interpolated,
    Bare,
}

/// Index of the earliest marker occurrence, if any
fn find_reference(text: &str) -> Option<usize> {
    match (text.find(DIR_MARKER), text.find(LIB_MARKER)) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Consume ` * + *` after a marker; returns the byte count consumed
fn skip_joiner(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'+' {
        return None;
    }
    i += 1;
    while i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    Some(i)
}

/// Scan an expression starting at the beginning of `text`
///
/// Returns the expression slice and the total bytes consumed (including the
/// closing `}` in interpolated mode, excluding the terminator in bare mode).
fn scan_expression(text: &str, mode: Mode) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut depth: i32 = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' | b'\'' | b'`' => quote = Some(b),
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' => {
                if depth == 0 {
                    return match mode {
                        Mode::Interpolated => None,
                        Mode::Bare => finish(text, i),
                    };
                }
                depth -= 1;
            }
            b'}' => {
                if depth == 0 {
                    return match mode {
                        Mode::Interpolated => finish(text, i).map(|(expr, _)| (expr, i + 1)),
                        Mode::Bare => finish(text, i),
                    };
                }
                depth -= 1;
            }
            b';' => {
                return match mode {
                    Mode::Interpolated => None,
                    Mode::Bare => finish(text, i),
                };
            }
            b'\n' => {
                if let Mode::Interpolated = mode {
                    return None;
                }
            }
            b',' => {
                if matches!(mode, Mode::Bare) && depth == 0 {
                    return finish(text, i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    match mode {
        Mode::Interpolated => None,
        Mode::Bare => finish(text, bytes.len()),
    }
}

fn finish(text: &str, end: usize) -> Option<(&str, usize)> {
    let expr = &text[..end];
    if expr.trim().is_empty() {
        None
    } else {
        Some((expr, end))
    }
}

/// Rewrite `${addon.self.dir|lib + <expr>}` occurrences
fn rewrite_interpolated(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    loop {
        let Some(idx) = rest.find("${") else {
            out.push_str(rest);
            break;
        };
        let tail = &rest[idx + 2..];
        if !tail.starts_with(DIR_MARKER) && !tail.starts_with(LIB_MARKER) {
            out.push_str(&rest[..idx + 2]);
            rest = tail;
            continue;
        }

        let after_marker = &tail[DIR_MARKER.len()..];
        let Some(joiner) = skip_joiner(after_marker) else {
            out.push_str(&rest[..idx + 2]);
            rest = tail;
            continue;
        };

        match scan_expression(&after_marker[joiner..], Mode::Interpolated) {
            Some((expr, consumed)) => {
                out.push_str(&rest[..idx]);
                out.push_str("${_twGetAsset(");
                out.push_str(expr.trim());
                out.push_str(")}");
                rest = &after_marker[joiner + consumed..];
            }
            None => {
                out.push_str(&rest[..idx + 2]);
                rest = tail;
            }
        }
    }

    out
}

/// Rewrite bare `addon.self.dir|lib + <expr>` occurrences
fn rewrite_bare(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    loop {
        let Some(idx) = find_reference(rest) else {
            out.push_str(rest);
            break;
        };

        let after_marker = &rest[idx + DIR_MARKER.len()..];
        let Some(joiner) = skip_joiner(after_marker) else {
            out.push_str(&rest[..idx + DIR_MARKER.len()]);
            rest = after_marker;
            continue;
        };

        match scan_expression(&after_marker[joiner..], Mode::Bare) {
            Some((expr, consumed)) => {
                out.push_str(&rest[..idx]);
                out.push_str("_twGetAsset(");
                out.push_str(expr.trim());
                out.push(')');
                rest = &after_marker[joiner + consumed..];
            }
            None => {
                out.push_str(&rest[..idx + DIR_MARKER.len()]);
                rest = after_marker;
            }
        }
    }

    out
}
