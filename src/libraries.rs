//! Shared library copying
//!
//! Addons import reusable logic from a common `libraries/` directory two
//! levels above their own files. The importing statement is left untouched;
//! this pass only makes sure every referenced library file exists at the
//! corresponding path in the output tree. Re-running with an unchanged
//! upstream re-copies identical bytes.

use std::path::Path;

use crate::error::MirrorResult;

const LIBRARY_PREFIX: &str = "../../libraries/";

/// Library-relative paths referenced by the script's import statements
///
/// Matches statements of the form
/// `import <bindings> from "../../libraries/<path>.js";` with either quote
/// style. Only simple path characters are accepted; the optional `.esm.js`
/// suffix is the one dotted form upstream uses.
pub fn imported_libraries(text: &str) -> Vec<String> {
    let mut libraries = Vec::new();

    for line in text.lines() {
        let line = line.trim_start();
        let Some(rest) = line.strip_prefix("import ") else {
            continue;
        };
        let Some(from) = rest.find(" from ") else {
            continue;
        };

        let specifier = rest[from + " from ".len()..].trim_start();
        let quote = match specifier.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => continue,
        };
        let body = &specifier[1..];
        let Some(end) = body.find(quote) else {
            continue;
        };
        if !body[end + quote.len_utf8()..].starts_with(';') {
            continue;
        }

        let Some(path) = body[..end].strip_prefix(LIBRARY_PREFIX) else {
            continue;
        };
        if is_library_path(path) {
            libraries.push(path.to_string());
        }
    }

    libraries
}

/// Copy every library the script imports into the output library tree
///
/// Returns how many files were copied. A referenced library missing from the
/// upstream tree is fatal.
pub fn copy_imported(
    text: &str,
    upstream_libraries: &Path,
    out_libraries: &Path,
) -> MirrorResult<usize> {
    let libraries = imported_libraries(text);
    for library in &libraries {
        crate::fs::copy_bytes(&upstream_libraries.join(library), &out_libraries.join(library))?;
    }
    Ok(libraries.len())
}

fn is_library_path(path: &str) -> bool {
    let Some(stem) = path.strip_suffix(".js") else {
        return false;
    };
    let stem = stem.strip_suffix(".esm").unwrap_or(stem);
    !stem.is_empty()
        && stem
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'/' | b'-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_imported_libraries_named_import() {
        let text = r#"import { normalizeHex, getHexRegex } from "../../libraries/normalize-color.js";"#;
        assert_eq!(imported_libraries(text), vec!["normalize-color.js"]);
    }

    #[test]
    fn test_imported_libraries_default_import() {
        let text = r#"import RateLimiter from "../../libraries/rate-limiter.js";"#;
        assert_eq!(imported_libraries(text), vec!["rate-limiter.js"]);
    }

    #[test]
    fn test_imported_libraries_single_quotes_and_esm() {
        let text = "import tinycolor from '../../libraries/thirdparty/tinycolor.esm.js';";
        assert_eq!(imported_libraries(text), vec!["thirdparty/tinycolor.esm.js"]);
    }

    #[test]
    fn test_imported_libraries_ignores_other_specifiers() {
        let text = concat!(
            "import a from \"./local.js\";\n",
            "import b from \"../sibling/module.js\";\n",
            "import c from \"../../libraries/has.dots.js\";\n",
            "import d from \"../../libraries/missing-semicolon.js\"\n",
        );
        assert!(imported_libraries(text).is_empty());
    }

    #[test]
    fn test_imported_libraries_multiple() {
        let text = concat!(
            "import RateLimiter from \"../../libraries/rate-limiter.js\";\n",
            "const x = 1;\n",
            "import { hex } from \"../../libraries/normalize-color.js\";\n",
        );
        assert_eq!(
            imported_libraries(text),
            vec!["rate-limiter.js", "normalize-color.js"]
        );
    }

    #[test]
    fn test_copy_imported_creates_nested_paths() {
        let dir = tempdir().unwrap();
        let upstream = dir.path().join("upstream-libraries");
        let out = dir.path().join("libraries");
        fs::create_dir_all(upstream.join("thirdparty")).unwrap();
        fs::write(upstream.join("thirdparty").join("tinycolor.esm.js"), "// lib").unwrap();

        let copied = copy_imported(
            "import t from \"../../libraries/thirdparty/tinycolor.esm.js\";",
            &upstream,
            &out,
        )
        .unwrap();

        assert_eq!(copied, 1);
        assert_eq!(
            fs::read_to_string(out.join("thirdparty").join("tinycolor.esm.js")).unwrap(),
            "// lib"
        );
    }

    #[test]
    fn test_copy_imported_missing_library_is_fatal() {
        let dir = tempdir().unwrap();
        let upstream = dir.path().join("upstream-libraries");
        fs::create_dir_all(&upstream).unwrap();

        let result = copy_imported(
            "import gone from \"../../libraries/gone.js\";",
            &upstream,
            &dir.path().join("libraries"),
        );

        assert!(result.is_err());
    }
}
