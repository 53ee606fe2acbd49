//! Request target to filesystem path mapping.
//!
//! The traversal check is a literal search for `..` in the raw target. Nothing is
//! percent-decoded or canonicalized, so `%2e%2e` passes the check and is looked up
//! as a file literally named that way under the root.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// A path under the document root that contains no `..` sequence.
///
/// Only produced by [`resolve`] and [`ResolvedPath::document`]; existence is not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(PathBuf);

/// Result of mapping a request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target maps to this path.
    Path(ResolvedPath),
    /// The target tried to leave the document root.
    Forbidden,
}

impl ResolvedPath {
    /// Path of a named document directly under `root`, e.g. an error page.
    pub fn document(root: &Path, name: &str) -> Self {
        Self(join_segments(root, name))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Lossy string form, used for content-type lookup and logging.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        self.0.to_string_lossy()
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Maps `target` to a path under `root`.
///
/// `/` becomes the `index` document. Any other target loses one leading `/` and the
/// remainder is appended to `root`.
///
/// # Example
///
/// ```
/// # use std::path::Path;
/// # use docserve::http::path::{resolve, Resolution};
/// let root = Path::new("web");
/// match resolve(root, "/css/site.css", "index.html") {
///     Resolution::Path(p) => assert_eq!(p.as_path(), Path::new("web/css/site.css")),
///     Resolution::Forbidden => unreachable!(),
/// }
/// assert_eq!(resolve(root, "/../etc/passwd", "index.html"), Resolution::Forbidden);
/// ```
pub fn resolve(root: &Path, target: &str, index: &str) -> Resolution {
    if target.contains("..") {
        return Resolution::Forbidden;
    }

    let relative = if target == "/" {
        index
    } else {
        target.strip_prefix('/').unwrap_or(target)
    };

    Resolution::Path(ResolvedPath(join_segments(root, relative)))
}

// Appending segment by segment keeps `//etc/passwd` under the root; `PathBuf::push`
// with an absolute path would replace it.
fn join_segments(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}
