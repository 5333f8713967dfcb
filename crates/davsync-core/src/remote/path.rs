//! Remote path helpers.
//!
//! Remote paths are `/`-separated strings relative to the server URL,
//! always with a leading `/` and never with a trailing one (except the
//! server root itself, which is `/`).

/// Normalize a user-supplied remote root to `/a/b` form
#[must_use]
pub fn normalize_root(root: &str) -> String {
    let segments: Vec<&str> = root.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Full remote path of an identity path under `root`
#[must_use]
pub fn join(root: &str, identity_path: &str) -> String {
    if root == "/" {
        format!("/{identity_path}")
    } else {
        format!("{root}/{identity_path}")
    }
}

/// Identity path of `full_path` relative to `root`, or `None` if it lies
/// outside the root (or is the root itself)
#[must_use]
pub fn strip_root<'a>(root: &str, full_path: &'a str) -> Option<&'a str> {
    let full_path = full_path.trim_end_matches('/');
    let rest = if root == "/" {
        full_path.strip_prefix('/')?
    } else {
        full_path.strip_prefix(root)?.strip_prefix('/')?
    };
    (!rest.is_empty()).then_some(rest)
}

/// Directories strictly between `root` and the file at `identity_path`,
/// ordered root to leaf
#[must_use]
pub fn ancestors(root: &str, identity_path: &str) -> Vec<String> {
    let mut segments: Vec<&str> = identity_path.split('/').collect();
    segments.pop();

    let mut dirs = Vec::with_capacity(segments.len());
    let mut so_far = root.to_string();
    for segment in segments {
        so_far = join(&so_far, segment);
        dirs.push(so_far.clone());
    }
    dirs
}

/// Every directory from the server root down to and including `root`
#[must_use]
pub fn root_chain(root: &str) -> Vec<String> {
    let mut dirs = Vec::new();
    let mut so_far = String::new();
    for segment in root.split('/').filter(|s| !s.is_empty()) {
        so_far.push('/');
        so_far.push_str(segment);
        dirs.push(so_far.clone());
    }
    dirs
}
