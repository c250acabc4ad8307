//! The path sandbox that maps client-supplied names to driver paths.

/// Takes a client supplied path or file name and produces a normalized
/// absolute path within the session's virtual root.
///
/// ```text
/// build_path("/files", "two.txt")          => "/files/two.txt"
/// build_path("/files", "/one.txt")         => "/one.txt"
/// build_path("/files", "../../etc/passwd") => "/etc/passwd"
/// build_path("/files", "")                 => "/files"
/// ```
///
/// The result always begins with `/` and contains no `.` or `..` segments;
/// a run of `..` above the root stops at `/`. The literal `-a` is treated
/// as an `ls` flag some clients send with LIST, not as a name. The driver
/// must still anchor the result below its own root before touching a host
/// file system.
pub(crate) fn build_path(cur_dir: &str, filename: &str) -> String {
    if let Some(rest) = filename.strip_prefix('/') {
        normalize(rest)
    } else if !filename.is_empty() && filename != "-a" {
        normalize(&format!("{}/{}", cur_dir, filename))
    } else {
        normalize(cur_dir)
    }
}

// Collapses `.`/`..` segments and duplicate separators. Separators are
// forward slashes regardless of host OS.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Joins a directory entry name onto an already-normalized directory path.
pub(crate) fn join_path(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_like_the_classic_sandbox() {
        assert_eq!(build_path("/", "/"), "/");
        assert_eq!(build_path("/", "one.txt"), "/one.txt");
        assert_eq!(build_path("/", "/files/two.txt"), "/files/two.txt");
        assert_eq!(build_path("/", "files/two.txt"), "/files/two.txt");
        assert_eq!(build_path("/files", "two.txt"), "/files/two.txt");
        assert_eq!(build_path("/files", ""), "/files");
    }

    #[test]
    fn cannot_escape_the_root() {
        assert_eq!(build_path("/", "/../../../../etc/passwd"), "/etc/passwd");
        assert_eq!(build_path("/", "/../../../etc"), "/etc");
        assert_eq!(build_path("/deep/dir", "../../../.."), "/");
        assert_eq!(build_path("/", ".."), "/");
    }

    #[test]
    fn collapses_dots_and_duplicate_separators() {
        assert_eq!(build_path("/", "a//b///c"), "/a/b/c");
        assert_eq!(build_path("/a", "./b/./c"), "/a/b/c");
        assert_eq!(build_path("/a/b", "../c"), "/a/c");
    }

    #[test]
    fn treats_dash_a_as_a_flag() {
        assert_eq!(build_path("/files", "-a"), "/files");
    }

    #[test]
    fn always_absolute_without_dot_segments() {
        for (dir, name) in [("/", "x/../.."), ("/a", "....."), ("/a/b", "-a"), ("/", "/././.")] {
            let p = build_path(dir, name);
            assert!(p.starts_with('/'));
            assert!(!p.split('/').any(|s| s == "." || s == ".."));
        }
    }
}
