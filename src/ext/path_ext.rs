use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Display helpers for paths that show up in log lines and error messages.
pub trait PathExt {
    /// Canonical form when the path exists, otherwise an absolute path with
    /// `.` and `..` folded away.
    fn best_effort_display(&self) -> String;

    /// Last component of the path, falling back to the whole path when it has
    /// no file name (`/`, `..`).
    fn base_name(&self) -> Cow<'_, str>;
}

impl<P: AsRef<Path> + ?Sized> PathExt for P {
    fn best_effort_display(&self) -> String {
        let path = self.as_ref();
        if let Ok(canonical) = path.canonicalize() {
            return canonical.display().to_string();
        }

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        };
        lexically_normalize(&absolute).display().to_string()
    }

    fn base_name(&self) -> Cow<'_, str> {
        let path = self.as_ref();
        match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => path.to_string_lossy(),
        }
    }
}

fn lexically_normalize(path: &Path) -> PathBuf {
    let mut kept: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(kept.last(), Some(Component::Normal(_))) {
                    kept.pop();
                }
            }
            other => kept.push(other),
        }
    }

    kept.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/data/photos", "photos")]
    #[case("relative/dir/", "dir")]
    #[case("single", "single")]
    #[case("/", "/")]
    fn base_name_is_the_last_component(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(Path::new(path).base_name(), expected);
    }

    #[test]
    fn missing_paths_are_normalized() {
        let shown = Path::new("/definitely/not/../here/./x").best_effort_display();
        assert_eq!(shown, Path::new("/definitely/here/x").display().to_string());
    }

    #[test]
    fn parent_dir_never_climbs_past_root() {
        let normalized = lexically_normalize(Path::new("/../a"));
        assert_eq!(normalized, PathBuf::from("/a"));
    }
}
