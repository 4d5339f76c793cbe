use anyhow::Result;
use std::path::Path;

/// A renaming strategy applied to a whole batch of paths.
///
/// Implementations decide the new names and hand each `(old, new)` pair to
/// `change_name` in input order. They never touch the filesystem themselves. An error
/// returned by `change_name` stops the batch and is returned as is. The return value is
/// the number of times `change_name` was called.
pub trait BatchNameChanger {
    fn change_names<P, F>(&self, path_names: &[P], change_name: F) -> Result<usize>
    where
        P: AsRef<Path>,
        F: FnMut(&Path, &Path) -> Result<()>;
}
