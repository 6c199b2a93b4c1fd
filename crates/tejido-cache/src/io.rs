use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Atomic replace: write to a sibling temp file, fsync, then rename over
/// the target. Readers either see the old snapshot or the new one, never a
/// partial write.
pub fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }

  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents)?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}
