//! Shared test fixtures.
//!
//! The fake encoder is a POSIX shell script. Its behavior is chosen by the
//! first four bytes of the input file:
//!
//! - `FAIL`: prints an error on stderr and exits 3
//! - `SKIP`: exits 0 without writing output
//! - anything else: copies at most 400 bytes to the output and reports 3 passes

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const FAKE_ENCODER: &str = r#"#!/bin/sh
if [ "$1" = "--tolerance" ]; then
    echo "tolerance=$2" >&2
    shift 2
fi
in="$1"
out="$2"
case "$(head -c 4 "$in")" in
    FAIL) echo "cannot decode $in" >&2; exit 3 ;;
    SKIP) echo "already optimal" >&2; exit 0 ;;
esac
head -c 400 "$in" > "$out"
echo "encoded in 3 passes" >&2
"#;

static ENCODER_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

/// Path to the fake encoder script, created once per test binary.
pub(crate) fn fake_encoder() -> PathBuf {
    let dir = ENCODER_DIR.get_or_init(|| {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake-encoder.sh");
        std::fs::write(&path, FAKE_ENCODER).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        dir
    });
    dir.path().join("fake-encoder.sh")
}

/// Write an input image whose content starts with `tag`, padded to `size` bytes.
pub(crate) fn write_input(dir: &Path, name: &str, tag: &[u8], size: usize) -> PathBuf {
    let mut data = tag.to_vec();
    data.resize(size.max(tag.len()), b'.');
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}
