//! Shell-script stand-ins for ffprobe and ffmpeg.
//!
//! Scripts are written once per test binary; rewriting an executable while another
//! thread forks can fail with ETXTBSY.

use std::path::Path;
use std::sync::OnceLock;

use tempfile::TempDir;

#[derive(Debug, Clone, Copy)]
pub enum Probe {
    Landscape,
    Portrait,
    Wide,
    NoStreams,
}

impl Probe {
    fn script_name(self) -> &'static str {
        match self {
            Probe::Landscape => "ffprobe-landscape",
            Probe::Portrait => "ffprobe-portrait",
            Probe::Wide => "ffprobe-wide",
            Probe::NoStreams => "ffprobe-empty",
        }
    }
}

static TOOLS: OnceLock<TempDir> = OnceLock::new();

fn write_script(dir: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod script");
}

fn probe_output(width: u32, height: u32) -> String {
    format!(
        "echo '{{\"streams\":[{{\"index\":0,\"codec_type\":\"video\",\"width\":{},\"height\":{}}}]}}'",
        width, height
    )
}

fn tools_dir() -> &'static Path {
    TOOLS
        .get_or_init(|| {
            let dir = tempfile::tempdir().expect("Failed to create tools dir");
            write_script(dir.path(), "ffprobe-landscape", &probe_output(1920, 1080));
            write_script(dir.path(), "ffprobe-portrait", &probe_output(1080, 1920));
            write_script(dir.path(), "ffprobe-wide", &probe_output(1000, 100));
            write_script(dir.path(), "ffprobe-empty", "echo '{\"streams\":[]}'");
            // -i <in> ... <out>: copy input to the last argument
            write_script(
                dir.path(),
                "ffmpeg-ok",
                "for last; do :; done\ncp \"$2\" \"$last\"",
            );
            write_script(
                dir.path(),
                "ffmpeg-fail",
                "echo 'moov atom not found' >&2\nexit 1",
            );
            dir
        })
        .path()
}

pub fn ffprobe(probe: Probe) -> String {
    tools_dir()
        .join(probe.script_name())
        .to_string_lossy()
        .into_owned()
}

pub fn ffmpeg(fails: bool) -> String {
    let name = if fails { "ffmpeg-fail" } else { "ffmpeg-ok" };
    tools_dir().join(name).to_string_lossy().into_owned()
}
