use std::fs;
use std::path::Path;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init() -> TempDir {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")))
            .with_test_writer()
            .try_init();
    });
    TempDir::new().expect("failed to create temp dir")
}

/// Stand-in for the fmt and data chunks of a DSF file.
pub const DSF_AUDIO: &[u8] = b"fmt \x34\x00\x00\x00\x00\x00\x00\x00audio-payload-bytes";

/// Writes a DSF file with a valid DSD header, a stand-in payload, and no tag.
pub fn write_dsf_fixture(path: &Path) {
    let total = crate::dsf::DSD_CHUNK_SIZE + DSF_AUDIO.len() as u64;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"DSD ");
    bytes.extend_from_slice(&crate::dsf::DSD_CHUNK_SIZE.to_le_bytes());
    bytes.extend_from_slice(&total.to_le_bytes());
    bytes.extend_from_slice(&0u64.to_le_bytes());
    bytes.extend_from_slice(DSF_AUDIO);
    fs::write(path, bytes).expect("failed to write dsf fixture");
}

/// Writes a FLAC file consisting of the stream marker and a single STREAMINFO block for
/// 44.1kHz 16-bit stereo with no audio frames.
pub fn write_flac_fixture(path: &Path) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"fLaC");
    // Last-metadata-block flag set, type 0 (STREAMINFO), length 34.
    bytes.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
    bytes.extend_from_slice(&[0x00; 6]);
    bytes.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&[0x00; 16]);
    fs::write(path, bytes).expect("failed to write flac fixture");
}

/// Writes an MP3 file with no ID3 tag: a single silent MPEG-1 Layer III frame header and padding.
pub fn write_mp3_fixture(path: &Path) {
    let mut bytes = vec![0xFF, 0xFB, 0x90, 0x64];
    bytes.extend_from_slice(&[0x00; 413]);
    fs::write(path, bytes).expect("failed to write mp3 fixture");
}

fn mp4_atom(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut atom = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    atom.extend_from_slice(kind);
    atom.extend_from_slice(payload);
    atom
}

/// Writes an M4A file with a file type box, a movie header for an empty one second movie, and an
/// empty media data box. It carries no metadata and no tracks.
pub fn write_m4a_fixture(path: &Path) {
    let mut mvhd = Vec::new();
    // Version 0, no flags, creation and modification times.
    mvhd.extend_from_slice(&[0x00; 12]);
    mvhd.extend_from_slice(&1000u32.to_be_bytes());
    mvhd.extend_from_slice(&1000u32.to_be_bytes());
    mvhd.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    mvhd.extend_from_slice(&0x0100u16.to_be_bytes());
    mvhd.extend_from_slice(&[0x00; 10]);
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        mvhd.extend_from_slice(&value.to_be_bytes());
    }
    mvhd.extend_from_slice(&[0x00; 24]);
    mvhd.extend_from_slice(&1u32.to_be_bytes());

    let mut bytes = mp4_atom(b"ftyp", b"M4A \x00\x00\x00\x00M4A isom");
    bytes.extend(mp4_atom(b"moov", &mp4_atom(b"mvhd", &mvhd)));
    bytes.extend(mp4_atom(b"mdat", &[]));
    fs::write(path, bytes).expect("failed to write m4a fixture");
}
