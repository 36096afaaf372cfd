//! The dsf module reads and writes the ID3v2 block that DSF (DSD Stream File) containers carry at
//! the end of the file.
//!
//! A DSF file starts with a 28 byte `DSD ` chunk:
//!
//! | offset | size | content                                   |
//! |--------|------|-------------------------------------------|
//! | 0      | 4    | `DSD `                                    |
//! | 4      | 8    | chunk size, always 28                     |
//! | 12     | 8    | total file size                           |
//! | 20     | 8    | offset of the ID3v2 block, 0 if none      |
//!
//! All integers are little endian. The ID3v2 block runs to the end of the file.

use crate::error::{DrRoonExpectedError, Result};
use id3::{Tag as Id3Tag, Version};
use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

const DSD_MAGIC: &[u8; 4] = b"DSD ";
pub const DSD_CHUNK_SIZE: u64 = 28;
const TOTAL_SIZE_OFFSET: u64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DsdHeader {
    pub total_size: u64,
    pub metadata_offset: u64,
}

impl DsdHeader {
    pub fn parse(path: &Path, bytes: &[u8; DSD_CHUNK_SIZE as usize]) -> Result<DsdHeader> {
        let invalid = |message: &str| DrRoonExpectedError::InvalidDsf { path: path.to_path_buf(), message: message.to_string() };
        if &bytes[0..4] != DSD_MAGIC {
            return Err(invalid("missing DSD chunk").into());
        }
        let chunk_size = read_u64_le(&bytes[4..12]);
        if chunk_size != DSD_CHUNK_SIZE {
            return Err(invalid(&format!("unexpected DSD chunk size {chunk_size}")).into());
        }
        Ok(DsdHeader {
            total_size: read_u64_le(&bytes[12..20]),
            metadata_offset: read_u64_le(&bytes[20..28]),
        })
    }

    /// Offset where the audio payload ends and a tag block may start. A zero or out-of-range
    /// metadata pointer means the file carries no tag.
    fn tag_offset(&self, file_len: u64) -> Option<u64> {
        if self.metadata_offset >= DSD_CHUNK_SIZE && self.metadata_offset < file_len {
            Some(self.metadata_offset)
        } else {
            None
        }
    }
}

fn read_u64_le(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

fn read_header(path: &Path, file: &mut File) -> Result<DsdHeader> {
    let mut bytes = [0u8; DSD_CHUNK_SIZE as usize];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut bytes).map_err(|e| DrRoonExpectedError::InvalidDsf { path: path.to_path_buf(), message: e.to_string() })?;
    DsdHeader::parse(path, &bytes)
}

/// Reads the embedded ID3 tag. Returns `None` when the file has no tag block.
pub fn read_dsf_tag(path: &Path) -> Result<Option<Id3Tag>> {
    let mut file = File::open(path)?;
    let header = read_header(path, &mut file)?;
    let file_len = file.metadata()?.len();

    let Some(offset) = header.tag_offset(file_len) else {
        debug!("{} has no embedded ID3 tag", path.display());
        return Ok(None);
    };

    let mut buf = Vec::new();
    file.seek(SeekFrom::Start(offset))?;
    file.read_to_end(&mut buf)?;
    match Id3Tag::read_from2(Cursor::new(buf)) {
        Ok(tag) => Ok(Some(tag)),
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => Ok(None),
        Err(e) => Err(DrRoonExpectedError::TagDecode { path: path.to_path_buf(), message: e.to_string() }.into()),
    }
}

/// Replaces the embedded ID3 tag with `tag` and patches the DSD header to match.
pub fn write_dsf_tag(path: &Path, tag: &Id3Tag) -> Result<()> {
    let mut encoded = Vec::new();
    tag.write_to(&mut encoded, Version::Id3v24).map_err(|e| DrRoonExpectedError::TagEncode {
        path: path.to_path_buf(),
        field: "ID3".to_string(),
        message: e.to_string(),
    })?;

    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let header = read_header(path, &mut file)?;
    let file_len = file.metadata()?.len();
    let audio_end = header.tag_offset(file_len).unwrap_or(file_len);

    file.set_len(audio_end)?;
    file.seek(SeekFrom::Start(audio_end))?;
    file.write_all(&encoded)?;

    let total_size = audio_end + encoded.len() as u64;
    file.seek(SeekFrom::Start(TOTAL_SIZE_OFFSET))?;
    file.write_all(&total_size.to_le_bytes())?;
    file.write_all(&audio_end.to_le_bytes())?;
    file.flush()?;
    Ok(())
}
