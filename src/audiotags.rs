//! The audiotags module abstracts over tag reading and writing for the four audio containers we
//! touch, exposing a single `update_file` entry point for all of them.
//!
//! Each container gets a `FormatAdapter` that knows how to find, decode and store the VERSION and
//! ROONALBUMTAG fields. The decision of what to store is left to `merge_tag_value`.

use crate::common::{DrScore, TagField, TagScope};
use crate::dsf::{read_dsf_tag, write_dsf_tag};
use crate::error::{DrRoonError, DrRoonExpectedError, Result};
use crate::merge::merge_tag_value;
use id3::{frame::ExtendedText, Tag as Id3Tag, TagLike};
use metaflac::Tag as FlacTag;
use mp4ameta::{Data, FreeformIdent, Tag as Mp4Tag};
use std::path::Path;
use tracing::warn;

const ITUNES_MEAN: &str = "com.apple.iTunes";

#[derive(Debug, Clone)]
pub struct TagDecodeError(pub String);
impl std::fmt::Display for TagDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for TagDecodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Flac,
    M4a,
    Dsf,
}

impl AudioFormat {
    /// Picks the container from the file extension, case-insensitively.
    pub fn from_path(p: &Path) -> Option<AudioFormat> {
        let extension = p.extension().and_then(|s| s.to_str()).map(|s| format!(".{}", s.to_lowercase())).unwrap_or_default();
        match extension.as_str() {
            ".mp3" => Some(AudioFormat::Mp3),
            ".flac" => Some(AudioFormat::Flac),
            ".m4a" => Some(AudioFormat::M4a),
            ".dsf" => Some(AudioFormat::Dsf),
            _ => None,
        }
    }
}

/// Result of applying a score to an in-memory tag.
#[derive(Debug, Default)]
pub struct FieldUpdates {
    pub changed: bool,
    pub errors: Vec<(TagField, TagDecodeError)>,
}

pub trait FormatAdapter {
    type Tag;

    fn read(path: &Path) -> Result<Self::Tag>;

    fn write(tag: &mut Self::Tag, path: &Path) -> Result<()>;

    /// All decoded values stored under `field`. An empty vector means the field is absent.
    fn field_values(tag: &Self::Tag, field: TagField) -> std::result::Result<Vec<String>, TagDecodeError>;

    /// Replaces every value stored under `field`.
    fn set_field_values(tag: &mut Self::Tag, field: TagField, values: Vec<String>);

    /// Applies `dr` to every field in `scope`. Only the first value of a multi-valued field is
    /// merged; any further values are stored back untouched. A field that fails to decode is
    /// skipped and reported in `errors` while the remaining fields are still updated.
    fn update(tag: &mut Self::Tag, dr: DrScore, scope: TagScope) -> FieldUpdates {
        let mut updates = FieldUpdates::default();
        for &field in scope.fields() {
            let mut values = match Self::field_values(tag, field) {
                Ok(values) => values,
                Err(e) => {
                    updates.errors.push((field, e));
                    continue;
                }
            };

            if values.is_empty() {
                Self::set_field_values(tag, field, vec![dr.to_string()]);
                updates.changed = true;
                continue;
            }

            if let Some(merged) = merge_tag_value(Some(values[0].as_str()), dr, field) {
                values[0] = merged;
                Self::set_field_values(tag, field, values);
                updates.changed = true;
            }
        }
        updates
    }
}

/// Reads the tags of one file, applies `dr`, and saves the file if anything changed. Returns
/// whether the file was rewritten.
pub fn update_file(path: &Path, dr: DrScore, scope: TagScope) -> Result<bool> {
    match AudioFormat::from_path(path) {
        Some(AudioFormat::Mp3) => apply::<Id3Adapter>(path, dr, scope),
        Some(AudioFormat::Flac) => apply::<VorbisAdapter>(path, dr, scope),
        Some(AudioFormat::M4a) => apply::<Mp4Adapter>(path, dr, scope),
        Some(AudioFormat::Dsf) => apply::<DsfAdapter>(path, dr, scope),
        None => Err(DrRoonExpectedError::UnsupportedFiletype { path: path.to_path_buf() }.into()),
    }
}

fn apply<A: FormatAdapter>(path: &Path, dr: DrScore, scope: TagScope) -> Result<bool> {
    let mut tag = A::read(path)?;
    let updates = A::update(&mut tag, dr, scope);
    for (field, e) in &updates.errors {
        warn!("Skipping {} in {}: {}", field, path.display(), e);
    }
    if updates.changed {
        A::write(&mut tag, path)?;
    }
    if let Some((field, e)) = updates.errors.into_iter().next() {
        return Err(DrRoonExpectedError::TagDecode { path: path.to_path_buf(), message: format!("{field}: {e}") }.into());
    }
    Ok(updates.changed)
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> DrRoonError {
    DrRoonError::TagWrite { path: path.to_path_buf(), message: e.to_string() }
}

// ID3: TXXX frames. ID3v2.4 separates multiple values inside one frame with NUL.

fn id3_field_values(tag: &Id3Tag, field: TagField) -> Vec<String> {
    tag.extended_texts()
        .find(|ext| ext.description == field.key())
        .map(|ext| ext.value.split('\0').filter(|v| !v.is_empty()).map(String::from).collect())
        .unwrap_or_default()
}

fn set_id3_field_values(tag: &mut Id3Tag, field: TagField, values: Vec<String>) {
    tag.remove_extended_text(Some(field.key()), None);
    tag.add_frame(ExtendedText {
        description: field.key().to_string(),
        value: values.join("\0"),
    });
}

pub struct Id3Adapter;

impl FormatAdapter for Id3Adapter {
    type Tag = Id3Tag;

    fn read(path: &Path) -> Result<Id3Tag> {
        match Id3Tag::read_from_path(path) {
            Ok(tag) => Ok(tag),
            Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => Ok(Id3Tag::new()),
            Err(e) => Err(DrRoonExpectedError::TagDecode { path: path.to_path_buf(), message: e.to_string() }.into()),
        }
    }

    fn write(tag: &mut Id3Tag, path: &Path) -> Result<()> {
        tag.write_to_path(path, id3::Version::Id3v24).map_err(|e| write_error(path, e))
    }

    fn field_values(tag: &Id3Tag, field: TagField) -> std::result::Result<Vec<String>, TagDecodeError> {
        Ok(id3_field_values(tag, field))
    }

    fn set_field_values(tag: &mut Id3Tag, field: TagField, values: Vec<String>) {
        set_id3_field_values(tag, field, values)
    }
}

/// DSF files carry the same ID3 frames as MP3, stored in a block at the end of the container. A
/// file without a block starts from an empty tag; that alone is not a change.
pub struct DsfAdapter;

impl FormatAdapter for DsfAdapter {
    type Tag = Id3Tag;

    fn read(path: &Path) -> Result<Id3Tag> {
        Ok(read_dsf_tag(path)?.unwrap_or_else(Id3Tag::new))
    }

    fn write(tag: &mut Id3Tag, path: &Path) -> Result<()> {
        write_dsf_tag(path, tag)
    }

    fn field_values(tag: &Id3Tag, field: TagField) -> std::result::Result<Vec<String>, TagDecodeError> {
        Ok(id3_field_values(tag, field))
    }

    fn set_field_values(tag: &mut Id3Tag, field: TagField, values: Vec<String>) {
        set_id3_field_values(tag, field, values)
    }
}

// Vorbis comments. Keys are case-insensitive: values of every case variant are read in sorted key
// order and written back together under the canonical upper-case key.

pub struct VorbisAdapter;

impl FormatAdapter for VorbisAdapter {
    type Tag = FlacTag;

    fn read(path: &Path) -> Result<FlacTag> {
        FlacTag::read_from_path(path).map_err(|e| DrRoonExpectedError::TagDecode { path: path.to_path_buf(), message: e.to_string() }.into())
    }

    fn write(tag: &mut FlacTag, path: &Path) -> Result<()> {
        tag.write_to_path(path).map_err(|e| write_error(path, e))
    }

    fn field_values(tag: &FlacTag, field: TagField) -> std::result::Result<Vec<String>, TagDecodeError> {
        let Some(comments) = tag.vorbis_comments() else {
            return Ok(vec![]);
        };
        let mut keys: Vec<&String> = comments.comments.keys().filter(|k| k.eq_ignore_ascii_case(field.key())).collect();
        keys.sort();
        Ok(keys.into_iter().flat_map(|k| comments.comments[k].iter().cloned()).collect())
    }

    fn set_field_values(tag: &mut FlacTag, field: TagField, values: Vec<String>) {
        let comments = tag.vorbis_comments_mut();
        comments.comments.retain(|k, _| !k.eq_ignore_ascii_case(field.key()));
        comments.set(field.key(), values);
    }
}

// iTunes freeform atoms (`----:com.apple.iTunes:<KEY>`).

pub struct Mp4Adapter;

fn decode_mp4_data(data: &Data) -> std::result::Result<String, TagDecodeError> {
    match data {
        Data::Utf8(s) => Ok(s.clone()),
        Data::Utf16(s) => Ok(s.clone()),
        Data::Reserved(bytes) => String::from_utf8(bytes.clone()).map_err(|e| TagDecodeError(format!("freeform atom is not valid UTF-8: {e}"))),
        _ => Err(TagDecodeError("freeform atom does not hold text".to_string())),
    }
}

impl FormatAdapter for Mp4Adapter {
    type Tag = Mp4Tag;

    fn read(path: &Path) -> Result<Mp4Tag> {
        Mp4Tag::read_from_path(path).map_err(|e| DrRoonExpectedError::TagDecode { path: path.to_path_buf(), message: e.to_string() }.into())
    }

    fn write(tag: &mut Mp4Tag, path: &Path) -> Result<()> {
        tag.write_to_path(path).map_err(|e| write_error(path, e))
    }

    fn field_values(tag: &Mp4Tag, field: TagField) -> std::result::Result<Vec<String>, TagDecodeError> {
        tag.data_of(&FreeformIdent::new(ITUNES_MEAN, field.key())).map(decode_mp4_data).collect()
    }

    fn set_field_values(tag: &mut Mp4Tag, field: TagField, values: Vec<String>) {
        tag.remove_data_of(&FreeformIdent::new(ITUNES_MEAN, field.key()));
        let mut values = values.into_iter();
        if let Some(first) = values.next() {
            tag.set_data(FreeformIdent::new(ITUNES_MEAN, field.key()), Data::Utf8(first));
        }
        for value in values {
            tag.add_data(FreeformIdent::new(ITUNES_MEAN, field.key()), Data::Utf8(value));
        }
    }
}
