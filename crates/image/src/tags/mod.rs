//! Embedded tag block: schema, codec and the tagged-image type.
//!
//! The block is an EXIF payload in the JPEG's APP1 segment carrying:
//! - UserComment: the JSON inspection record, when form data exists
//! - the GPS IFD built from the frozen best fix
//! - DateTimeOriginal and DateTime stamped at write time

mod block;
mod comment;
mod container;
mod record;
mod tiff;

pub use block::{GpsBlock, InspectionComment, TagBlock, GPS_VERSION, TAG_DATETIME_FORMAT};
pub use record::InspectionRecord;

use crate::{ImageError, Result};
use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

/// Encoded JPEG bytes known to carry a decodable tag block.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedImage {
    bytes: Vec<u8>,
    payload: Vec<u8>,
    tags: TagBlock,
    width: u32,
    height: u32,
}

impl TaggedImage {
    /// Validates that `bytes` is a JPEG carrying a readable tag block.
    ///
    /// # Errors
    /// [`ImageError::MissingTags`] when no block is present or it cannot be parsed.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let payload = container::extract_payload(&bytes)?.ok_or(ImageError::MissingTags)?;
        let tags = tiff::decode_block(&payload).ok_or(ImageError::MissingTags)?;
        let (width, height) = crate::dimensions(&bytes)?;
        Ok(Self { bytes, payload, tags, width, height })
    }

    /// Encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the image, yielding its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Decoded tags.
    pub fn tags(&self) -> &TagBlock {
        &self.tags
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Moves this image's tag block verbatim onto freshly encoded pixels.
    ///
    /// # Errors
    /// [`ImageError::TagReinsertion`] if the block does not read back identically.
    pub fn reattach(&self, jpeg: &[u8]) -> Result<TaggedImage> {
        let bytes = container::insert_payload(jpeg, &self.payload)
            .map_err(|e| ImageError::TagReinsertion(e.to_string()))?;
        let rebuilt = TaggedImage::from_bytes(bytes)
            .map_err(|e| ImageError::TagReinsertion(e.to_string()))?;

        if rebuilt.tags != self.tags {
            return Err(ImageError::TagReinsertion("tag block changed on reinsertion".into()));
        }
        Ok(rebuilt)
    }
}

/// Writes the tag block for `record`, stamped with the current local time.
///
/// Replaces any tag block already present, including camera orientation.
pub fn write_tags(image: &[u8], record: &InspectionRecord) -> Result<TaggedImage> {
    write_tags_at(image, record, Local::now().naive_local())
}

/// Like [`write_tags`] with an explicit DateTimeOriginal.
pub fn write_tags_at(
    image: &[u8],
    record: &InspectionRecord,
    now: NaiveDateTime,
) -> Result<TaggedImage> {
    let block = TagBlock::from_record(record, now)?;
    let payload = tiff::encode_block(&block)?;
    let bytes = container::insert_payload(image, &payload)?;

    info!(
        has_comment = block.comment.is_some(),
        has_gps = block.gps.is_some(),
        "Wrote tag block"
    );

    let tagged = TaggedImage::from_bytes(bytes)
        .map_err(|e| ImageError::EncodingUnavailable(format!("written block unreadable: {}", e)))?;
    if tagged.tags != block {
        return Err(ImageError::EncodingUnavailable("written block does not read back".into()));
    }
    Ok(tagged)
}

/// Reads the tag block from encoded bytes.
///
/// Returns `None` for untagged or non-JPEG input.
pub fn read_tags(image: &[u8]) -> Option<TagBlock> {
    let payload = container::extract_payload(image).ok()??;
    let block = tiff::decode_block(&payload);
    debug!(found = block.is_some(), "Read tag block");
    block
}
