//! KML description parsing.
//!
//! The host's KML is not versioned, and the pyramid fields have moved between
//! nesting levels over time. Fields are therefore located by element name at
//! any depth rather than by a fixed path.

use super::types::{MetadataError, PanoramaMetadata};
use roxmltree::Document;

const FIELD_MAX_WIDTH: &str = "maxWidth";
const FIELD_MAX_HEIGHT: &str = "maxHeight";
const FIELD_TILE_SIZE: &str = "tileSize";

/// Parses a panorama description document.
///
/// # Errors
///
/// - [`MetadataError::Parse`] if the document is not well-formed XML
/// - [`MetadataError::MissingField`] if a required element is absent
/// - [`MetadataError::InvalidField`] if a value is not a positive integer
pub fn parse_metadata(document: &str) -> Result<PanoramaMetadata, MetadataError> {
    let doc = Document::parse(document).map_err(|e| MetadataError::Parse(e.to_string()))?;

    Ok(PanoramaMetadata {
        max_width: required_dimension(&doc, FIELD_MAX_WIDTH)?,
        max_height: required_dimension(&doc, FIELD_MAX_HEIGHT)?,
        tile_size: required_dimension(&doc, FIELD_TILE_SIZE)?,
    })
}

/// Returns the text of the first element named `name`, in document order.
///
/// Namespaces are ignored; only the local name is compared.
fn find_element_text(doc: &Document, name: &str) -> Option<String> {
    doc.descendants()
        .find(|node| node.is_element() && node.tag_name().name() == name)
        .map(|node| {
            node.children()
                .filter(|child| child.is_text())
                .filter_map(|child| child.text())
                .collect::<String>()
        })
}

fn required_dimension(doc: &Document, field: &'static str) -> Result<u32, MetadataError> {
    let text = find_element_text(doc, field).ok_or(MetadataError::MissingField(field))?;
    let trimmed = text.trim();

    let value: u32 = trimmed.parse().map_err(|e| MetadataError::InvalidField {
        field,
        value: trimmed.to_string(),
        reason: format!("{}", e),
    })?;

    if value == 0 {
        return Err(MetadataError::InvalidField {
            field,
            value: trimmed.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(value)
}
