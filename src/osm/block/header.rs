//! The decoded `OSMHeader` block.

use geo::{Rect, coord};
use log::warn;

use super::NANODEGREE;
use crate::osm::model::HeaderBlock;

/// Features this reader understands when listed as required.
pub const SUPPORTED_FEATURES: [&str; 3] = ["OsmSchema-V0.6", "DenseNodes", "HistoricalInformation"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileHeader {
    /// Bounding box of the file contents, in degrees
    pub bbox: Option<Rect>,
    pub required_features: Vec<String>,
    pub optional_features: Vec<String>,
    pub writing_program: Option<String>,
    pub source: Option<String>,
    pub replication_timestamp: Option<i64>,
    pub replication_sequence_number: Option<i64>,
    pub replication_base_url: Option<String>,
}

impl FileHeader {
    /// Required features outside of [`SUPPORTED_FEATURES`].
    pub fn unsupported_features(&self) -> impl Iterator<Item = &str> {
        self.required_features
            .iter()
            .map(String::as_str)
            .filter(|feature| !SUPPORTED_FEATURES.contains(feature))
    }

    pub(crate) fn report_unsupported(&self) {
        for feature in self.unsupported_features() {
            warn!("File requires unsupported feature {feature:?}, entities may be skipped");
        }
    }
}

impl From<HeaderBlock> for FileHeader {
    fn from(value: HeaderBlock) -> Self {
        let bbox = value.bbox.map(|bbox| {
            Rect::new(
                coord! { x: bbox.left as f64 * NANODEGREE, y: bbox.bottom as f64 * NANODEGREE },
                coord! { x: bbox.right as f64 * NANODEGREE, y: bbox.top as f64 * NANODEGREE },
            )
        });

        FileHeader {
            bbox,
            required_features: value.required_features,
            optional_features: value.optional_features,
            writing_program: value.writingprogram,
            source: value.source,
            replication_timestamp: value.osmosis_replication_timestamp,
            replication_sequence_number: value.osmosis_replication_sequence_number,
            replication_base_url: value.osmosis_replication_base_url,
        }
    }
}
