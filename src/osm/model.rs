//! OpenStreetMaps file-format envelope messages.
//!
//! Mirrors `fileformat.proto` and the header half of `osmformat.proto`.
//! Primitive blocks are not listed here, see [`crate::osm::block`].

use bytes::Bytes;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlobHeader {
    #[prost(string, required, tag = "1")]
    pub r#type: String,
    #[prost(bytes = "bytes", optional, tag = "2")]
    pub indexdata: Option<Bytes>,
    #[prost(int32, required, tag = "3")]
    pub datasize: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Blob {
    /// When compressed, the uncompressed size
    #[prost(int32, optional, tag = "2")]
    pub raw_size: Option<i32>,
    #[prost(oneof = "blob::Data", tags = "1, 3, 4, 5, 6, 7")]
    pub data: Option<blob::Data>,
}

pub mod blob {
    use bytes::Bytes;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        /// No compression
        #[prost(bytes = "bytes", tag = "1")]
        Raw(Bytes),
        #[prost(bytes = "bytes", tag = "3")]
        ZlibData(Bytes),
        #[prost(bytes = "bytes", tag = "4")]
        LzmaData(Bytes),
        /// Formerly used for bzip2 compressed data. Deprecated in 2010.
        #[prost(bytes = "bytes", tag = "5")]
        ObsoleteBzip2Data(Bytes),
        #[prost(bytes = "bytes", tag = "6")]
        Lz4Data(Bytes),
        #[prost(bytes = "bytes", tag = "7")]
        ZstdData(Bytes),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeaderBlock {
    #[prost(message, optional, tag = "1")]
    pub bbox: Option<HeaderBBox>,
    /// Features a parser must understand to read the file
    #[prost(string, repeated, tag = "4")]
    pub required_features: Vec<String>,
    #[prost(string, repeated, tag = "5")]
    pub optional_features: Vec<String>,
    #[prost(string, optional, tag = "16")]
    pub writingprogram: Option<String>,
    /// From the bbox field
    #[prost(string, optional, tag = "17")]
    pub source: Option<String>,
    /// Replication timestamp, in seconds since the epoch
    #[prost(int64, optional, tag = "32")]
    pub osmosis_replication_timestamp: Option<i64>,
    #[prost(int64, optional, tag = "33")]
    pub osmosis_replication_sequence_number: Option<i64>,
    #[prost(string, optional, tag = "34")]
    pub osmosis_replication_base_url: Option<String>,
}

/// Bounding box in nanodegrees
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct HeaderBBox {
    #[prost(sint64, required, tag = "1")]
    pub left: i64,
    #[prost(sint64, required, tag = "2")]
    pub right: i64,
    #[prost(sint64, required, tag = "3")]
    pub top: i64,
    #[prost(sint64, required, tag = "4")]
    pub bottom: i64,
}
