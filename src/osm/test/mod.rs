
use std::io::Cursor;

use approx::assert_relative_eq;
use bytes::Bytes;
use log::info;
use prost::Message;

use self::fixture::{BlockBuilder, FileBuilder, frame, node, proto, raw_blob, zlib_blob};
use crate::error::CodecError;
use crate::osm::blob::{BlobIterator, BlobKind, MAX_BLOB_SIZE, decompress};
use crate::osm::block::{BlockItem, BlockIterator, Coordinates, PrimitiveBlock};
use crate::osm::element::{Element, Node};
use crate::osm::model::{Blob, BlobHeader, blob::Data};

fn nodes_of(block: &PrimitiveBlock) -> crate::Result<Vec<Node>> {
    let mut nodes = Vec::new();
    for element in block.elements() {
        for node in element?.nodes(block)? {
            nodes.push(node?);
        }
    }
    Ok(nodes)
}

fn tag<'n>(node: &'n Node, key: &str) -> Option<&'n str> {
    node.tags.get(key).map(|value| value.as_str())
}

#[test_log::test]
fn iterate_blobs_each() {
    let block = BlockBuilder::new().dense(&[node(1, 0, 0, &[])]).build();
    let file = FileBuilder::new().header().data(&block).data(&block).build();

    let blobs = BlobIterator::new(Cursor::new(file))
        .collect::<crate::Result<Vec<_>>>()
        .unwrap();

    let kinds = blobs.iter().map(|blob| blob.kind.clone()).collect::<Vec<_>>();
    assert_eq!(kinds, vec![BlobKind::Header, BlobKind::Data, BlobKind::Data]);
    assert_eq!(blobs[2].index, 2);

    for blob in &blobs {
        info!("Have blob: {}. Type: {}", blob.header.datasize, blob.kind.as_str());
        assert_eq!(blob.payload().len(), blob.header.datasize as usize);
    }
}

#[test]
fn blob_offsets_point_at_payloads() {
    let block = BlockBuilder::new().build();
    let file = FileBuilder::new().header().data(&block).build();

    for blob in BlobIterator::new(Cursor::new(file.clone())) {
        let blob = blob.unwrap();
        let start = blob.offset as usize;
        assert_eq!(&file[start..start + blob.payload().len()], blob.payload());
    }
}

#[test]
fn truncated_payload_is_reported_once() {
    let block = BlockBuilder::new().dense(&[node(1, 0, 0, &[])]).build();
    let file = FileBuilder::new().header().data(&block).build();
    let truncated = &file[..file.len() - 3];

    let mut blobs = BlobIterator::new(Cursor::new(truncated));
    assert!(blobs.next().unwrap().is_ok());
    assert!(matches!(
        blobs.next(),
        Some(Err(CodecError::TruncatedInput {
            context: "blob payload",
            ..
        }))
    ));
    assert!(blobs.next().is_none());
}

#[test]
fn truncated_length_prefix() {
    let file = FileBuilder::new().header().bytes(&[0, 0]).build();

    let mut blobs = BlobIterator::new(Cursor::new(file));
    assert!(blobs.next().unwrap().is_ok());
    assert!(matches!(
        blobs.next(),
        Some(Err(CodecError::TruncatedInput {
            expected: 4,
            found: 2,
            ..
        }))
    ));
}

#[test]
fn oversized_header_is_rejected() {
    let mut file = (64 * 1024 + 1_u32).to_be_bytes().to_vec();
    file.extend_from_slice(&[0; 16]);

    assert!(matches!(
        BlobIterator::new(Cursor::new(file)).next(),
        Some(Err(CodecError::OversizedBlob {
            context: "blob header",
            ..
        }))
    ));
}

#[test]
fn oversized_blob_is_rejected() {
    let header = BlobHeader {
        r#type: "OSMData".to_string(),
        indexdata: None,
        datasize: MAX_BLOB_SIZE as i32 + 1,
    }
    .encode_to_vec();

    let mut file = (header.len() as u32).to_be_bytes().to_vec();
    file.extend_from_slice(&header);

    assert!(matches!(
        BlobIterator::new(Cursor::new(file)).next(),
        Some(Err(CodecError::OversizedBlob { context: "blob", .. }))
    ));
}

#[test]
fn oversized_uncompressed_size_is_rejected() {
    let mut blob = zlib_blob(b"small");
    blob.raw_size = Some(MAX_BLOB_SIZE as i32 + 1);

    assert!(matches!(
        decompress(blob),
        Err(CodecError::OversizedBlob {
            context: "uncompressed blob",
            limit: MAX_BLOB_SIZE,
            ..
        })
    ));

    let mut raw = raw_blob(b"small");
    raw.raw_size = Some(i32::MAX);
    assert!(matches!(
        decompress(raw),
        Err(CodecError::OversizedBlob { context: "uncompressed blob", .. })
    ));
}

#[test]
fn decompresses_raw_and_zlib() {
    let payload = b"a primitive block, or near enough".to_vec();

    assert_eq!(decompress(raw_blob(&payload)).unwrap(), Bytes::from(payload.clone()));
    assert_eq!(decompress(zlib_blob(&payload)).unwrap(), Bytes::from(payload));
}

#[test]
fn declared_size_must_match() {
    let mut blob = zlib_blob(b"0123456789");
    blob.raw_size = Some(4);
    assert!(matches!(
        decompress(blob),
        Err(CodecError::SizeMismatch { declared: 4, .. })
    ));

    let mut blob = zlib_blob(b"0123456789");
    blob.raw_size = Some(20);
    assert!(matches!(
        decompress(blob),
        Err(CodecError::SizeMismatch {
            declared: 20,
            actual: 10
        })
    ));

    let mut blob = raw_blob(b"0123456789");
    blob.raw_size = Some(9);
    assert!(matches!(
        decompress(blob),
        Err(CodecError::SizeMismatch {
            declared: 9,
            actual: 10
        })
    ));
}

#[test]
fn corrupt_zlib_fails_to_decompress() {
    let blob = Blob {
        raw_size: Some(64),
        data: Some(Data::ZlibData(Bytes::from_static(b"definitely not deflate"))),
    };

    assert!(matches!(
        decompress(blob),
        Err(CodecError::DecompressionError(_))
    ));
}

#[test]
fn unsupported_compression_is_not_passed_through() {
    let blob = Blob {
        raw_size: Some(3),
        data: Some(Data::Lz4Data(Bytes::from_static(b"abc"))),
    };
    assert!(matches!(
        decompress(blob),
        Err(CodecError::UnsupportedCompression(kind)) if kind == "lz4"
    ));

    let empty = Blob {
        raw_size: None,
        data: None,
    };
    assert!(matches!(
        decompress(empty),
        Err(CodecError::UnsupportedCompression(_))
    ));
}

#[test]
fn dense_nodes_round_trip() {
    let data = BlockBuilder::new()
        .dense(&[
            node(1, 515_000_000, -1_200_000, &[]),
            node(2, 515_010_000, -1_190_000, &[("highway", "residential")]),
            node(3, 515_020_000, -1_180_000, &[]),
        ])
        .build();

    let block = PrimitiveBlock::decode(&data).unwrap();
    let nodes = nodes_of(&block).unwrap();

    assert_eq!(nodes.iter().map(Node::id).collect::<Vec<_>>(), vec![1, 2, 3]);

    assert_relative_eq!(nodes[0].lat(), 51.5, epsilon = 1e-9);
    assert_relative_eq!(nodes[0].lon(), -0.12, epsilon = 1e-9);
    assert_relative_eq!(nodes[1].lat(), 51.501, epsilon = 1e-9);
    assert_relative_eq!(nodes[2].lon(), -0.118, epsilon = 1e-9);

    assert!(nodes[0].tags.is_empty());
    assert_eq!(nodes[1].tags.len(), 1);
    assert_eq!(tag(&nodes[1], "highway"), Some("residential"));
    assert!(nodes[2].tags.is_empty());
}

#[test]
fn dense_ids_accumulate_signed_deltas() {
    let data = BlockBuilder::new()
        .dense(&[node(5, 0, 0, &[]), node(3, 0, 0, &[]), node(13, 0, 0, &[])])
        .build();

    let block = PrimitiveBlock::decode(&data).unwrap();
    let ids = nodes_of(&block)
        .unwrap()
        .iter()
        .map(Node::id)
        .collect::<Vec<_>>();

    assert_eq!(ids, vec![5, 3, 13]);
}

#[test]
fn dense_without_tag_stream_is_untagged() {
    let data = BlockBuilder::new()
        .dense(&[node(1, 10, 10, &[]), node(2, 20, 20, &[])])
        .build();

    let block = PrimitiveBlock::decode(&data).unwrap();
    let nodes = nodes_of(&block).unwrap();

    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|node| node.tags.is_empty()));
}

#[test]
fn dense_index_out_of_range() {
    let block = proto::PrimitiveBlock {
        stringtable: proto::StringTable {
            s: vec![b"".to_vec(), b"name".to_vec()],
        },
        primitivegroup: vec![proto::PrimitiveGroup {
            dense: Some(proto::DenseNodes {
                id: vec![1],
                lat: vec![0],
                lon: vec![0],
                keys_vals: vec![1, 7, 0],
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
    .encode_to_vec();

    let block = PrimitiveBlock::decode(&block).unwrap();
    assert!(matches!(
        nodes_of(&block),
        Err(CodecError::IndexOutOfRange { index: 7, len: 2 })
    ));
}

#[test]
fn dense_columns_split_over_several_fields() {
    let head = proto::DenseNodes {
        id: vec![1, 1],
        lat: vec![10, 10],
        lon: vec![20, 20],
        keys_vals: vec![0, 1, 2, 0],
    };
    let tail = proto::DenseNodes {
        id: vec![1],
        lat: vec![10],
        lon: vec![20],
        keys_vals: vec![0],
    };

    // Concatenated messages merge, repeating every packed field.
    let mut dense = head.encode_to_vec();
    dense.extend(tail.encode_to_vec());

    let table = proto::StringTable {
        s: vec![b"".to_vec(), b"place".to_vec(), b"city".to_vec()],
    };

    let mut group = Vec::new();
    prost::encoding::bytes::encode(2, &dense, &mut group);

    let mut data = Vec::new();
    prost::encoding::message::encode(1, &table, &mut data);
    prost::encoding::bytes::encode(2, &group, &mut data);

    let block = PrimitiveBlock::decode(&data).unwrap();
    let nodes = nodes_of(&block).unwrap();

    assert_eq!(nodes.iter().map(Node::id).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_relative_eq!(nodes[2].lat(), 30.0 * 100.0 * 1e-9, epsilon = 1e-15);
    assert_relative_eq!(nodes[2].lon(), 60.0 * 100.0 * 1e-9, epsilon = 1e-15);
    assert!(nodes[0].tags.is_empty());
    assert_eq!(tag(&nodes[1], "place"), Some("city"));
    assert!(nodes[2].tags.is_empty());
}

#[test]
fn dense_column_length_mismatch() {
    let block = proto::PrimitiveBlock {
        primitivegroup: vec![proto::PrimitiveGroup {
            dense: Some(proto::DenseNodes {
                id: vec![1, 1, 1],
                lat: vec![0, 0],
                lon: vec![0, 0, 0],
                keys_vals: vec![],
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
    .encode_to_vec();

    let block = PrimitiveBlock::decode(&block).unwrap();
    assert!(matches!(
        nodes_of(&block),
        Err(CodecError::ArrayLengthMismatch {
            ids: 3,
            lats: 2,
            lons: 3
        })
    ));
}

/// A raw value of 1_000_000_000 nanodegrees is one degree. Stored values
/// are in granularity units, so at the default granularity of 100 that raw
/// value is stored as 10_000_000.
#[test]
fn raw_billion_nanodegrees_at_granularity_100_is_one_degree() {
    let coordinates = Coordinates::default();
    assert_eq!(coordinates.granularity, 100);
    assert_relative_eq!(coordinates.lon(10_000_000), 1.0, epsilon = 1e-12);
    assert_relative_eq!(coordinates.lat(10_000_000), 1.0, epsilon = 1e-12);

    let data = BlockBuilder::new()
        .dense(&[node(1, 0, 1_000_000_000 / 100, &[])])
        .build();
    let block = PrimitiveBlock::decode(&data).unwrap();

    let nodes = nodes_of(&block).unwrap();
    assert_relative_eq!(nodes[0].lon(), 1.0, epsilon = 1e-9);
}

#[test]
fn coordinates_scale_by_granularity_and_offset() {
    let unit = Coordinates {
        granularity: 1,
        ..Coordinates::default()
    };
    assert_relative_eq!(unit.lon(1_000_000_000), 1.0, epsilon = 1e-12);

    let data = BlockBuilder::new()
        .granularity(1000)
        .offsets(500_000_000, -250_000_000)
        .dense(&[node(1, 1_000_000, 2_000_000, &[])])
        .build();

    let block = PrimitiveBlock::decode(&data).unwrap();
    assert_eq!(block.coordinates.granularity, 1000);
    assert!(!block.coordinates.is_default());

    let nodes = nodes_of(&block).unwrap();
    assert_relative_eq!(nodes[0].lat(), 1.5, epsilon = 1e-9);
    assert_relative_eq!(nodes[0].lon(), 1.75, epsilon = 1e-9);
}

#[test]
fn plain_nodes_are_decoded() {
    let data = BlockBuilder::new()
        .plain(&[
            node(-7, 100, 200, &[("place", "city"), ("name", "Kyiv")]),
            node(8, -100, -200, &[]),
        ])
        .build();

    let block = PrimitiveBlock::decode(&data).unwrap();
    let nodes = nodes_of(&block).unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].id, -7);
    assert_relative_eq!(nodes[0].lat(), 1e-5, epsilon = 1e-12);
    assert_relative_eq!(nodes[1].lon(), -2e-5, epsilon = 1e-12);
    assert_eq!(tag(&nodes[0], "place"), Some("city"));
    assert_eq!(tag(&nodes[0], "name"), Some("Kyiv"));
    assert!(nodes[1].tags.is_empty());
}

#[test]
fn ways_are_skipped_structurally() {
    let data = BlockBuilder::new()
        .way(10, &[1, 1, 1], &[("highway", "residential")])
        .dense(&[node(1, 0, 0, &[("barrier", "gate")])])
        .build();

    let block = PrimitiveBlock::decode(&data).unwrap();
    let elements = block
        .elements()
        .collect::<crate::Result<Vec<_>>>()
        .unwrap();

    assert_eq!(elements.len(), 2);
    assert!(matches!(elements[0], Element::Ways { count: 1, .. }));
    assert!(matches!(elements[1], Element::DenseNodes(_)));

    let nodes = nodes_of(&block).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(tag(&nodes[0], "barrier"), Some("gate"));
}

#[test]
fn unknown_block_fields_are_skipped() {
    let mut data = BlockBuilder::new()
        .dense(&[node(1, 0, 0, &[("amenity", "cafe")])])
        .build();

    // date_granularity, then an unknown fixed64 and length-delimited field
    prost::encoding::int32::encode(18, &1000, &mut data);
    prost::encoding::fixed64::encode(90, &7, &mut data);
    prost::encoding::bytes::encode(91, &b"future".to_vec(), &mut data);

    let block = PrimitiveBlock::decode(&data).unwrap();
    let nodes = nodes_of(&block).unwrap();

    assert_eq!(nodes.len(), 1);
    assert_eq!(tag(&nodes[0], "amenity"), Some("cafe"));
}

#[test]
fn empty_block_has_no_elements() {
    let data = BlockBuilder::new().build();
    let block = PrimitiveBlock::decode(&data).unwrap();

    assert_eq!(block.group_count(), 0);
    assert_eq!(block.stringtable.len(), 1);
    assert!(nodes_of(&block).unwrap().is_empty());
}

#[test_log::test]
fn iterate_blocks_each() {
    let block = BlockBuilder::new().dense(&[node(1, 0, 0, &[])]).build();
    let file = FileBuilder::new()
        .header()
        .data(&block)
        .blob("OSMIndex", raw_blob(b"ignored"))
        .raw_data(&block)
        .build();

    let mut primitive_blocks = 0;
    let mut header_blocks = 0;

    for block in BlockIterator::new(Cursor::new(file)) {
        match block.unwrap() {
            BlockItem::HeaderBlock(header) => {
                header_blocks += 1;
                assert_eq!(header.unsupported_features().count(), 0);
                assert_eq!(header.writing_program.as_deref(), Some("routers_pbf fixtures"));

                let bbox = header.bbox.unwrap();
                assert_relative_eq!(bbox.min().x, -77.12, epsilon = 1e-9);
                assert_relative_eq!(bbox.max().y, 38.996, epsilon = 1e-9);
            }
            BlockItem::PrimitiveBlock(data) => {
                primitive_blocks += 1;
                let block = data.decode().unwrap();
                assert_eq!(nodes_of(&block).unwrap().len(), 1);
            }
        }
    }

    assert_eq!(header_blocks, 1);
    assert_eq!(primitive_blocks, 2);
}

#[test]
fn unknown_blob_kind_is_typed() {
    let file = frame("OSMIndex", &raw_blob(b"x").encode_to_vec());
    let blob = BlobIterator::new(Cursor::new(file)).next().unwrap().unwrap();

    assert_eq!(blob.kind, BlobKind::Unknown("OSMIndex".to_string()));
    assert!(matches!(
        BlockItem::from_blob_item(&blob),
        Err(CodecError::UnknownBlobKind(kind)) if kind == "OSMIndex"
    ));
}

#[test]
fn blob_kinds_parse_from_header_type() {
    assert_eq!(BlobKind::parse("OSMHeader"), BlobKind::Header);
    assert_eq!(BlobKind::parse("OSMData"), BlobKind::Data);
    assert_eq!(
        BlobKind::parse("osmdata"),
        BlobKind::Unknown("osmdata".to_string())
    );
    assert_eq!(BlobKind::parse("OSMData").as_str(), "OSMData");
}
