//! The `Element` item, provides distinction for the entity groups of a
//! primitive block: dense nodes, plain nodes, ways and relations.

use either::Either;

use super::dense::DenseNodes;
use super::variants::Node;
use crate::error::Result;
use crate::osm::block::PrimitiveBlock;
use crate::osm::wire::Fields;

const GROUP_NODES: u32 = 1;
const GROUP_DENSE: u32 = 2;
const GROUP_WAYS: u32 = 3;
const GROUP_RELATIONS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<'a> {
    DenseNodes(DenseNodes<'a>),
    /// Encoded `Node` messages, one per node
    Nodes(Vec<&'a [u8]>),
    Ways { count: usize, len: usize },
    Relations { count: usize, len: usize },
    /// Changesets, or a group kind newer than this reader
    Unknown { field: u32, len: usize },
}

impl<'a> Element<'a> {
    /// Splits one `PrimitiveGroup` message into its elements. A group
    /// normally holds a single kind, in which case one element is returned.
    pub(crate) fn from_group(group: &'a [u8]) -> Result<Vec<Element<'a>>> {
        let mut elements: Vec<Element<'a>> = Vec::new();
        let mut nodes = Vec::new();
        let (mut ways, mut relations) = ((0, 0), (0, 0));

        for field in Fields::new(group) {
            let field = field?;

            match field.number {
                GROUP_NODES => nodes.push(field.bytes()?),
                GROUP_DENSE => {
                    elements.push(Element::DenseNodes(DenseNodes::decode(field.bytes()?)?))
                }
                GROUP_WAYS => ways = (ways.0 + 1, ways.1 + field.bytes()?.len()),
                GROUP_RELATIONS => {
                    relations = (relations.0 + 1, relations.1 + field.bytes()?.len())
                }
                number => elements.push(Element::Unknown {
                    field: number,
                    len: field.bytes().map_or(0, <[u8]>::len),
                }),
            }
        }

        if !nodes.is_empty() {
            elements.push(Element::Nodes(nodes));
        }

        if ways.0 > 0 {
            elements.push(Element::Ways {
                count: ways.0,
                len: ways.1,
            });
        }

        if relations.0 > 0 {
            elements.push(Element::Relations {
                count: relations.0,
                len: relations.1,
            });
        }

        Ok(elements)
    }

    pub fn str_type(&self) -> &str {
        match self {
            Element::DenseNodes(_) => "node set",
            Element::Nodes(_) => "node",
            Element::Ways { .. } => "way",
            Element::Relations { .. } => "relation",
            Element::Unknown { .. } => "unknown",
        }
    }

    /// The nodes held by this element, resolved against `block`. Elements
    /// which are not nodes yield nothing.
    pub fn nodes<'b>(
        self,
        block: &'b PrimitiveBlock<'a>,
    ) -> Result<impl Iterator<Item = Result<Node>> + 'b>
    where
        'a: 'b,
    {
        let (table, coordinates) = (&block.stringtable, block.coordinates);

        Ok(match self {
            Element::DenseNodes(dense) => {
                Either::Left(Node::from_dense(dense, table, coordinates)?)
            }
            Element::Nodes(nodes) => Either::Right(Either::Left(
                nodes
                    .into_iter()
                    .map(move |node| Node::from_plain(node, table, coordinates)),
            )),
            _ => Either::Right(Either::Right(std::iter::empty())),
        })
    }
}
