//! Overpass JSON レスポンスの型

use bridge_geo_common::GeoPoint;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,

    /// 実行時エラー（タイムアウト等）は200でもここに入る
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node(Node),
    Way(Way),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Way {
    pub id: i64,
    #[serde(default)]
    pub nodes: Vec<i64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OverpassResponse {
    /// レスポンス順のway
    pub fn ways(&self) -> impl Iterator<Item = &Way> {
        self.elements.iter().filter_map(|e| match e {
            Element::Way(way) => Some(way),
            _ => None,
        })
    }

    pub fn has_ways(&self) -> bool {
        self.ways().next().is_some()
    }

    /// このレスポンス限りのnode座標表
    pub fn node_table(&self) -> NodeTable<'_> {
        let nodes = self
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Node(node) => Some((node.id, node)),
                _ => None,
            })
            .collect();
        NodeTable { nodes }
    }
}

pub struct NodeTable<'a> {
    nodes: HashMap<i64, &'a Node>,
}

impl NodeTable<'_> {
    /// 座標が欠けている・範囲外の場合は None
    pub fn coordinate(&self, id: i64) -> Option<GeoPoint> {
        let node = self.nodes.get(&id)?;
        GeoPoint::new(node.lat?, node.lon?)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Way {
    /// 先頭と末尾のnode座標（node列の順序そのまま）
    pub fn endpoints(&self, table: &NodeTable<'_>) -> Option<(GeoPoint, GeoPoint)> {
        let first = *self.nodes.first()?;
        let last = *self.nodes.last()?;
        Some((table.coordinate(first)?, table.coordinate(last)?))
    }

    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }
}
