use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::as_graph::AsGraph;
use crate::as_path::parse_asn;
use crate::shared::{Result, ASN};

/// The node/link document handed from the pipeline to the renderer.
///
/// Written with integer ids; ids given as numeric strings are accepted on
/// the way back in, as is a link without a `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphArtifact {
    pub nodes: Vec<ArtifactNode>,
    pub links: Vec<ArtifactLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactNode {
    #[serde(deserialize_with = "deserialize_asn")]
    pub id: ASN,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactLink {
    #[serde(deserialize_with = "deserialize_asn")]
    pub source: ASN,
    #[serde(deserialize_with = "deserialize_asn")]
    pub target: ASN,
    #[serde(default = "default_value")]
    pub value: u64,
}

fn default_value() -> u64 {
    1
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn deserialize_asn<'de, D>(deserializer: D) -> std::result::Result<ASN, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Number(0) => Err(de::Error::custom("AS number 0 is reserved")),
        RawId::Number(n) => ASN::try_from(n)
            .map_err(|_| de::Error::custom(format!("AS number {} does not fit in 32 bits", n))),
        RawId::Text(s) => parse_asn(s.trim()).map_err(de::Error::custom),
    }
}

impl GraphArtifact {
    pub fn from_graph(graph: &AsGraph) -> Self {
        GraphArtifact {
            nodes: graph.nodes().iter().map(|&id| ArtifactNode { id }).collect(),
            links: graph
                .links()
                .iter()
                .map(|link| ArtifactLink {
                    source: link.source,
                    target: link.target,
                    value: link.value,
                })
                .collect(),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write compact JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        info!("Saving graph data to {:?}...", path);
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        info!("Graph data saved successfully.");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_set(&self) -> HashSet<ASN> {
        self.nodes.iter().map(|node| node.id).collect()
    }

    /// Links as unordered pairs, smaller AS number first.
    pub fn link_set(&self) -> HashSet<(ASN, ASN)> {
        self.links
            .iter()
            .map(|link| {
                if link.source <= link.target {
                    (link.source, link.target)
                } else {
                    (link.target, link.source)
                }
            })
            .collect()
    }
}
