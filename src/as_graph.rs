use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::as_path::{AsPath, AsPathRecord};
use crate::shared::ASN;

/// An undirected adjacency between two ASes.
///
/// `source` is always the smaller AS number, so a pair has exactly one
/// representation no matter which direction it was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub source: ASN,
    pub target: ASN,
    pub value: u64,
}

impl Link {
    pub fn pair(&self) -> (ASN, ASN) {
        (self.source, self.target)
    }
}

fn normalize(a: ASN, b: ASN) -> (ASN, ASN) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub paths_seen: u64,
    pub paths_used: u64,
    pub paths_too_short: u64,
    pub elements_dropped: u64,
}

/// Single pass accumulator turning AS paths into nodes and weighted links.
///
/// Nodes are only registered as link endpoints: a path that flattens to a
/// single AS contributes nothing.
#[derive(Debug, Default)]
pub struct AsGraphBuilder {
    nodes: HashSet<ASN>,
    links: HashMap<(ASN, ASN), u64>,
    stats: BuildStats,
}

impl AsGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_path(&mut self, path: &AsPath) {
        self.stats.paths_seen += 1;
        self.stats.elements_dropped += path.dropped().len() as u64;

        if !path.is_linkable() {
            self.stats.paths_too_short += 1;
            debug!("skipping AS path without adjacencies");
            return;
        }

        for (a, b) in path.adjacencies() {
            self.nodes.insert(a);
            self.nodes.insert(b);
            *self.links.entry(normalize(a, b)).or_insert(0) += 1;
        }
        self.stats.paths_used += 1;

        if self.stats.paths_used % 100_000 == 0 {
            info!("  Processed {} AS paths...", self.stats.paths_used);
        }
    }

    pub fn add_record(&mut self, record: &AsPathRecord) {
        self.add_path(&AsPath::from_record(record));
    }

    pub fn add_asns(&mut self, asns: &[ASN]) {
        self.add_path(&AsPath::from_asns(asns));
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Freeze the accumulated state. Nodes come out ascending, links ascending
    /// by endpoint pair, so identical input always yields an identical graph.
    pub fn build(self) -> AsGraph {
        let mut nodes: Vec<ASN> = self.nodes.into_iter().collect();
        nodes.sort_unstable();

        let mut links: Vec<Link> = self
            .links
            .into_iter()
            .map(|((source, target), value)| Link { source, target, value })
            .collect();
        links.sort_unstable();

        info!(
            "Analysis complete. Found {} unique ASes and {} unique links.",
            nodes.len(),
            links.len()
        );

        AsGraph {
            nodes,
            links,
            stats: self.stats,
        }
    }
}

/// Finalized AS adjacency graph. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsGraph {
    nodes: Vec<ASN>,
    links: Vec<Link>,
    stats: BuildStats,
}

impl AsGraph {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AsPathRecord>,
    {
        let mut builder = AsGraphBuilder::new();
        for record in records {
            builder.add_record(record);
        }
        builder.build()
    }

    pub fn from_asn_paths<P: AsRef<[ASN]>>(paths: &[P]) -> Self {
        let mut builder = AsGraphBuilder::new();
        for path in paths {
            builder.add_asns(path.as_ref());
        }
        builder.build()
    }

    pub fn nodes(&self) -> &[ASN] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, asn: ASN) -> bool {
        self.nodes.binary_search(&asn).is_ok()
    }

    /// Occurrence count of the undirected pair, if the ASes were ever adjacent.
    pub fn weight(&self, a: ASN, b: ASN) -> Option<u64> {
        let pair = normalize(a, b);
        self.links
            .binary_search_by(|link| link.pair().cmp(&pair))
            .ok()
            .map(|i| self.links[i].value)
    }

    pub fn neighbors(&self, asn: ASN) -> Vec<ASN> {
        self.links
            .iter()
            .filter_map(|link| {
                if link.source == asn {
                    Some(link.target)
                } else if link.target == asn {
                    Some(link.source)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn exceeds(&self, max_nodes: usize, max_links: usize) -> bool {
        self.node_count() > max_nodes || self.link_count() > max_links
    }
}
