use ipnetwork::IpNetwork;
use log::debug;

use crate::shared::{InvalidAsn, ASN};

/// One RIB entry as handed over by a path source, before any validation.
///
/// `tokens` holds the path exactly as the parser printed it, so AS sets
/// (`{64512,64513}`) and other oddities are still present at this point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsPathRecord {
    pub prefix: Option<IpNetwork>,
    pub tokens: Vec<String>,
}

impl AsPathRecord {
    pub fn new(prefix: Option<IpNetwork>, tokens: Vec<String>) -> Self {
        AsPathRecord { prefix, tokens }
    }

    /// Split a space separated path such as `"3356 1299 1299 15169"`.
    pub fn from_path_str(prefix: Option<IpNetwork>, path: &str) -> Self {
        AsPathRecord {
            prefix,
            tokens: path.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Parse a single path element into an AS number.
pub fn parse_asn(token: &str) -> Result<ASN, InvalidAsn> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidAsn::NotNumeric(token.to_string()));
    }
    match token.parse::<ASN>() {
        Ok(0) => Err(InvalidAsn::Reserved),
        Ok(asn) => Ok(asn),
        Err(_) => Err(InvalidAsn::OutOfRange(token.to_string())),
    }
}

/// A validated AS path.
///
/// Malformed elements are filtered out and their neighbours become adjacent,
/// so `1 {2,3} 4` links 1 and 4. Prepending (the same AS repeated back to
/// back, also across a dropped element) is collapsed, so the path never
/// contains a self-loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsPath {
    asns: Vec<ASN>,
    dropped: Vec<InvalidAsn>,
}

impl AsPath {
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut path = AsPath::default();
        for token in tokens {
            path.push(parse_asn(token.as_ref()));
        }
        path
    }

    pub fn from_asns(asns: &[ASN]) -> Self {
        let mut path = AsPath::default();
        for &asn in asns {
            let checked = if asn == 0 { Err(InvalidAsn::Reserved) } else { Ok(asn) };
            path.push(checked);
        }
        path
    }

    pub fn from_record(record: &AsPathRecord) -> Self {
        Self::parse(&record.tokens)
    }

    fn push(&mut self, element: Result<ASN, InvalidAsn>) {
        match element {
            Ok(asn) if self.asns.last() == Some(&asn) => {}
            Ok(asn) => self.asns.push(asn),
            Err(reason) => {
                debug!("dropping AS path element: {}", reason);
                self.dropped.push(reason);
            }
        }
    }

    /// Adjacent AS pairs in path order.
    pub fn adjacencies(&self) -> impl Iterator<Item = (ASN, ASN)> + '_ {
        self.asns.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn hop_count(&self) -> usize {
        self.asns.len().saturating_sub(1)
    }

    /// True when the path yields at least one adjacency.
    pub fn is_linkable(&self) -> bool {
        self.hop_count() > 0
    }

    /// All valid AS numbers in path order.
    pub fn asns(&self) -> &[ASN] {
        &self.asns
    }

    pub fn dropped(&self) -> &[InvalidAsn] {
        &self.dropped
    }
}
