//! JSON wire types for analysis requests and responses
//!
//! The request carries node, support and load data as JSON objects keyed by
//! node id. Key order matters (it fixes DOF numbering and the order of the
//! response), and a repeated key has to be reported rather than collapsed,
//! so those objects are read into [`Entries`] instead of a hash map.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ErrorKind, TrussError};
use crate::results::AnalysisSummary;

/// Node identifier as it appears on the wire
///
/// Accepts JSON strings and integers; integers are kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeKey(pub String);

impl NodeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NodeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NodeKeyVisitor;

        impl<'de> Visitor<'de> for NodeKeyVisitor {
            type Value = NodeKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a node id (string or integer)")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeKey, E> {
                Ok(NodeKey(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<NodeKey, E> {
                Ok(NodeKey(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeKey, E> {
                Ok(NodeKey(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeKey, E> {
                Ok(NodeKey(v.to_string()))
            }
        }

        deserializer.deserialize_any(NodeKeyVisitor)
    }
}

/// Ordered `node id -> value` entries, serialized as a JSON object
///
/// Unlike a map, repeated keys are kept so validation can reject them.
#[derive(Debug, Clone, PartialEq)]
pub struct Entries<T>(pub Vec<(String, T)>);

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Entries<T> {
    /// Append an entry, keeping any existing entry with the same key
    pub fn push(&mut self, key: &str, value: T) {
        self.0.push((key.to_string(), value));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for Entries<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Serialize> Serialize for Entries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Entries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = Entries<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by node id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<NodeKey, T>()? {
                    entries.push((key.0, value));
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// A member as supplied in the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberInput {
    /// `[node_i, node_j]` with the default unit axial rigidity
    Pair([NodeKey; 2]),
    /// `{"nodes": [node_i, node_j], "stiffness": k}` or `{"nodes": [...], "axial_rigidity": EA}`
    Detailed {
        nodes: [NodeKey; 2],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stiffness: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        axial_rigidity: Option<f64>,
    },
}

impl MemberInput {
    pub fn pair(node_i: &str, node_j: &str) -> Self {
        Self::Pair([node_i.into(), node_j.into()])
    }

    /// Node ids in declared order
    pub fn endpoints(&self) -> (&str, &str) {
        let [i, j] = match self {
            Self::Pair(nodes) => nodes,
            Self::Detailed { nodes, .. } => nodes,
        };
        (i.as_str(), j.as_str())
    }

    /// Explicit `(stiffness, axial_rigidity)` values, if any
    pub fn stiffness_overrides(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Self::Pair(_) => (None, None),
            Self::Detailed {
                stiffness,
                axial_rigidity,
                ..
            } => (*stiffness, *axial_rigidity),
        }
    }
}

/// Key used for a member in the response
pub fn member_key(node_i: &str, node_j: &str) -> String {
    format!("{node_i},{node_j}")
}

/// Analysis request as posted by the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrussInput {
    /// `node id -> [x, y]`
    pub nodes: Entries<[f64; 2]>,
    /// Members in declared order
    pub members: Vec<MemberInput>,
    /// `node id -> [fixed_x, fixed_y]`
    #[serde(default)]
    pub supports: Entries<[bool; 2]>,
    /// `node id -> [fx, fy]`
    #[serde(default)]
    pub loads: Entries<[f64; 2]>,
}

impl TrussInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_node(mut self, id: &str, x: f64, y: f64) -> Self {
        self.nodes.push(id, [x, y]);
        self
    }

    pub fn with_member(mut self, node_i: &str, node_j: &str) -> Self {
        self.members.push(MemberInput::pair(node_i, node_j));
        self
    }

    /// Add a member with an explicit stiffness coefficient k
    pub fn with_member_stiffness(mut self, node_i: &str, node_j: &str, stiffness: f64) -> Self {
        self.members.push(MemberInput::Detailed {
            nodes: [node_i.into(), node_j.into()],
            stiffness: Some(stiffness),
            axial_rigidity: None,
        });
        self
    }

    /// Add a member with an explicit axial rigidity EA
    pub fn with_member_rigidity(mut self, node_i: &str, node_j: &str, axial_rigidity: f64) -> Self {
        self.members.push(MemberInput::Detailed {
            nodes: [node_i.into(), node_j.into()],
            stiffness: None,
            axial_rigidity: Some(axial_rigidity),
        });
        self
    }

    pub fn with_support(mut self, id: &str, fixed_x: bool, fixed_y: bool) -> Self {
        self.supports.push(id, [fixed_x, fixed_y]);
        self
    }

    pub fn with_load(mut self, id: &str, fx: f64, fy: f64) -> Self {
        self.loads.push(id, [fx, fy]);
        self
    }
}

/// Successful analysis response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrussResponse {
    /// `"node_i,node_j" -> axial force`, in member order
    pub member_forces: Entries<f64>,
    /// `node id -> [dx, dy]`, in node order
    pub displacements: Entries<[f64; 2]>,
    /// `node id -> [rx, ry]`, in support order
    #[serde(default)]
    pub reactions: Entries<[f64; 2]>,
    #[serde(default)]
    pub summary: AnalysisSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Failed analysis response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub kind: ErrorKind,
    pub error: String,
}

impl From<&TrussError> for ErrorResponse {
    fn from(err: &TrussError) -> Self {
        Self {
            success: false,
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}
