//! Truss model - validated, index-based form of an analysis request

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::elements::{Axis, Member, MemberStiffness, Node, Support, DOFS_PER_NODE};
use crate::error::{EntityKind, ValidationError};
use crate::loads::NodeLoad;
use crate::wire::{member_key, MemberInput, TrussInput};

/// Validation rules that can be relaxed by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Require at least one load, and reject loads that are zero in both directions
    pub require_loads: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            require_loads: true,
        }
    }
}

/// The validated truss model
///
/// Nodes keep their input order, which fixes DOF numbering: the node at
/// index `n` owns DOFs `2n` (X) and `2n + 1` (Y). Members, supports and
/// loads refer to nodes by that index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrussModel {
    pub nodes: Vec<Node>,
    pub members: Vec<Member>,
    pub supports: Vec<Support>,
    pub loads: Vec<NodeLoad>,
}

impl TrussModel {
    /// Build a model from a request, checking every input invariant
    pub fn build(input: &TrussInput, policy: &ValidationPolicy) -> Result<Self, ValidationError> {
        let (nodes, index) = build_nodes(input)?;
        let members = build_members(input, &nodes, &index)?;
        let supports = build_supports(input, &index)?;
        let loads = build_loads(input, &index, policy)?;

        Ok(Self {
            nodes,
            members,
            supports,
            loads,
        })
    }

    /// Total number of degrees of freedom
    pub fn dof_count(&self) -> usize {
        self.nodes.len() * DOFS_PER_NODE
    }

    /// Result key `"node_i,node_j"` of a member, in declared node order
    pub fn member_key(&self, member: &Member) -> String {
        member_key(&self.nodes[member.node_i].id, &self.nodes[member.node_j].id)
    }

    /// Node id and axis owning a global DOF
    pub fn describe_dof(&self, dof: usize) -> (&str, Axis) {
        let (node, axis) = Axis::from_dof(dof);
        (self.nodes[node].id.as_str(), axis)
    }
}

fn build_nodes(input: &TrussInput) -> Result<(Vec<Node>, HashMap<&str, usize>), ValidationError> {
    let mut nodes = Vec::with_capacity(input.nodes.len());
    let mut index = HashMap::with_capacity(input.nodes.len());

    for (id, &[x, y]) in input.nodes.iter() {
        // Member result keys are "i,j"
        if id.contains(',') {
            return Err(ValidationError::InvalidNodeId(id.to_string()));
        }
        if index.insert(id, nodes.len()).is_some() {
            return Err(ValidationError::DuplicateNode(id.to_string()));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(ValidationError::NonFiniteCoordinate(id.to_string()));
        }
        nodes.push(Node::new(id, x, y));
    }

    if nodes.len() < 2 {
        return Err(ValidationError::TooFewNodes(nodes.len()));
    }

    Ok((nodes, index))
}

fn resolve(
    index: &HashMap<&str, usize>,
    entity: EntityKind,
    id: &str,
) -> Result<usize, ValidationError> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| ValidationError::UnknownNode {
            entity,
            node: id.to_string(),
        })
}

fn member_stiffness(member: &MemberInput) -> Result<MemberStiffness, ValidationError> {
    let (node_i, node_j) = member.endpoints();
    let invalid = |property: &'static str, value: f64| ValidationError::InvalidStiffness {
        node_i: node_i.to_string(),
        node_j: node_j.to_string(),
        property,
        value,
    };

    match member.stiffness_overrides() {
        (Some(_), Some(_)) => Err(ValidationError::ConflictingStiffness {
            node_i: node_i.to_string(),
            node_j: node_j.to_string(),
        }),
        (Some(k), None) if !(k.is_finite() && k > 0.0) => Err(invalid("stiffness", k)),
        (Some(k), None) => Ok(MemberStiffness::Coefficient(k)),
        (None, Some(ea)) if !(ea.is_finite() && ea > 0.0) => Err(invalid("axial rigidity", ea)),
        (None, Some(ea)) => Ok(MemberStiffness::AxialRigidity(ea)),
        (None, None) => Ok(MemberStiffness::Unit),
    }
}

fn build_members(
    input: &TrussInput,
    nodes: &[Node],
    index: &HashMap<&str, usize>,
) -> Result<Vec<Member>, ValidationError> {
    if input.members.is_empty() {
        return Err(ValidationError::NoMembers);
    }

    let mut members = Vec::with_capacity(input.members.len());
    let mut connected: HashSet<(usize, usize)> = HashSet::with_capacity(input.members.len());

    for member in &input.members {
        let (id_i, id_j) = member.endpoints();
        let i = resolve(index, EntityKind::Member, id_i)?;
        let j = resolve(index, EntityKind::Member, id_j)?;

        if i == j {
            return Err(ValidationError::SelfReferentialMember {
                node: id_i.to_string(),
            });
        }
        if !connected.insert((i.min(j), i.max(j))) {
            return Err(ValidationError::DuplicateMember {
                node_i: id_i.to_string(),
                node_j: id_j.to_string(),
            });
        }

        let stiffness = member_stiffness(member)?;
        let built = Member::new(i, &nodes[i], j, &nodes[j], stiffness).ok_or_else(|| {
            ValidationError::ZeroLengthMember {
                node_i: id_i.to_string(),
                node_j: id_j.to_string(),
            }
        })?;
        members.push(built);
    }

    Ok(members)
}

fn build_supports(
    input: &TrussInput,
    index: &HashMap<&str, usize>,
) -> Result<Vec<Support>, ValidationError> {
    if input.supports.is_empty() {
        return Err(ValidationError::NoSupports);
    }

    let mut supports: Vec<Support> = Vec::with_capacity(input.supports.len());
    for (id, &[fixed_x, fixed_y]) in input.supports.iter() {
        let node = resolve(index, EntityKind::Support, id)?;
        if supports.iter().any(|s| s.node == node) {
            return Err(ValidationError::DuplicateSupport(id.to_string()));
        }
        let support = Support::with_restraints(node, fixed_x, fixed_y);
        if !support.is_supported() {
            return Err(ValidationError::EmptySupport(id.to_string()));
        }
        supports.push(support);
    }

    Ok(supports)
}

fn build_loads(
    input: &TrussInput,
    index: &HashMap<&str, usize>,
    policy: &ValidationPolicy,
) -> Result<Vec<NodeLoad>, ValidationError> {
    if policy.require_loads && input.loads.is_empty() {
        return Err(ValidationError::NoLoads);
    }

    let mut loads: Vec<NodeLoad> = Vec::with_capacity(input.loads.len());
    for (id, &[fx, fy]) in input.loads.iter() {
        let node = resolve(index, EntityKind::Load, id)?;
        if loads.iter().any(|l| l.node == node) {
            return Err(ValidationError::DuplicateLoad(id.to_string()));
        }
        let load = NodeLoad::new(node, fx, fy);
        if !load.is_finite() {
            return Err(ValidationError::NonFiniteLoad(id.to_string()));
        }
        if policy.require_loads && load.is_zero() {
            return Err(ValidationError::ZeroLoad(id.to_string()));
        }
        loads.push(load);
    }

    Ok(loads)
}
