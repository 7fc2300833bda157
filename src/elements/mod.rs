//! Structural elements module

mod member;
mod node;
mod support;

pub use member::{Member, MemberStiffness};
pub use node::{Axis, Node, DOFS_PER_NODE};
pub use support::Support;
