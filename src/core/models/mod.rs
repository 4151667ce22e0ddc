//! Data models for `cwetree`

pub mod record;
pub mod tree;
pub mod view;

pub use record::CweRecord;
pub use tree::{NodeId, Point, Tree, TreeNode};
pub use view::ViewId;
