//! The inspector's current subject.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain object the inspector shows. Independent of the layout tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectedEntity {
    File { path: String },
    /// A deployable field, by its config id.
    Field { id: String },
    GraphNode { graph_id: String, node_id: String },
}

impl fmt::Display for SelectedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path } => write!(f, "file:{path}"),
            Self::Field { id } => write!(f, "field:{id}"),
            Self::GraphNode { graph_id, node_id } => write!(f, "node:{graph_id}/{node_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_json_shape() {
        let entity = SelectedEntity::GraphNode {
            graph_id: "main".into(),
            node_id: "api".into(),
        };
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "graph_node");
        assert_eq!(json["node_id"], "api");
        assert_eq!(entity.to_string(), "node:main/api");
    }
}
