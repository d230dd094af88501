// src/taxonomy/mod.rs
//! Taxonomy forests: loading, validation, and traversal.
//!
//! Two disjoint universes (technology, purpose) of curated terms. Each
//! universe is a forest stored as an arena: nodes live in a `Vec`, the
//! `id -> index` map gives O(1) lookup, and parent/child relations are
//! plain indices into the arena. The canonical data set is embedded at
//! compile time and built exactly once into a process-wide immutable
//! singleton; every query after that is a pure read.

pub mod matcher;
pub mod quality;

use std::collections::HashMap;

use anyhow::{anyhow, bail};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Canonical taxonomy data, compiled into the binary.
const EMBEDDED_TAXONOMY: &str = include_str!("../../config/taxonomy.toml");

/// Upper bound on parent-chain hops; the curated data stays at depth <= 4.
const MAX_DEPTH: usize = 8;

static GLOBAL: Lazy<TaxonomyGraph> = Lazy::new(|| {
    TaxonomyGraph::from_toml_str(EMBEDDED_TAXONOMY).expect("embedded taxonomy is valid")
});

/// Which of the two disjoint forests a node (or a query) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Universe {
    Technology,
    Purpose,
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
struct NodeCfg {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parent: Option<String>,
    level: u8,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    related_terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyRoot {
    #[serde(default)]
    technology: Vec<NodeCfg>,
    #[serde(default)]
    purpose: Vec<NodeCfg>,
}

/* ----------------------------
Built arena structures
---------------------------- */

/// One term in a taxonomy forest.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyNode {
    pub id: String,
    /// Canonical display label; matching is case-insensitive on this field.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub universe: Universe,
    /// Depth, 0 at forest roots.
    pub level: u8,
    /// Arena index of the parent node; `None` means root.
    #[serde(skip)]
    pub parent: Option<usize>,
    /// Arena indices of direct children, derived from `parent` back-refs.
    #[serde(skip)]
    pub children: Vec<usize>,
    /// Alternate surface forms, score-equivalent to an exact match.
    pub aliases: Vec<String>,
    /// Informational cross-references; never consulted by scoring.
    pub related_terms: Vec<String>,
}

/// A single universe: node arena plus id index.
#[derive(Debug)]
pub struct Forest {
    nodes: Vec<TaxonomyNode>,
    index: HashMap<String, usize>,
}

impl Forest {
    fn build(cfgs: Vec<NodeCfg>, universe: Universe) -> anyhow::Result<Self> {
        let mut index = HashMap::with_capacity(cfgs.len());
        for (i, cfg) in cfgs.iter().enumerate() {
            if index.insert(cfg.id.clone(), i).is_some() {
                bail!("duplicate taxonomy id `{}`", cfg.id);
            }
        }

        let mut nodes = Vec::with_capacity(cfgs.len());
        for cfg in &cfgs {
            let parent = match &cfg.parent {
                Some(pid) => Some(
                    *index
                        .get(pid)
                        .ok_or_else(|| anyhow!("node `{}`: unknown parent `{}`", cfg.id, pid))?,
                ),
                None => None,
            };
            nodes.push(TaxonomyNode {
                id: cfg.id.clone(),
                name: cfg.name.clone(),
                description: cfg.description.clone(),
                universe,
                level: cfg.level,
                parent,
                children: Vec::new(),
                aliases: cfg.aliases.clone(),
                related_terms: cfg.related_terms.clone(),
            });
        }

        // Derive child lists from parent back-references.
        for i in 0..nodes.len() {
            if let Some(p) = nodes[i].parent {
                nodes[p].children.push(i);
            }
        }

        let forest = Self { nodes, index };
        forest.validate()?;
        Ok(forest)
    }

    /// Structural checks: acyclic parent chains within the depth bound,
    /// declared level consistent with the parent chain.
    fn validate(&self) -> anyhow::Result<()> {
        for node in &self.nodes {
            let mut hops = 0usize;
            let mut cursor = node.parent;
            while let Some(p) = cursor {
                hops += 1;
                if hops > MAX_DEPTH {
                    bail!("node `{}`: parent chain exceeds {} hops", node.id, MAX_DEPTH);
                }
                cursor = self.nodes[p].parent;
            }
            if usize::from(node.level) != hops {
                bail!(
                    "node `{}`: declared level {} but parent chain has {} hops",
                    node.id,
                    node.level,
                    hops
                );
            }
        }
        Ok(())
    }

    /// Look up a node by id. `None` for unknown ids — caller text is untrusted.
    pub fn get(&self, id: &str) -> Option<&TaxonomyNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate all nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &TaxonomyNode> {
        self.nodes.iter()
    }

    pub(crate) fn node(&self, idx: usize) -> &TaxonomyNode {
        &self.nodes[idx]
    }
}

/// Both universes, loaded together and immutable afterwards.
#[derive(Debug)]
pub struct TaxonomyGraph {
    technology: Forest,
    purpose: Forest,
}

impl TaxonomyGraph {
    /// Build from a TOML string (inline fixtures in tests use this directly).
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let root: TaxonomyRoot = toml::from_str(toml_str)?;
        let technology = Forest::build(root.technology, Universe::Technology)?;
        let purpose = Forest::build(root.purpose, Universe::Purpose)?;
        tracing::debug!(
            target: "taxonomy",
            technology_nodes = technology.len(),
            purpose_nodes = purpose.len(),
            "taxonomy loaded"
        );
        Ok(Self { technology, purpose })
    }

    /// The process-wide singleton built from the embedded data set.
    /// First call builds it; later calls are plain reads.
    pub fn global() -> &'static TaxonomyGraph {
        &GLOBAL
    }

    pub fn forest(&self, universe: Universe) -> &Forest {
        match universe {
            Universe::Technology => &self.technology,
            Universe::Purpose => &self.purpose,
        }
    }

    /// Ordered path from the forest root down to `node_id`.
    /// Empty if the id is unknown. O(depth), depth <= 4 by data design.
    pub fn node_path(&self, node_id: &str, universe: Universe) -> Vec<&TaxonomyNode> {
        let forest = self.forest(universe);
        let mut path = Vec::new();
        let mut cursor = forest.index.get(node_id).copied();
        while let Some(i) = cursor {
            path.push(forest.node(i));
            cursor = forest.node(i).parent;
        }
        path.reverse();
        path
    }

    /// Direct children of `node_id`; empty if the id is unknown or a leaf.
    pub fn children(&self, node_id: &str, universe: Universe) -> Vec<&TaxonomyNode> {
        let forest = self.forest(universe);
        match forest.get(node_id) {
            Some(node) => node.children.iter().map(|&i| forest.node(i)).collect(),
            None => Vec::new(),
        }
    }
}
