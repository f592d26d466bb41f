//! Entity graph view
//!
//! Read-only accessor over one network's entities and parent -> child edges.
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: Entity IDs are unique within a graph.
//! - **INVARIANT-2**: Every edge endpoint is an entity of the graph.
//! - **INVARIANT-3**: The graph is acyclic (checked with Kahn's algorithm at
//!   construction), so every ancestor walk terminates.
//!
//! Ancestor lookups are breadth-first: the closest ancestor wins, and ties at
//! equal depth go to the smallest `(type, key)`.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use shared_types::{EntityGraphWire, EntityId, NetworkEntity};

use crate::error::GraphError;

/// Validated entity graph of a single network
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    entities: BTreeMap<EntityId, NetworkEntity>,
    /// child -> parents
    parents: BTreeMap<EntityId, BTreeSet<EntityId>>,
    /// parent -> children
    children: BTreeMap<EntityId, BTreeSet<EntityId>>,
}

impl EntityGraph {
    /// Build a graph from decoded entities and `(parent, child)` edges.
    pub fn new(
        entities: impl IntoIterator<Item = NetworkEntity>,
        edges: impl IntoIterator<Item = (EntityId, EntityId)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::default();

        for entity in entities {
            let id = entity.id.clone();
            if graph.entities.insert(id.clone(), entity).is_some() {
                return Err(GraphError::DuplicateEntity(id));
            }
        }

        for (from, to) in edges {
            if !graph.entities.contains_key(&from) || !graph.entities.contains_key(&to) {
                return Err(GraphError::DanglingEdge { from, to });
            }
            graph
                .parents
                .entry(to.clone())
                .or_default()
                .insert(from.clone());
            graph.children.entry(from).or_default().insert(to);
        }

        graph.ensure_acyclic()?;
        Ok(graph)
    }

    /// Decode a wire graph, running every entity config through its codec.
    pub fn from_wire(wire: &EntityGraphWire) -> Result<Self, GraphError> {
        let entities = wire
            .entities
            .iter()
            .map(|e| {
                NetworkEntity::from_wire(e).map_err(|source| GraphError::Codec {
                    entity: EntityId::new(e.entity_type.clone(), e.key.clone()),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let edges = wire.edges.iter().map(|e| (e.from.clone(), e.to.clone()));
        Self::new(entities, edges)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Exact lookup by type and key.
    pub fn get_entity(&self, entity_type: &str, key: &str) -> Result<&NetworkEntity, GraphError> {
        let id = EntityId::new(entity_type, key);
        match self.entities.get(&id) {
            Some(entity) => Ok(entity),
            None => Err(GraphError::EntityNotFound(id)),
        }
    }

    /// Direct parents of `id`, in `(type, key)` order.
    pub fn parents_of<'a>(&'a self, id: &EntityId) -> impl Iterator<Item = &'a EntityId> + 'a {
        self.parents.get(id).into_iter().flatten()
    }

    /// Direct children of `id`, in `(type, key)` order.
    pub fn children_of<'a>(&'a self, id: &EntityId) -> impl Iterator<Item = &'a EntityId> + 'a {
        self.children.get(id).into_iter().flatten()
    }

    /// Closest strict ancestor of `entity` whose type is `ancestor_type`.
    ///
    /// `AncestorNotFound` when no such ancestor is reachable; `UnknownStart`
    /// or `DanglingEdge` when the walk itself cannot complete.
    pub fn get_first_ancestor_of_type(
        &self,
        entity: &NetworkEntity,
        ancestor_type: &str,
    ) -> Result<&NetworkEntity, GraphError> {
        let start = &entity.id;
        if !self.entities.contains_key(start) {
            return Err(GraphError::UnknownStart(start.clone()));
        }

        let mut visited: BTreeSet<&EntityId> = BTreeSet::new();
        visited.insert(start);
        // Walk one depth at a time; a level is ordered by `(type, key)`.
        let mut level: BTreeMap<&EntityId, &EntityId> =
            self.parents_of(start).map(|p| (p, start)).collect();

        while !level.is_empty() {
            let mut next: BTreeMap<&EntityId, &EntityId> = BTreeMap::new();
            for (&id, &child) in &level {
                if !visited.insert(id) {
                    continue;
                }
                let candidate = self
                    .entities
                    .get(id)
                    .ok_or_else(|| GraphError::DanglingEdge {
                        from: id.clone(),
                        to: child.clone(),
                    })?;
                if candidate.id.entity_type == ancestor_type {
                    return Ok(candidate);
                }
                for parent in self.parents_of(id) {
                    next.entry(parent).or_insert(id);
                }
            }
            level = next;
        }

        Err(GraphError::AncestorNotFound {
            start: start.clone(),
            ancestor_type: ancestor_type.to_string(),
        })
    }

    /// Kahn's topological sort over parent -> child edges; any entity left
    /// with a positive in-degree sits on a cycle.
    fn ensure_acyclic(&self) -> Result<(), GraphError> {
        let mut in_degree: BTreeMap<&EntityId, usize> = self
            .entities
            .keys()
            .map(|id| (id, self.parents.get(id).map_or(0, BTreeSet::len)))
            .collect();

        let mut queue: VecDeque<&EntityId> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut resolved = 0usize;

        while let Some(id) = queue.pop_front() {
            resolved += 1;
            for child in self.children_of(id) {
                let Some(degree) = in_degree.get_mut(child) else {
                    continue;
                };
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    queue.push_back(child);
                }
            }
        }

        if resolved < self.entities.len() {
            return Err(GraphError::CycleDetected {
                unresolved: self.entities.len() - resolved,
            });
        }
        Ok(())
    }
}
