//! Communication network
//!
//! Owns the weighted undirected topology graph, the person registry, and all
//! mailbox nodes. Implements topology mutation with connectivity validation,
//! deterministic cheapest-path routing (Dijkstra), and the send / broadcast /
//! forward delivery orchestration.
//!
//! Graph invariant, enforced on node removal: every node must stay reachable
//! from every other node. `unlink` is deliberately exempt so links can be
//! torn down incrementally.

use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use std::rc::Rc;

use tracing::{debug, info, warn};

use morsenet_core::{
    DeliveryError, Message, NodeId, PersonId, RegistryError, Result, TopologyError,
};

use crate::node::Node;
use crate::registry::Registry;

/// Shared handle persons hold onto the network after joining.
///
/// The simulation is single-threaded and synchronous, so interior mutability
/// through `RefCell` is sufficient; there is no lock to take.
pub type SharedNetwork = Rc<RefCell<CommunicationNetwork>>;

// ----------------------------------------------------------------------------
// Forward Observability
// ----------------------------------------------------------------------------

/// Seam for monitoring collaborators that want to watch hop-by-hop
/// forwarding.
///
/// Invoked exactly once per hop on a computed path, in path order, for both
/// unicast sends and each per-destination broadcast path. Implementations
/// must not mutate the network.
pub trait ForwardObserver {
    fn on_forward(&self, message: &Message, node_id: NodeId);
}

// ----------------------------------------------------------------------------
// Communication Network
// ----------------------------------------------------------------------------

pub struct CommunicationNetwork {
    /// node -> insertion-ordered neighbor list with strictly positive costs
    adjacency: BTreeMap<NodeId, Vec<(NodeId, u32)>>,
    /// node -> mailbox state
    nodes: BTreeMap<NodeId, Node>,
    registry: Registry,
    observer: Option<Box<dyn ForwardObserver>>,
}

impl Default for CommunicationNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunicationNetwork {
    pub fn new() -> Self {
        Self {
            adjacency: BTreeMap::new(),
            nodes: BTreeMap::new(),
            registry: Registry::new(),
            observer: None,
        }
    }

    /// Wrap a fresh network in the shared handle persons join through.
    pub fn shared() -> SharedNetwork {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Install the hop observer. Replaces any previous one.
    pub fn set_forward_observer(&mut self, observer: Box<dyn ForwardObserver>) {
        self.observer = Some(observer);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    // ------------------------------------------------------------------------
    // Topology Mutation
    // ------------------------------------------------------------------------

    /// Add a node to the network.
    pub fn add_node(&mut self, node_id: NodeId) -> core::result::Result<(), TopologyError> {
        if self.adjacency.contains_key(&node_id) {
            return Err(TopologyError::DuplicateNode(node_id));
        }
        info!(node = %node_id, "adding node");
        self.adjacency.insert(node_id, Vec::new());
        self.nodes.insert(node_id, Node::new(node_id));
        Ok(())
    }

    /// Remove a node, detaching its links and discarding its mailbox state
    /// (unread messages at the node are lost).
    ///
    /// If the remaining graph is disconnected this fails with
    /// [`TopologyError::NetworkBecameInvalid`], but the removal is NOT rolled
    /// back: callers must treat a failed removal as having already mutated
    /// the network.
    pub fn remove_node(&mut self, node_id: NodeId) -> core::result::Result<(), TopologyError> {
        if !self.adjacency.contains_key(&node_id) {
            return Err(TopologyError::UnknownNode(node_id));
        }
        info!(node = %node_id, "removing node");
        for neighbors in self.adjacency.values_mut() {
            neighbors.retain(|(neighbor, _)| *neighbor != node_id);
        }
        self.adjacency.remove(&node_id);
        self.nodes.remove(&node_id);
        if !self.is_valid() {
            warn!(node = %node_id, "removal disconnected the network");
            return Err(TopologyError::NetworkBecameInvalid);
        }
        Ok(())
    }

    /// Connect two nodes with an undirected link of the given cost.
    pub fn link(
        &mut self,
        a: NodeId,
        b: NodeId,
        cost: u32,
    ) -> core::result::Result<(), TopologyError> {
        if a == b {
            return Err(TopologyError::SelfLoop(a));
        }
        for node_id in [a, b] {
            if !self.adjacency.contains_key(&node_id) {
                return Err(TopologyError::UnknownNode(node_id));
            }
        }
        if self.linked(a, b) {
            return Err(TopologyError::DuplicateLink(a, b));
        }
        if cost == 0 {
            return Err(TopologyError::InvalidCost(cost));
        }
        debug!(a = %a, b = %b, cost, "linking nodes");
        self.adjacency.entry(a).or_default().push((b, cost));
        self.adjacency.entry(b).or_default().push((a, cost));
        Ok(())
    }

    /// Disconnect two nodes. No-op if either is absent or they are not
    /// linked. Connectivity is not re-validated here; only node removal
    /// enforces the invariant.
    pub fn unlink(&mut self, a: NodeId, b: NodeId) {
        if !self.adjacency.contains_key(&a) || !self.adjacency.contains_key(&b) {
            return;
        }
        debug!(a = %a, b = %b, "unlinking nodes");
        if let Some(neighbors) = self.adjacency.get_mut(&a) {
            neighbors.retain(|(neighbor, _)| *neighbor != b);
        }
        if let Some(neighbors) = self.adjacency.get_mut(&b) {
            neighbors.retain(|(neighbor, _)| *neighbor != a);
        }
    }

    fn linked(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|neighbors| neighbors.iter().any(|(neighbor, _)| *neighbor == b))
    }

    /// Whether every node is reachable from every other node.
    ///
    /// An empty network is valid by convention. Iterative traversal with an
    /// explicit work list; depth never ties up the call stack.
    pub fn is_valid(&self) -> bool {
        let Some(&start) = self.adjacency.keys().next() else {
            return true;
        };
        let mut visited: BTreeSet<NodeId> = BTreeSet::new();
        let mut work_list = vec![start];
        while let Some(node_id) = work_list.pop() {
            if !visited.insert(node_id) {
                continue;
            }
            for &(neighbor, _) in &self.adjacency[&node_id] {
                if !visited.contains(&neighbor) {
                    work_list.push(neighbor);
                }
            }
        }
        visited.len() == self.adjacency.len()
    }

    // ------------------------------------------------------------------------
    // Routing
    // ------------------------------------------------------------------------

    /// Cheapest path between two nodes by total edge cost (Dijkstra).
    ///
    /// Returns the hop sequence after the source, destination inclusive;
    /// empty when source and destination coincide. Equal-cost ties resolve
    /// to whichever neighbor was relaxed first, which is deterministic for a
    /// fixed link insertion order.
    pub fn cheapest_path(
        &self,
        source: NodeId,
        dest: NodeId,
    ) -> core::result::Result<Vec<NodeId>, TopologyError> {
        for node_id in [source, dest] {
            if !self.adjacency.contains_key(&node_id) {
                return Err(TopologyError::UnknownNode(node_id));
            }
        }
        if source == dest {
            return Ok(Vec::new());
        }

        let mut costs: BTreeMap<NodeId, u64> =
            self.adjacency.keys().map(|&n| (n, u64::MAX)).collect();
        let mut predecessor: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        let mut frontier = BinaryHeap::new();
        costs.insert(source, 0);
        frontier.push(Reverse((0u64, source)));

        while let Some(Reverse((cost, node_id))) = frontier.pop() {
            if cost > costs[&node_id] {
                continue; // stale frontier entry
            }
            if node_id == dest {
                break;
            }
            for &(neighbor, edge_cost) in &self.adjacency[&node_id] {
                let candidate = cost + u64::from(edge_cost);
                if candidate < costs[&neighbor] {
                    costs.insert(neighbor, candidate);
                    predecessor.insert(neighbor, node_id);
                    frontier.push(Reverse((candidate, neighbor)));
                }
            }
        }

        let mut path = Vec::new();
        let mut current = dest;
        while current != source {
            path.push(current);
            current = *predecessor
                .get(&current)
                .ok_or(TopologyError::NoRoute(source, dest))?;
        }
        path.reverse();
        Ok(path)
    }

    // ------------------------------------------------------------------------
    // Delivery
    // ------------------------------------------------------------------------

    /// Send a direct message along the cheapest path to the receiver's
    /// gateway.
    ///
    /// Registration checks happen before any side effect, so a failed send
    /// is safe to retry after fixing registration.
    pub fn send(&mut self, message: Message) -> Result<()> {
        let sender_gateway = self
            .registry
            .node_id(&message.sender)
            .ok_or_else(|| DeliveryError::SenderNotConnected(message.sender.clone()))?;
        let receiver = message
            .receiver
            .clone()
            .ok_or_else(|| DeliveryError::MissingReceiver(message.sender.clone()))?;
        let receiver_gateway = self
            .registry
            .node_id(&receiver)
            .ok_or(DeliveryError::ReceiverNotConnected(receiver))?;

        let path = self.cheapest_path(sender_gateway, receiver_gateway)?;
        info!(
            sender = %message.sender,
            from = %sender_gateway,
            to = %receiver_gateway,
            hops = path.len(),
            "sending message"
        );
        for hop in &path {
            self.forward(&message, *hop);
        }
        self.deliver(receiver_gateway, message)
    }

    /// Deliver a broadcast to every registered person except the sender.
    ///
    /// Routes from the sender's gateway to every node in the network; the
    /// destination node excludes the sender locally. All per-destination
    /// paths are computed before the first delivery, so an unreachable node
    /// fails the whole broadcast without delivering anywhere.
    pub fn broadcast(&mut self, message: Message) -> Result<()> {
        if message.receiver.is_some() {
            return Err(DeliveryError::BroadcastHasReceiver(message.sender).into());
        }
        let sender_gateway = self
            .registry
            .node_id(&message.sender)
            .ok_or_else(|| DeliveryError::SenderNotConnected(message.sender.clone()))?;

        let mut routes: Vec<(NodeId, Vec<NodeId>)> = Vec::with_capacity(self.adjacency.len());
        for dest in self.adjacency.keys().copied().collect::<Vec<_>>() {
            routes.push((dest, self.cheapest_path(sender_gateway, dest)?));
        }

        info!(sender = %message.sender, from = %sender_gateway, "broadcasting message");
        for (dest, path) in routes {
            for hop in &path {
                self.forward(&message, *hop);
            }
            self.deliver(dest, message.clone())?;
        }
        Ok(())
    }

    /// The message traverses an intermediate node on its computed path.
    ///
    /// Mutates nothing; logs the hop and notifies the installed observer.
    pub fn forward(&self, message: &Message, node_id: NodeId) {
        debug!(sender = %message.sender, node = %node_id, "forwarding message");
        if let Some(observer) = &self.observer {
            observer.on_forward(message, node_id);
        }
    }

    fn deliver(&mut self, gateway: NodeId, message: Message) -> Result<()> {
        let residents = self.registry.persons_at(gateway).to_vec();
        let node = self
            .nodes
            .get_mut(&gateway)
            .ok_or(TopologyError::UnknownNode(gateway))?;
        node.receive(message, &residents);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Person Registration
    // ------------------------------------------------------------------------

    /// Register a person at a gateway node with their serialized key.
    pub fn join_network(
        &mut self,
        person_id: PersonId,
        node_id: NodeId,
        serialized_key: String,
    ) -> Result<()> {
        if !self.adjacency.contains_key(&node_id) {
            return Err(TopologyError::UnknownNode(node_id).into());
        }
        self.registry.insert(person_id, node_id, serialized_key)?;
        Ok(())
    }

    /// Deregister a person, discarding their unread messages at the gateway.
    pub fn leave_network(&mut self, person_id: &PersonId) -> Result<()> {
        let gateway = self
            .registry
            .node_id(person_id)
            .ok_or_else(|| RegistryError::PersonNotFound(person_id.clone()))?;
        info!(person = %person_id, node = %gateway, "person leaving network");
        if let Some(node) = self.nodes.get_mut(&gateway) {
            node.discard(person_id);
        }
        self.registry.delete(person_id);
        Ok(())
    }

    /// Drain a person's mailbox at their gateway, priority-ordered.
    pub fn get_all_messages(&mut self, person_id: &PersonId) -> Result<Vec<Message>> {
        let gateway = self
            .registry
            .node_id(person_id)
            .ok_or_else(|| RegistryError::PersonNotFound(person_id.clone()))?;
        let node = self
            .nodes
            .get_mut(&gateway)
            .ok_or(TopologyError::UnknownNode(gateway))?;
        Ok(node.drain(person_id))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> CommunicationNetwork {
        let mut network = CommunicationNetwork::new();
        for id in [1, 2, 3] {
            network.add_node(NodeId::new(id)).unwrap();
        }
        network.link(NodeId::new(1), NodeId::new(2), 1).unwrap();
        network.link(NodeId::new(2), NodeId::new(3), 2).unwrap();
        network.link(NodeId::new(1), NodeId::new(3), 10).unwrap();
        network
    }

    #[test]
    fn test_add_duplicate_node_fails() {
        let mut network = CommunicationNetwork::new();
        network.add_node(NodeId::new(1)).unwrap();
        assert_eq!(
            network.add_node(NodeId::new(1)),
            Err(TopologyError::DuplicateNode(NodeId::new(1)))
        );
    }

    #[test]
    fn test_link_validation() {
        let mut network = CommunicationNetwork::new();
        let (a, b) = (NodeId::new(1), NodeId::new(2));
        network.add_node(a).unwrap();
        network.add_node(b).unwrap();

        assert_eq!(network.link(a, a, 1), Err(TopologyError::SelfLoop(a)));
        assert_eq!(
            network.link(a, NodeId::new(9), 1),
            Err(TopologyError::UnknownNode(NodeId::new(9)))
        );
        assert_eq!(network.link(a, b, 0), Err(TopologyError::InvalidCost(0)));
        network.link(a, b, 3).unwrap();
        assert_eq!(network.link(a, b, 5), Err(TopologyError::DuplicateLink(a, b)));
    }

    #[test]
    fn test_empty_network_is_valid() {
        assert!(CommunicationNetwork::new().is_valid());
    }

    #[test]
    fn test_unlink_may_disconnect_without_error() {
        let mut network = CommunicationNetwork::new();
        let (a, b) = (NodeId::new(1), NodeId::new(2));
        network.add_node(a).unwrap();
        network.add_node(b).unwrap();
        network.link(a, b, 1).unwrap();

        network.unlink(a, b);
        assert!(!network.is_valid());

        // Absent nodes and unlinked pairs are no-ops.
        network.unlink(a, b);
        network.unlink(a, NodeId::new(9));
    }

    #[test]
    fn test_remove_cut_vertex_fails_without_rollback() {
        // 1 --- 2 --- 3: node 2 is a cut vertex.
        let mut network = CommunicationNetwork::new();
        for id in [1, 2, 3] {
            network.add_node(NodeId::new(id)).unwrap();
        }
        network.link(NodeId::new(1), NodeId::new(2), 2).unwrap();
        network.link(NodeId::new(2), NodeId::new(3), 3).unwrap();
        assert!(network.is_valid());

        assert_eq!(
            network.remove_node(NodeId::new(2)),
            Err(TopologyError::NetworkBecameInvalid)
        );
        // Best-effort semantics: the node and its edges are already gone.
        assert!(network.node(NodeId::new(2)).is_none());
        assert!(!network.is_valid());
    }

    #[test]
    fn test_remove_leaf_node_keeps_network_valid() {
        let mut network = triangle();
        network.add_node(NodeId::new(4)).unwrap();
        network.link(NodeId::new(3), NodeId::new(4), 1).unwrap();

        network.remove_node(NodeId::new(4)).unwrap();
        assert!(network.is_valid());
        assert_eq!(
            network.remove_node(NodeId::new(4)),
            Err(TopologyError::UnknownNode(NodeId::new(4)))
        );
    }

    #[test]
    fn test_cheapest_path_prefers_low_total_cost() {
        let network = triangle();
        // 1 -> 3 direct costs 10; via 2 costs 3.
        assert_eq!(
            network.cheapest_path(NodeId::new(1), NodeId::new(3)).unwrap(),
            vec![NodeId::new(2), NodeId::new(3)]
        );
    }

    #[test]
    fn test_cheapest_path_to_self_is_empty() {
        let network = triangle();
        assert!(network
            .cheapest_path(NodeId::new(1), NodeId::new(1))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_cheapest_path_reports_missing_route() {
        let mut network = triangle();
        network.add_node(NodeId::new(9)).unwrap();
        assert_eq!(
            network.cheapest_path(NodeId::new(1), NodeId::new(9)),
            Err(TopologyError::NoRoute(NodeId::new(1), NodeId::new(9)))
        );
    }

    #[test]
    fn test_join_requires_existing_gateway() {
        let mut network = CommunicationNetwork::new();
        let result = network.join_network(PersonId::from("alice"), NodeId::new(1), String::new());
        assert!(matches!(
            result,
            Err(crate::MorsenetError::Topology(TopologyError::UnknownNode(_)))
        ));
    }
}
