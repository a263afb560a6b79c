use crate::nn::{Graph, OP_GRAPH_MAX_NODES, OpGraph};

#[test]
fn test_snapshot_small_graph() {
    let mut graph = Graph::new();
    let a = graph.new_parameter(0.1234567).unwrap();
    let b = graph.new_parameter(2.0).unwrap();
    let y = graph.mul(a, b).unwrap();
    graph.backward(y).unwrap();

    let snapshot = graph.snapshot(y, OP_GRAPH_MAX_NODES).unwrap();
    assert_eq!(snapshot.node_ids().collect::<Vec<_>>(), vec![a.0, b.0, y.0]);
    assert_eq!(snapshot.nodes[0].value, 0.123457);
    assert_eq!(snapshot.nodes[0].grad, 2.0);
    assert_eq!(snapshot.nodes[1].grad, 0.123457);
    assert_eq!(snapshot.edges.len(), 2);
    assert!(snapshot.edges.iter().all(|e| e.target == y.0));
}

#[test]
fn test_snapshot_trims_to_last_nodes() {
    let mut graph = Graph::new();
    let x = graph.new_parameter(1.0).unwrap();
    let mut y = x;
    for _ in 0..200 {
        y = graph.add_scalar(y, 1.0).unwrap();
    }

    let snapshot = graph.snapshot(y, OP_GRAPH_MAX_NODES).unwrap();
    assert_eq!(snapshot.nodes.len(), OP_GRAPH_MAX_NODES);
    assert_eq!(snapshot.nodes.last().map(|n| n.id), Some(y.0));

    // 边的两端都必须在保留的节点中
    let kept: Vec<u64> = snapshot.node_ids().collect();
    assert!(!snapshot.edges.is_empty());
    for edge in &snapshot.edges {
        assert!(kept.contains(&edge.source));
        assert!(kept.contains(&edge.target));
    }
    // 最靠前的参数 x 被裁掉
    assert!(!kept.contains(&x.0));
}

#[test]
fn test_snapshot_json_uses_source_target_keys() {
    let mut graph = Graph::new();
    let a = graph.new_parameter(1.0).unwrap();
    let y = graph.exp(a).unwrap();
    let snapshot = graph.snapshot(y, 10).unwrap();

    let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(json["edges"][0]["source"], a.0);
    assert_eq!(json["edges"][0]["target"], y.0);
    assert!(json["nodes"][0].get("grad").is_some());

    let parsed = OpGraph::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(parsed, snapshot);
}
