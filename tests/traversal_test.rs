use pullgraph::graph::{EdgeData, Graph, GraphError, PropertyValue, VertexData, VertexId};
use pullgraph::query::{parse_traversal, pipetype, Query, QueryError, Registry, Signal, Value};
use pullgraph::{args, props};

fn scenario_graph() -> Graph {
    Graph::from_parts(
        vec![
            VertexData::with_id(1).property("name", "a"),
            VertexData::with_id(2).property("name", "b"),
            VertexData::with_id(3).property("name", "c"),
        ],
        vec![EdgeData::new(2, "knows", 1), EdgeData::new(3, "knows", 1)],
    )
}

/// A -> B -> D and A -> C -> D
fn diamond() -> Graph {
    Graph::from_parts(
        ["A", "B", "C", "D"].map(VertexData::with_id),
        vec![
            EdgeData::new("A", "to", "B"),
            EdgeData::new("A", "to", "C"),
            EdgeData::new("B", "to", "D"),
            EdgeData::new("C", "to", "D"),
        ],
    )
}

fn ids(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_vertex)
        .map(|v| v.id.to_string())
        .collect()
}

fn strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_property)
        .filter_map(PropertyValue::as_string)
        .map(String::from)
        .collect()
}

#[test]
fn test_generated_ids_and_duplicates() {
    let mut graph = Graph::new();
    let first = graph.add_vertex(VertexData::new()).unwrap();
    graph.add_vertex(VertexData::with_id(2)).unwrap();
    let second = graph.add_vertex(VertexData::new()).unwrap();
    assert_ne!(first, second);
    assert_ne!(second, VertexId::from(2));

    let before = graph.vertex_count();
    assert_eq!(
        graph.add_vertex(VertexData::with_id(2)),
        Err(GraphError::DuplicateId(VertexId::from(2)))
    );
    assert_eq!(graph.vertex_count(), before);
}

#[test]
fn test_missing_endpoint_leaves_adjacency_untouched() {
    let mut graph = scenario_graph();
    let edges = graph.edge_count();
    assert_eq!(
        graph.add_edge(EdgeData::new(1, "knows", 42)),
        Err(GraphError::MissingEndpoint(VertexId::from(42)))
    );
    assert_eq!(graph.edge_count(), edges);
    let one = graph.vertex_index(&VertexId::from(1)).unwrap();
    assert!(graph.find_out_edges(one).is_empty());
}

#[test]
fn test_scenario_out() {
    let graph = scenario_graph();
    let registry = Registry::builtin();
    let result = graph.v(&registry, 2).out("knows").run();
    assert_eq!(ids(&result), vec!["1"]);
    let vertex = result[0].as_vertex().unwrap();
    assert_eq!(vertex.get_property("name"), Some(&PropertyValue::from("a")));
}

#[test]
fn test_scenario_in_property_pops_last_edge_first() {
    let graph = scenario_graph();
    let registry = Registry::builtin();
    let result = graph.v(&registry, 1).in_("knows").property("name").run();
    // edge buffer is popped from the end: the 3 -> 1 edge was added last
    assert_eq!(strings(&result), vec!["c", "b"]);
}

#[test]
fn test_out_and_in_are_inverse_on_every_edge() {
    let graph = diamond();
    let registry = Registry::builtin();
    for edge in graph.edges() {
        let source = graph.vertex(edge.source).id.clone();
        let target = graph.vertex(edge.target).id.clone();

        let forward = ids(&graph.v(&registry, source.clone()).out(edge.label.as_str()).run());
        assert!(forward.contains(&target.to_string()));

        let backward = ids(&graph.v(&registry, target).in_(edge.label.as_str()).run());
        assert!(backward.contains(&source.to_string()));
    }
}

#[test]
fn test_take_bounds() {
    let graph = diamond();
    let registry = Registry::builtin();
    for n in 0..6 {
        let all = graph.v(&registry, ()).run().len();
        let taken = graph.v(&registry, ()).take(n).run().len();
        assert_eq!(taken, n.min(all));
    }
    let two_hops = graph.v(&registry, "A").out(()).out(()).take(10).run();
    assert_eq!(two_hops.len(), 2);
}

#[test]
fn test_unique_on_diamond() {
    let graph = diamond();
    let registry = Registry::builtin();
    let plain = graph.v(&registry, "A").out("to").out("to").run();
    assert_eq!(ids(&plain), vec!["D", "D"]);

    let unique = graph.v(&registry, "A").out("to").out("to").unique().run();
    assert_eq!(ids(&unique), vec!["D"]);
}

#[test]
fn test_as_back_returns_to_bookmark() {
    let graph = diamond();
    let registry = Registry::builtin();
    let result = graph
        .v(&registry, "A")
        .as_("start")
        .out("to")
        .out("to")
        .back("start")
        .run();
    assert_eq!(ids(&result), vec!["A", "A"]);

    let middle = graph
        .v(&registry, "A")
        .out("to")
        .as_("mid")
        .out("to")
        .back("mid")
        .property("_id")
        .run();
    assert_eq!(strings(&middle), vec!["C", "B"]);
}

#[test]
fn test_except_excludes_origin() {
    // siblings: go to the parent and back down, skipping yourself
    let graph = Graph::from_parts(
        ["p", "x", "y", "z"].map(VertexData::with_id),
        vec![
            EdgeData::new("x", "parent", "p"),
            EdgeData::new("y", "parent", "p"),
            EdgeData::new("z", "parent", "p"),
        ],
    );
    let registry = Registry::builtin();
    let siblings = graph
        .v(&registry, "y")
        .as_("me")
        .out("parent")
        .in_("parent")
        .except("me")
        .run();
    assert_eq!(ids(&siblings), vec!["z", "x"]);
}

#[test]
fn test_merge_collects_bookmarks() {
    let graph = diamond();
    let registry = Registry::builtin();
    let result = graph
        .v(&registry, "A")
        .as_("a")
        .out("to")
        .take(1)
        .as_("b")
        .merge(args!["a", "b"])
        .run();
    assert_eq!(ids(&result), vec!["C", "A"]);
}

#[test]
fn test_vertex_filter_object_and_ids() {
    let graph = scenario_graph();
    let registry = Registry::builtin();
    assert_eq!(ids(&graph.v(&registry, props! { "name" => "b" }).run()), vec!["2"]);
    assert_eq!(ids(&graph.v(&registry, args![3, 99, 1]).run()), vec!["1", "3"]);
    assert!(graph.v(&registry, 99).run().is_empty());
}

#[test]
fn test_builder_label_sets_and_objects_match_parsed_form() {
    let graph = Graph::from_parts(
        ["a", "b", "c", "d"].map(VertexData::with_id),
        vec![
            EdgeData::new("a", "knows", "b"),
            EdgeData::new("a", "likes", "c").property("weight", 2),
            EdgeData::new("a", "hates", "d"),
        ],
    );
    let registry = Registry::builtin();

    let built = graph.v(&registry, "a").out(["knows", "likes"]).run();
    let parsed = Query::from_program(&graph, &registry, parse_traversal("v('a').out(['knows', 'likes'])").unwrap()).run();
    assert_eq!(ids(&built), vec!["c", "b"]);
    assert_eq!(built, parsed);

    let loose_list = PropertyValue::Array(vec!["knows".into(), "likes".into()]);
    assert_eq!(ids(&graph.v(&registry, "a").out(loose_list).run()), vec!["c", "b"]);

    let loose_object = PropertyValue::Map(props! { "weight" => 2 });
    assert_eq!(ids(&graph.v(&registry, "a").out(loose_object).run()), vec!["c"]);

    let by_id = PropertyValue::Map(props! { "_id" => "a" });
    assert_eq!(ids(&graph.v(&registry, ()).filter(by_id).run()), vec!["a"]);
}

#[test]
fn test_unknown_operator_does_not_crash() {
    let graph = scenario_graph();
    let registry = Registry::builtin();

    let execution = graph.v(&registry, ()).add("teleport", ()).execute();
    assert!(execution.values.is_empty());
    assert_eq!(execution.warnings, vec![QueryError::UnknownOperator("teleport".into())]);

    // an unknown source feeding nothing still lets later sources run
    let upstream = Query::new(&graph, &registry).add("nothing", ()).vertex(2).run();
    assert_eq!(ids(&upstream), vec!["2"]);
}

#[test]
fn test_extension_operator() {
    let graph = scenario_graph();
    let mut registry = Registry::builtin();
    registry.register_pipetype(
        "named",
        pipetype(|graph, _, input, _| match input {
            Some(g) if graph.vertex(g.vertex).get_property("name").is_some() => Signal::Gremlin(g),
            Some(_) => Signal::Pull,
            None => Signal::Pull,
        }),
    );
    let result = graph.v(&registry, ()).add("named", ()).run();
    assert_eq!(result.len(), 3);
}

#[test]
fn test_parsed_traversal_matches_builder() {
    let graph = scenario_graph();
    let registry = Registry::builtin();
    let parsed = parse_traversal("v(1).in('knows').property('name')").unwrap();
    let from_text = Query::from_program(&graph, &registry, parsed).run();
    let built = graph.v(&registry, 1).in_("knows").property("name").run();
    assert_eq!(from_text, built);
}

#[test]
fn test_stream_resumes_between_results() {
    let graph = diamond();
    let registry = Registry::builtin();
    let mut stream = graph.v(&registry, ()).stream();
    let first = stream.next().unwrap();
    assert_eq!(first.as_vertex().map(|v| v.id.to_string()), Some("D".into()));
    assert_eq!(stream.count(), 3);
}
