use grapher_rs::api::EquationSyncBridge;
use grapher_rs::core::GraphModel;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Push(String),
    Insert(usize, String),
    Remove(usize),
    Toggle(usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    let expression = "[a-z()*+=0-9]{0,12}";
    prop_oneof![
        expression.prop_map(Edit::Push),
        (0usize..16, expression).prop_map(|(index, expr)| Edit::Insert(index, expr)),
        (0usize..16).prop_map(Edit::Remove),
        (0usize..16).prop_map(Edit::Toggle),
    ]
}

proptest! {
    #[test]
    fn indices_stay_dense_under_any_edit_sequence(
        edits in prop::collection::vec(edit_strategy(), 1..64)
    ) {
        let mut graph = GraphModel::new("property");

        for edit in edits {
            match edit {
                Edit::Push(expr) => {
                    graph.push_equation(expr).expect("push accepts plain text");
                }
                Edit::Insert(index, expr) => {
                    let index = index.min(graph.len());
                    graph.insert_equation(index, expr).expect("insert in range");
                }
                Edit::Remove(index) => {
                    let _ = graph.remove_equation(index);
                }
                Edit::Toggle(index) => {
                    let _ = graph.toggle_disabled(index);
                }
            }

            for (position, entry) in graph.equations().iter().enumerate() {
                prop_assert_eq!(entry.index(), position);
            }
            prop_assert!(graph.validate_indices().is_ok());
        }

        let payload = EquationSyncBridge::build_payload(&graph);
        prop_assert_eq!(payload.len(), graph.len());
        for (eq, entry) in payload.iter().zip(graph.equations()) {
            prop_assert_eq!(eq.disabled, entry.disabled);
            prop_assert_eq!(eq.expression, entry.expression.as_str());
        }
    }
}
