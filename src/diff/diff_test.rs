//! Tests for control tree diffing.

#[cfg(test)]
mod tests {
    use crate::controlpath::ControlPath;
    use crate::delta::{AddControl, ChangeProperty, Delta, Deltas, PropertyChangeKind, RemoveControl};
    use crate::diff::{compute_delta, ControlDiff, DiffError, TreeSide};
    use crate::ir::{self, ControlNode};
    use crate::state::{ControlState, ControlStates, EditorStateStore};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Helper to create a control path from identifiers.
    fn path(segments: &[&str]) -> ControlPath {
        ControlPath::from_segments(segments.iter().copied())
    }

    fn states(entries: &[ControlState]) -> ControlStates {
        entries.iter().map(|s| (s.name.clone(), s.clone())).collect()
    }

    fn diff(current: &ControlNode, base: &ControlNode, store: &EditorStateStore) -> Vec<Delta> {
        compute_delta(current, Some(base), store, false).unwrap().into()
    }

    fn sample_tree() -> ControlNode {
        ControlNode::new("Screen1", "Screen")
            .with_property("Fill", "RGBA(255, 255, 255, 1)")
            .with_child(
                ControlNode::new("Gallery1", "Gallery")
                    .with_variant("vertical")
                    .with_property("Items", "Accounts")
                    .with_child(ControlNode::new("Title1", "Label").with_property("Text", "ThisItem.Name")),
            )
            .with_child(ControlNode::new("Button1", "Button").with_property("OnSelect", "Navigate(Screen2)"))
    }

    #[test]
    fn test_label_text_changed_and_button_added() {
        let base = ControlNode::new("Screen1", "Screen")
            .with_child(ControlNode::new("Label1", "Label").with_property("Text", "\"Hi\""));
        let current = ControlNode::new("Screen1", "Screen")
            .with_child(ControlNode::new("Label1", "Label").with_property("Text", "\"Hello\""))
            .with_child(ControlNode::new("Button1", "Button"));

        let deltas = diff(&current, &base, &EditorStateStore::new());

        assert_eq!(
            deltas,
            vec![
                Delta::from(ChangeProperty::modified(path(&["Screen1", "Label1"]), "Text", "\"Hello\"", false)),
                AddControl::new(
                    path(&["Screen1"]),
                    ControlNode::new("Button1", "Button"),
                    ControlStates::new(),
                    false
                )
                .into(),
            ]
        );
    }

    #[test]
    fn test_root_type_change_replaces_document() {
        let base = ControlNode::new("Screen1", "Screen").with_child(ControlNode::new("Label1", "Label"));
        let current = ControlNode::new("Screen1", "Gallery")
            .with_child(ControlNode::new("Label1", "Label").with_property("Text", "x"));
        let store = EditorStateStore::from_states(vec![
            ControlState::new("Screen1").with_field("isLocked", json!(false)),
            ControlState::new("Label1"),
        ]);

        let deltas = diff(&current, &base, &store);

        assert_eq!(
            deltas,
            vec![
                Delta::from(RemoveControl::new(ControlPath::empty(), "Screen1", false)),
                AddControl::new(
                    ControlPath::empty(),
                    current.clone(),
                    states(&[
                        ControlState::new("Screen1").with_field("isLocked", json!(false)),
                        ControlState::new("Label1"),
                    ]),
                    false
                )
                .into(),
            ]
        );
    }

    #[test]
    fn test_identical_trees_yield_nothing() {
        let tree = sample_tree();
        let deltas = compute_delta(&tree, Some(&tree.clone()), &EditorStateStore::new(), false).unwrap();
        assert!(deltas.is_empty(), "unexpected deltas:\n{}", deltas);
    }

    #[test]
    fn test_variant_change_alone_yields_nothing() {
        let base = sample_tree();
        let mut current = sample_tree();
        current.children[0].name.variant = Some("horizontal".into());

        assert!(diff(&current, &base, &EditorStateStore::new()).is_empty());
    }

    #[test]
    fn test_diff_is_deterministic() {
        let base = sample_tree();
        let mut current = sample_tree();
        current.children.reverse();
        current.children.push(ControlNode::new("Icon1", "Icon"));
        current.properties.clear();
        let store = EditorStateStore::from_states(vec![ControlState::new("Icon1")]);

        let first = compute_delta(&current, Some(&base), &store, false).unwrap();
        for _ in 0..5 {
            assert_eq!(compute_delta(&current, Some(&base), &store, false).unwrap(), first);
        }
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_added_subtree_carries_all_states() {
        let base = ControlNode::new("Screen1", "Screen");
        let gallery = ControlNode::new("Gallery1", "Gallery")
            .with_child(
                ControlNode::new("Card1", "Group")
                    .with_child(ControlNode::new("Title1", "Label"))
                    .with_child(ControlNode::new("Subtitle1", "Label")),
            );
        let current = ControlNode::new("Screen1", "Screen").with_child(gallery.clone());
        let store = EditorStateStore::from_states(vec![
            ControlState::new("Gallery1").with_field("styleName", json!("defaultGalleryStyle")),
            ControlState::new("Title1"),
            ControlState::new("Screen1"),
        ]);

        let deltas = diff(&current, &base, &store);

        assert_eq!(deltas.len(), 1);
        let add = deltas[0].as_add_control().expect("expected an AddControl");
        assert_eq!(add.parent_path, path(&["Screen1"]));
        assert_eq!(add.control, gallery);
        // Screen1 is outside the added subtree; Card1 and Subtitle1 have no state.
        assert_eq!(
            add.states,
            states(&[
                ControlState::new("Gallery1").with_field("styleName", json!("defaultGalleryStyle")),
                ControlState::new("Title1"),
            ])
        );
    }

    #[test]
    fn test_removed_controls_follow_base_order() {
        let base = ControlNode::new("Screen1", "Screen")
            .with_child(ControlNode::new("Charlie", "Label"))
            .with_child(ControlNode::new("Alpha", "Label"))
            .with_child(ControlNode::new("Kept", "Label"))
            .with_child(ControlNode::new("Bravo", "Label").with_child(ControlNode::new("Inner", "Icon")));
        let current = ControlNode::new("Screen1", "Screen")
            .with_child(ControlNode::new("Kept", "Label"))
            .with_child(ControlNode::new("New", "Label"));

        let deltas = diff(&current, &base, &EditorStateStore::new());

        let summary: Vec<String> = deltas.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            summary,
            vec![
                "+ Screen1 New (Label)",
                "- Screen1 Charlie",
                "- Screen1 Alpha",
                "- Screen1 Bravo",
            ]
        );
    }

    #[test]
    fn test_nested_type_change_stops_descent() {
        let base = ControlNode::new("Screen1", "Screen").with_child(
            ControlNode::new("Container1", "GroupContainer")
                .with_property("LayoutMode", "Auto")
                .with_child(ControlNode::new("Label1", "Label").with_property("Text", "a")),
        );
        let current = ControlNode::new("Screen1", "Screen").with_child(
            ControlNode::new("Container1", "Gallery")
                .with_property("Items", "Orders")
                .with_child(ControlNode::new("Label1", "Label").with_property("Text", "b")),
        );

        let deltas = diff(&current, &base, &EditorStateStore::new());

        assert_eq!(deltas.len(), 2);
        assert_eq!(
            deltas[0],
            Delta::from(RemoveControl::new(path(&["Screen1"]), "Container1", false))
        );
        let add = deltas[1].as_add_control().unwrap();
        assert_eq!(add.parent_path, path(&["Screen1"]));
        assert_eq!(add.control.type_name(), "Gallery");
        assert_eq!(add.control.children[0].properties[0].expression, "b");
    }

    #[test]
    fn test_property_symmetry() {
        let base = ControlNode::new("Label1", "Label")
            .with_property("Same", "1")
            .with_property("Changed", "Old")
            .with_property("Gone", "Bye");
        let current = ControlNode::new("Label1", "Label")
            .with_property("Changed", "New")
            .with_property("Same", "1")
            .with_property("Fresh", "Hi");

        let deltas = diff(&current, &base, &EditorStateStore::new());
        let label = path(&["Label1"]);

        assert_eq!(
            deltas,
            vec![
                Delta::from(ChangeProperty::modified(label.clone(), "Changed", "New", false)),
                Delta::from(ChangeProperty::added(label.clone(), "Fresh", "Hi", false)),
                Delta::from(ChangeProperty::removed(label, "Gone", false)),
            ]
        );
        let removed = deltas[2].as_change_property().unwrap();
        assert!(removed.was_removed());
        assert_eq!(removed.expression, None);
    }

    #[test]
    fn test_expression_compared_as_exact_text() {
        let base = ControlNode::new("Label1", "Label").with_property("Text", "\"Hi\"");
        let current = ControlNode::new("Label1", "Label").with_property("Text", "\"Hi\" ");

        let deltas = diff(&current, &base, &EditorStateStore::new());
        assert_eq!(deltas.len(), 1);
        assert_eq!(
            deltas[0].as_change_property().map(|c| c.change),
            Some(PropertyChangeKind::Modified)
        );
    }

    #[test]
    fn test_children_reconciled_before_properties() {
        let base = ControlNode::new("Screen1", "Screen")
            .with_property("OnVisible", "Refresh(Accounts)")
            .with_property("Fill", "White")
            .with_child(ControlNode::new("A", "Label").with_property("Text", "a"))
            .with_child(ControlNode::new("B", "Button"))
            .with_child(ControlNode::new("C", "Label"));
        let current = ControlNode::new("Screen1", "Screen")
            .with_property("Fill", "Black")
            .with_property("Width", "1366")
            .with_child(ControlNode::new("D", "Icon"))
            .with_child(ControlNode::new("A", "Label").with_property("Text", "b").with_property("Color", "Red"))
            .with_child(ControlNode::new("C", "Image"));
        let store = EditorStateStore::from_states(vec![ControlState::new("D"), ControlState::new("C")]);

        let deltas = diff(&current, &base, &store);
        let screen = path(&["Screen1"]);
        let a = path(&["Screen1", "A"]);

        assert_eq!(
            deltas,
            vec![
                Delta::from(AddControl::new(
                    screen.clone(),
                    ControlNode::new("D", "Icon"),
                    states(&[ControlState::new("D")]),
                    false
                )),
                Delta::from(ChangeProperty::modified(a.clone(), "Text", "b", false)),
                Delta::from(ChangeProperty::added(a, "Color", "Red", false)),
                Delta::from(RemoveControl::new(screen.clone(), "C", false)),
                AddControl::new(
                    screen.clone(),
                    ControlNode::new("C", "Image"),
                    states(&[ControlState::new("C")]),
                    false
                )
                .into(),
                Delta::from(RemoveControl::new(screen.clone(), "B", false)),
                Delta::from(ChangeProperty::modified(screen.clone(), "Fill", "Black", false)),
                Delta::from(ChangeProperty::added(screen.clone(), "Width", "1366", false)),
                Delta::from(ChangeProperty::removed(screen, "OnVisible", false)),
            ]
        );
    }

    #[test]
    fn test_in_component_flag_reaches_every_delta() {
        let base = ControlNode::new("Component1", "Component")
            .with_property("Height", "100")
            .with_child(ControlNode::new("Old", "Label"))
            .with_child(ControlNode::new("Swapped", "Label"));
        let current = ControlNode::new("Component1", "Component")
            .with_property("Width", "200")
            .with_child(ControlNode::new("New", "Label"))
            .with_child(ControlNode::new("Swapped", "Icon"));

        let walker = ControlDiff::builder().in_component(true).build();
        let deltas = walker.diff(&current, Some(&base), &EditorStateStore::new()).unwrap();

        assert_eq!(deltas.len(), 6);
        assert!(deltas.iter().all(Delta::in_component));

        let outside = compute_delta(&current, Some(&base), &EditorStateStore::new(), false).unwrap();
        assert!(outside.iter().all(|d| !d.in_component()));
    }

    #[test]
    fn test_missing_base_adds_whole_document() {
        let current = sample_tree();
        let store = EditorStateStore::from_states(vec![ControlState::new("Title1")]);

        let deltas: Vec<Delta> = compute_delta(&current, None, &store, false).unwrap().into();

        assert_eq!(
            deltas,
            vec![Delta::from(AddControl::new(
                ControlPath::empty(),
                current.clone(),
                states(&[ControlState::new("Title1")]),
                false
            ))]
        );
    }

    #[test]
    fn test_duplicate_base_child_fails() {
        let base = ControlNode::new("Screen1", "Screen")
            .with_child(ControlNode::new("Label1", "Label"))
            .with_child(ControlNode::new("Label1", "Label"));
        let current = ControlNode::new("Screen1", "Screen");

        let err = compute_delta(&current, Some(&base), &EditorStateStore::new(), false).unwrap_err();
        assert_eq!(
            err,
            DiffError::DuplicateControl {
                path: path(&["Screen1"]),
                identifier: "Label1".into(),
                side: TreeSide::Base,
            }
        );
    }

    #[test]
    fn test_duplicate_current_child_fails() {
        let base = ControlNode::new("Screen1", "Screen");
        let current = ControlNode::new("Screen1", "Screen").with_child(
            ControlNode::new("Gallery1", "Gallery")
                .with_child(ControlNode::new("Title1", "Label"))
                .with_child(ControlNode::new("Title1", "Label")),
        );
        let base = base.with_child(ControlNode::new("Gallery1", "Gallery"));

        let err = compute_delta(&current, Some(&base), &EditorStateStore::new(), false).unwrap_err();
        assert_eq!(
            err,
            DiffError::duplicate_control(&path(&["Screen1", "Gallery1"]), "Title1", TreeSide::Current)
        );
    }

    #[test]
    fn test_duplicate_properties_fail() {
        let clean = ControlNode::new("Label1", "Label").with_property("Text", "a");
        let dup = ControlNode::new("Label1", "Label")
            .with_property("Text", "a")
            .with_property("Text", "b");
        let store = EditorStateStore::new();

        let err = compute_delta(&clean, Some(&dup), &store, false).unwrap_err();
        assert_eq!(err, DiffError::duplicate_property(&path(&["Label1"]), "Text", TreeSide::Base));

        let err = compute_delta(&dup, Some(&clean), &store, false).unwrap_err();
        assert_eq!(err, DiffError::duplicate_property(&path(&["Label1"]), "Text", TreeSide::Current));
    }

    fn gallery_with_duplicate_titles() -> ControlNode {
        ControlNode::new("Gallery1", "Gallery")
            .with_child(ControlNode::new("Title1", "Label"))
            .with_child(ControlNode::new("Title1", "Label"))
    }

    #[test]
    fn test_duplicates_in_unmatched_subtrees_fail() {
        let store = EditorStateStore::new();
        let screen = ControlNode::new("Screen1", "Screen");
        let with_gallery = screen.clone().with_child(gallery_with_duplicate_titles());

        // Whole document added.
        let err = compute_delta(&gallery_with_duplicate_titles(), None, &store, false).unwrap_err();
        assert_eq!(err, DiffError::duplicate_control(&path(&["Gallery1"]), "Title1", TreeSide::Current));

        // Subtree added under a matched control.
        let err = compute_delta(&with_gallery, Some(&screen), &store, false).unwrap_err();
        assert_eq!(
            err,
            DiffError::duplicate_control(&path(&["Screen1", "Gallery1"]), "Title1", TreeSide::Current)
        );

        // Subtree removed from the base.
        let err = compute_delta(&screen, Some(&with_gallery), &store, false).unwrap_err();
        assert_eq!(
            err,
            DiffError::duplicate_control(&path(&["Screen1", "Gallery1"]), "Title1", TreeSide::Base)
        );
    }

    #[test]
    fn test_duplicates_under_type_change_fail() {
        let base = ControlNode::new("Screen1", "Screen").with_child(ControlNode::new("Gallery1", "Label"));
        let current = ControlNode::new("Screen1", "Screen").with_child(
            gallery_with_duplicate_titles().with_property("Items", "a").with_property("Items", "b"),
        );

        let err = compute_delta(&current, Some(&base), &EditorStateStore::new(), false).unwrap_err();
        assert_eq!(
            err,
            DiffError::duplicate_control(&path(&["Screen1", "Gallery1"]), "Title1", TreeSide::Current)
        );
    }

    #[test]
    fn test_diff_from_yaml_documents() {
        let base = ir::from_yaml(
            r#"
name: App
type: Screen
children:
  - name: Header
    type: Label
    properties:
      - name: Text
        expression: '"Accounts"'
  - name: Footer
    type: Label
"#,
        )
        .unwrap();
        let current = ir::from_yaml(
            r#"
name: App
type: Screen
properties:
  - name: OnVisible
    expression: Refresh(Accounts)
children:
  - name: Header
    type: Label
    properties:
      - name: Text
        expression: '"All accounts"'
"#,
        )
        .unwrap();
        let store = EditorStateStore::from_json(r#"{"states": [{"name": "Footer"}]}"#).unwrap();

        let deltas: Deltas = compute_delta(&current, Some(&base), &store, false).unwrap();

        assert_eq!(
            deltas.to_string(),
            "~ App.Header Text = \"All accounts\"\n- App Footer\n~ App OnVisible = Refresh(Accounts)"
        );
        let groups = deltas.group_by_path();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].0, &path(&["App"]));
        assert_eq!(groups[1].1.len(), 2);
    }
}
