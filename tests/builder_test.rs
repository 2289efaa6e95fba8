//! Tests for ViewTreeBuilder

use std::cell::Cell;
use std::rc::Rc;

use rstest::{fixture, rstest};

use yatree::config::{ProducerPolicy, Settings};
use yatree::domain::{
    child_list, DomainNode, NodeRef, Producer, TreeError, ViewTree, ViewTreeBuilder,
};

#[fixture]
fn settings() -> Settings {
    Settings::default()
}

fn labelled(label: &str) -> DomainNode {
    DomainNode::new().with("label", label)
}

#[rstest]
fn given_leaf_node_when_wrapping_then_copies_model_parent_and_collapsed(settings: Settings) {
    // Arrange
    let parent = labelled("parent").into_ref();
    let node = DomainNode::new().into_ref();
    let mut tree = ViewTree::new();

    // Act
    let idx = ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &node, Some(&parent), None)
        .unwrap();

    // Assert
    let view = tree.get(idx).unwrap();
    assert!(Rc::ptr_eq(view.model(), &node));
    assert!(Rc::ptr_eq(view.parent().unwrap(), &parent));
    assert!(!view.has_children());
    assert!(view.children().is_empty());
    assert_eq!(view.collapsed(), settings.collapse_by_default);
}

#[rstest]
#[case(true)]
#[case(false)]
fn given_collapse_by_default_when_wrapping_then_every_node_follows_it(#[case] collapse: bool) {
    let settings = Settings {
        collapse_by_default: collapse,
        ..Settings::default()
    };
    let node = labelled("root")
        .with("children", vec![labelled("child").into_ref()])
        .into_ref();
    let mut tree = ViewTree::new();

    ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &node, None, None)
        .unwrap();

    assert!(tree.iter().all(|(_, view)| view.collapsed() == collapse));
}

#[rstest]
fn given_node_with_child_list_when_wrapping_then_builds_children_eagerly(settings: Settings) {
    // Arrange
    let child = labelled("child").into_ref();
    let node = labelled("node").with("children", vec![Rc::clone(&child)]).into_ref();
    let mut tree = ViewTree::new();

    // Act
    let idx = ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &node, None, None)
        .unwrap();

    // Assert
    let view = tree.get(idx).unwrap();
    assert!(Rc::ptr_eq(view.model(), &node));
    assert!(view.has_children());
    assert_eq!(view.children().len(), 1);

    let child_view = tree.get(view.children()[0]).unwrap();
    assert!(Rc::ptr_eq(child_view.model(), &child));
    assert!(Rc::ptr_eq(child_view.parent().unwrap(), &node));
    assert!(!child_view.has_children());
    assert_eq!(child_view.collapsed(), settings.collapse_by_default);
    assert_eq!(child_view.view_parent(), Some(idx));
}

#[rstest]
fn given_empty_child_list_when_wrapping_then_has_no_children(settings: Settings) {
    let node = labelled("node").with("children", Vec::<NodeRef>::new()).into_ref();
    let mut tree = ViewTree::new();

    let idx = ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &node, None, None)
        .unwrap();

    assert!(!tree.get(idx).unwrap().has_children());
}

#[rstest]
fn given_node_list_when_wrapping_many_then_preserves_order(settings: Settings) {
    // Arrange
    let node1 = labelled("node1").into_ref();
    let node2 = labelled("node2").into_ref();
    let mut tree = ViewTree::new();

    // Act
    let ids = ViewTreeBuilder::new(&settings)
        .wrap_many(&mut tree, &[Rc::clone(&node1), Rc::clone(&node2)], None, None)
        .unwrap();

    // Assert
    assert_eq!(ids.len(), 2);
    assert!(Rc::ptr_eq(tree.get(ids[0]).unwrap().model(), &node1));
    assert!(Rc::ptr_eq(tree.get(ids[1]).unwrap().model(), &node2));
    assert_eq!(tree.roots(), ids.as_slice());
}

#[rstest]
fn given_empty_list_when_wrapping_many_then_empty(settings: Settings) {
    let mut tree = ViewTree::new();
    let ids = ViewTreeBuilder::new(&settings)
        .wrap_many(&mut tree, &[], None, None)
        .unwrap();
    assert!(ids.is_empty());
    assert!(tree.is_empty());
}

#[rstest]
fn given_parent_with_single_child_when_wrapping_then_matches_scenario(settings: Settings) {
    // root = {label: 'parent1', children: [{label: 'child'}]}
    let root = labelled("parent1")
        .with("children", vec![labelled("child").into_ref()])
        .into_ref();
    let mut tree = ViewTree::new();

    let idx = ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &root, None, None)
        .unwrap();

    let view = tree.get(idx).unwrap();
    assert!(view.has_children());
    let child = tree.get(view.children()[0]).unwrap();
    assert_eq!(child.model().get_str("label"), Some("child"));
    assert!(!child.has_children());
}

fn counting_producer(calls: &Rc<Cell<usize>>) -> Producer {
    let calls = Rc::clone(calls);
    Producer::new(move |_| {
        calls.set(calls.get() + 1);
        child_list([labelled("lazy").into_ref()])
    })
}

#[test]
fn given_producer_and_deferred_policy_when_wrapping_then_children_pending() {
    // Arrange
    let settings = Settings {
        producer_policy: ProducerPolicy::Deferred,
        ..Settings::default()
    };
    let calls = Rc::new(Cell::new(0));
    let node = labelled("lazy root")
        .with("children", counting_producer(&calls))
        .into_ref();
    let mut tree = ViewTree::new();

    // Act
    let idx = ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &node, None, None)
        .unwrap();

    // Assert: producer ran once to learn has_children, nothing wrapped yet
    let view = tree.get(idx).unwrap();
    assert_eq!(calls.get(), 1);
    assert!(view.has_children());
    assert!(view.children().is_empty());
    assert!(view.is_pending());
    assert_eq!(tree.len(), 1);
}

#[test]
fn given_producer_and_eager_policy_when_wrapping_then_children_built() {
    let settings = Settings {
        producer_policy: ProducerPolicy::Eager,
        ..Settings::default()
    };
    let calls = Rc::new(Cell::new(0));
    let node = labelled("root")
        .with("children", counting_producer(&calls))
        .into_ref();
    let mut tree = ViewTree::new();

    let idx = ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &node, None, None)
        .unwrap();

    let view = tree.get(idx).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(view.children().len(), 1);
    assert!(!view.is_pending());
}

#[rstest]
fn given_malformed_grandchild_when_wrapping_then_aborts_without_leftovers(settings: Settings) {
    // Arrange
    let bad = labelled("bad").with("children", "oops").into_ref();
    let root = labelled("root")
        .with(
            "children",
            vec![
                labelled("ok").into_ref(),
                labelled("middle").with("children", vec![bad]).into_ref(),
            ],
        )
        .into_ref();
    let mut tree = ViewTree::new();

    // Act
    let result = ViewTreeBuilder::new(&settings).wrap(&mut tree, &root, None, None);

    // Assert
    assert!(matches!(
        result,
        Err(TreeError::InvalidChildrenSpecification { found: "string", .. })
    ));
    assert!(tree.is_empty());
    assert!(tree.roots().is_empty());
}

#[test]
fn given_deferred_children_and_expanded_default_when_wrapping_then_node_starts_collapsed() {
    let settings = Settings {
        collapse_by_default: false,
        ..Settings::default()
    };
    let calls = Rc::new(Cell::new(0));
    let node = labelled("lazy root")
        .with("children", counting_producer(&calls))
        .into_ref();
    let mut tree = ViewTree::new();

    let idx = ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &node, None, None)
        .unwrap();

    let view = tree.get(idx).unwrap();
    assert!(view.is_pending());
    assert!(view.collapsed());
}

#[test]
fn given_eager_producer_and_expanded_default_when_wrapping_then_node_stays_expanded() {
    let settings = Settings {
        collapse_by_default: false,
        producer_policy: ProducerPolicy::Eager,
        ..Settings::default()
    };
    let calls = Rc::new(Cell::new(0));
    let node = labelled("root")
        .with("children", counting_producer(&calls))
        .into_ref();
    let mut tree = ViewTree::new();

    let idx = ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &node, None, None)
        .unwrap();

    let view = tree.get(idx).unwrap();
    assert!(view.is_expanded());
    assert_eq!(view.children().len(), 1);
}

#[rstest]
fn given_deep_chain_when_wrapping_then_every_level_attached_in_order(settings: Settings) {
    // Arrange: depth-first chain with a leaf sibling on every level
    let depth = 1_000;
    let mut node = labelled("bottom").into_ref();
    for level in (0..depth).rev() {
        node = labelled(&format!("level {level}"))
            .with("children", vec![node, labelled("leaf").into_ref()])
            .into_ref();
    }
    let mut tree = ViewTree::new();

    // Act
    let root = ViewTreeBuilder::new(&settings)
        .wrap(&mut tree, &node, None, None)
        .unwrap();

    // Assert
    assert_eq!(tree.len(), 2 * depth + 1);
    let mut path = vec![0; depth + 1];
    let bottom = tree.find_by_path(&path).unwrap();
    assert_eq!(tree.get(bottom).unwrap().model().get_str("label"), Some("bottom"));
    assert_eq!(tree.depth(bottom), depth);
    path[depth] = 1;
    let leaf = tree.find_by_path(&path).unwrap();
    assert_eq!(tree.get(leaf).unwrap().model().get_str("label"), Some("leaf"));
    assert_eq!(tree.path_of(root), Some(vec![0]));
}
