//! Purpose: Contract coverage for decoding engine-owned token trees.
//! Exports: Integration tests only.
//! Role: Verify copy fidelity, sequence length/order, null handling and idempotence.
//! Invariants: Every foreign tree is built by `ForeignTree` and outlives its decodes.
//! Notes: Decoded tokens are compared after the foreign tree is dropped to catch
//! any view that was not copied out.

use hammer_ast::api::{Decoder, ForeignTree, Node, Token, TokenValue, decode, layout_report, sys};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn layout_mirror_agrees_with_c_compiler() {
    let report = layout_report();
    assert!(report.is_consistent(), "layout mismatch: {report:?}");
    assert_eq!(report.c_union_offset, hammer_ast::api::union_offset());
}

#[test]
fn byte_spans_are_copied_exactly() {
    init_tracing();
    let payload: Vec<u8> = (0..=255u8).chain([0, 0, 0xff]).collect();
    let token = {
        let tree = ForeignTree::build(&Node::bytes(payload.clone()).at(40, 0));
        unsafe { decode(tree.root()) }
    };
    assert_eq!(token.as_bytes(), Some(payload.as_slice()));
    assert_eq!(token.byte_offset, 40);

    let empty = {
        let tree = ForeignTree::build(&Node::bytes(Vec::new()));
        unsafe { decode(tree.root()) }
    };
    assert_eq!(empty.as_bytes(), Some(&[][..]));
}

#[test]
fn sequence_length_is_used_count_in_order() {
    let items: Vec<Node> = (0..10u64).map(|i| Node::uint(i * 3).at(i as usize, 0)).collect();
    let token = {
        let tree = ForeignTree::build(&Node::sequence(items).with_spare_capacity(6));
        unsafe { decode(tree.root()) }
    };
    let decoded = token.as_sequence().expect("sequence");
    assert_eq!(decoded.len(), 10);
    for (i, item) in decoded.iter().enumerate() {
        assert_eq!(item.as_uint(), Some(i as u64 * 3));
        assert_eq!(item.byte_offset, i as i64);
    }
}

#[test]
fn null_children_keep_their_position() {
    let tree = ForeignTree::build(&Node::sequence([
        Node::sint(1),
        Node::null(),
        Node::sint(3),
    ]));
    let token = unsafe { decode(tree.root()) };
    let items = token.as_sequence().expect("sequence");
    assert_eq!(items.len(), 3);
    assert_eq!(items[1], Token::default());
    assert_eq!(items[2].as_sint(), Some(3));
}

#[test]
fn empty_sequence_decodes_to_empty_list() {
    let tree = ForeignTree::build(&Node::sequence(Vec::<Node>::new()));
    let token = unsafe { decode(tree.root()) };
    assert_eq!(token.value, TokenValue::Sequence(Vec::new()));
}

#[test]
fn decoding_twice_is_structurally_equal() {
    let tree = ForeignTree::build(&Node::sequence([
        Node::bytes("key").at(0, 0),
        Node::sequence([Node::uint(u64::MAX), Node::sint(i64::MIN), Node::none()]).at(3, 2),
        Node::raw_tag(sys::TT_USER).at(9, 0),
    ]));
    let first = unsafe { decode(tree.root()) };
    let second = unsafe { decode(tree.root()) };
    assert_eq!(first, second);
    assert_eq!(first.count(), 7);
}

#[test]
fn bit_offset_is_preserved_without_range_checks() {
    let tree = ForeignTree::build(&Node::sequence([
        Node::uint(1).at(0, 7),
        Node::uint(2).at(1, -1),
        Node::uint(3).at(2, 100),
    ]));
    let token = unsafe { decode(tree.root()) };
    let offsets: Vec<i8> = token
        .as_sequence()
        .expect("sequence")
        .iter()
        .map(|item| item.bit_offset)
        .collect();
    assert_eq!(offsets, vec![7, -1, 100]);
}

#[test]
fn unsupported_tags_are_none_with_offsets() {
    init_tracing();
    let tree = ForeignTree::build(&Node::sequence([
        Node::raw_tag(sys::TT_FLOAT).at(4, 1),
        Node::raw_tag(sys::TT_ERR),
        Node::raw_tag(sys::TT_INVALID),
    ]));
    let token = unsafe { decode(tree.root()) };
    let items = token.as_sequence().expect("sequence");
    assert!(items.iter().all(Token::is_none));
    assert_eq!((items[0].byte_offset, items[0].bit_offset), (4, 1));
}

#[test]
fn depth_limited_decoder_accepts_shallow_trees() {
    let tree = ForeignTree::build(&Node::sequence([Node::uint(7), Node::bytes("ab").at(1, 0)]));
    let token = unsafe { Decoder::new().with_max_depth(2).decode(tree.root()) }.expect("decode");
    assert_eq!(token.to_string(), r#"[7u@0, "ab"@1]@0"#);
}
