
use fixtures::{
    generate_random_whitespace, generate_random_whitespace_at_least_one, get_engine, open,
};
use mapperlate::{
    IfNode, MapperlateError, Node, NodeAttributes, SqlNode, TextNode, TreeBuilder, WhereNode,
};

#[test]
#[ntest::timeout(100)]
fn test_select_with_where_and_ifs() {
    let mut builder = TreeBuilder::new();
    builder
        .text("SELECT id, name FROM users")
        .unwrap()
        .start("where", &NodeAttributes::new())
        .unwrap();
    open(&mut builder, "if", &[("test", "name != null")])
        .unwrap()
        .text("AND name = #{name}")
        .unwrap()
        .end("if")
        .unwrap();
    open(&mut builder, "if", &[("test", "email != null")])
        .unwrap()
        .text("AND email = #{email}")
        .unwrap()
        .end("if")
        .unwrap()
        .end("where")
        .unwrap()
        .text(" ORDER BY ${orderBy}")
        .unwrap();

    let mut engine = get_engine();
    engine
        .add_statement("selectUsers", builder.finish().unwrap())
        .unwrap();

    assert_eq!(
        engine.restore("selectUsers").unwrap(),
        "SELECT id, name FROM users WHERE name = ? AND email = ? ORDER BY orderBy",
        "Every conditional body should be rendered"
    );
}

#[test]
#[ntest::timeout(100)]
fn test_choose_renders_union_of_branches() {
    let mut builder = TreeBuilder::new();
    builder
        .text("SELECT * FROM orders WHERE 1 = 1")
        .unwrap()
        .start("choose", &NodeAttributes::new())
        .unwrap();
    open(&mut builder, "when", &[("test", "status != null")])
        .unwrap()
        .text("AND status = #{status}")
        .unwrap()
        .end("when")
        .unwrap();
    open(&mut builder, "otherwise", &[])
        .unwrap()
        .text("AND archived = 0")
        .unwrap()
        .end("otherwise")
        .unwrap()
        .end("choose")
        .unwrap();

    let statement = builder.finish().unwrap();
    assert_eq!(
        statement.restore_to_string().unwrap(),
        "SELECT * FROM orders WHERE 1 = 1   AND status = ? AND archived = 0"
    );
}

#[test]
#[ntest::timeout(100)]
fn test_update_with_set() {
    let mut builder = TreeBuilder::new();
    builder
        .text("UPDATE accounts")
        .unwrap()
        .start("set", &NodeAttributes::new())
        .unwrap();
    for column in ["owner", "balance"] {
        open(&mut builder, "if", &[("test", column)])
            .unwrap()
            .text(format!("{column} = #{{{column}}},"))
            .unwrap()
            .end("if")
            .unwrap();
    }
    builder
        .end("set")
        .unwrap()
        .text(" WHERE id = #{id}")
        .unwrap();

    assert_eq!(
        builder.finish().unwrap().restore_to_string().unwrap(),
        "UPDATE accounts SET owner = ?, balance = ? WHERE id = ?"
    );
}

#[test]
#[ntest::timeout(100)]
fn test_insert_with_trim() {
    let trim = [
        ("prefix", "("),
        ("suffix", ")"),
        ("suffixOverrides", ","),
    ];

    let mut builder = TreeBuilder::new();
    builder.text("INSERT INTO tags").unwrap();
    open(&mut builder, "trim", &trim)
        .unwrap()
        .start("if", &NodeAttributes::from_pairs([("test", "name")]))
        .unwrap()
        .text("name,")
        .unwrap()
        .end("if")
        .unwrap()
        .start("if", &NodeAttributes::from_pairs([("test", "color")]))
        .unwrap()
        .text("color,")
        .unwrap()
        .end("if")
        .unwrap()
        .end("trim")
        .unwrap()
        .text(" VALUES")
        .unwrap();
    open(&mut builder, "trim", &trim)
        .unwrap()
        .text("#{name}, #{color},")
        .unwrap()
        .end("trim")
        .unwrap();

    assert_eq!(
        builder.finish().unwrap().restore_to_string().unwrap(),
        "INSERT INTO tags ( name, color ) VALUES ( ?, ? )"
    );
}

#[test]
#[ntest::timeout(100)]
fn test_empty_where_vanishes() {
    let mut builder = TreeBuilder::new();
    builder
        .text("SELECT * FROM t")
        .unwrap()
        .start("where", &NodeAttributes::new())
        .unwrap()
        .text(generate_random_whitespace())
        .unwrap()
        .start("if", &NodeAttributes::from_pairs([("test", "never")]))
        .unwrap()
        .end("if")
        .unwrap()
        .end("where")
        .unwrap();

    assert_eq!(
        builder.finish().unwrap().restore_to_string().unwrap(),
        "SELECT * FROM t"
    );
}

#[test]
#[ntest::timeout(100)]
fn test_where_ignores_surrounding_whitespace() {
    let body = format!(
        "{}AND{}a = 1{}",
        generate_random_whitespace(),
        generate_random_whitespace_at_least_one(),
        generate_random_whitespace(),
    );
    dbg!(&body);

    // Only a single space after the keyword matches the override token.
    let expected = if body.trim_start().starts_with("AND ") {
        let rest = body.trim().trim_start_matches("AND ");
        format!(" WHERE {rest}")
    } else {
        format!(" WHERE {}", body.trim())
    };

    let mut node = WhereNode::new();
    node.add_child(Node::Text(TextNode::new(body)));
    assert_eq!(node.restore_to_string().unwrap(), expected);
}

#[test]
#[ntest::timeout(100)]
fn test_restore_twice_is_identical() {
    let mut builder = TreeBuilder::new();
    builder
        .text("DELETE FROM sessions")
        .unwrap()
        .start("where", &NodeAttributes::new())
        .unwrap()
        .start("if", &NodeAttributes::from_pairs([("test", "user")]))
        .unwrap()
        .text("OR user_id = #{user}")
        .unwrap()
        .end("if")
        .unwrap()
        .end("where")
        .unwrap();
    let statement = builder.finish().unwrap();

    let mut first = Vec::new();
    let mut second = Vec::new();
    statement.restore(&mut first).unwrap();
    statement.restore(&mut second).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, b"DELETE FROM sessions WHERE user_id = ?");
}

#[test]
#[ntest::timeout(100)]
fn test_manual_tree_assembly() {
    let mut condition = IfNode::new("flag");
    condition.add_child(Node::Text(TextNode::new("AND flag = 1")));

    let mut clause = Node::from_directive(
        "where".parse().unwrap(),
        &NodeAttributes::from_pairs([("prefix", "ignored")]),
    );
    clause.add_child(Node::If(condition));

    assert_eq!(clause.restore_to_string().unwrap(), " WHERE flag = 1");
    assert_eq!(clause.children().len(), 1);
}

#[test]
#[ntest::timeout(100)]
fn test_malformed_markup_is_reported() {
    let mut builder = TreeBuilder::new();
    builder.start("where", &NodeAttributes::new()).unwrap();

    match builder.end("if") {
        Err(MapperlateError::UnbalancedTag { expected, found }) => {
            assert_eq!(expected, "where");
            assert_eq!(found, "if");
        }
        other => panic!("Expected an UnbalancedTag error, got {:?}", other),
    }

    match builder.finish() {
        Err(MapperlateError::UnclosedTag { tag }) => assert_eq!(tag, "where"),
        other => panic!("Expected an UnclosedTag error, got {:?}", other),
    }
}

#[test]
#[ntest::timeout(100)]
fn test_error_messages() {
    let error = TreeBuilder::new().text("x = #{x").unwrap_err();
    assert_eq!(
        error.to_string(),
        "Parse error at line 1, column 5: Unclosed placeholder '#{' (expected '}')"
    );

    let error = get_engine().restore("missing").unwrap_err();
    assert_eq!(error.to_string(), "Statement not found: missing");
}
