use super::*;

#[test]
fn builds_placeholders_in_order() {
    let mut q = sql("SELECT * FROM users WHERE a = ");
    q.push_bind(1).push(" AND b = ").push_bind("x");

    assert_eq!(q.to_sql(), "SELECT * FROM users WHERE a = $1 AND b = $2");
    assert_eq!(q.params_ref().len(), 2);
}

#[test]
fn can_compose_fragments() {
    let mut w = Sql::new(" WHERE id = ");
    w.push_bind(42);

    let mut q = sql("SELECT * FROM users");
    q.push_sql(w);

    assert_eq!(q.to_sql(), "SELECT * FROM users WHERE id = $1");
    assert_eq!(q.params_ref().len(), 1);
}

#[test]
fn composed_fragments_renumber_after_existing_params() {
    let mut q = sql("SELECT * FROM properties WHERE owner_id = ");
    q.push_bind(3_i32);

    let mut more = Sql::new(" AND city LIKE ");
    more.push_bind("%Miami%".to_string());
    q.push_sql(more);

    assert_eq!(
        q.to_sql(),
        "SELECT * FROM properties WHERE owner_id = $1 AND city LIKE $2"
    );
}

#[test]
fn where_and_joins_predicates() {
    let mut a = Sql::new("x = ");
    a.push_bind(1_i32);
    let mut b = Sql::new("y <= ");
    b.push_bind(2_i32);

    let mut q = sql("SELECT * FROM t");
    q.push_where_and(vec![a, b]);

    assert_eq!(q.to_sql(), "SELECT * FROM t WHERE x = $1 AND y <= $2");
}

#[test]
fn where_and_empty_is_noop() {
    let mut q = sql("SELECT * FROM t");
    q.push_where_and(Vec::new());
    assert_eq!(q.to_sql(), "SELECT * FROM t");
}

#[test]
fn limit_appends_with_param() {
    let mut q = sql("SELECT * FROM users ORDER BY id");
    q.limit(10);
    assert_eq!(q.to_sql(), "SELECT * FROM users ORDER BY id LIMIT $1");
    assert_eq!(q.debug_params(), vec!["10"]);
}

#[test]
fn renders_two_digit_placeholders() {
    let mut q = sql("VALUES (");
    for i in 0..12 {
        if i > 0 {
            q.push(", ");
        }
        q.push_bind(i);
    }
    assert!(q.to_sql().ends_with("$11, $12"));
    assert_eq!(q.param_count(), 12);
}

#[test]
fn debug_params_render_strings_quoted() {
    let mut q = sql("SELECT 1 WHERE a = ");
    q.push_bind("Miami".to_string()).push(" AND b = ").push_bind(5_i32);
    assert_eq!(q.debug_params(), vec!["\"Miami\"", "5"]);
}

#[test]
fn tag_carries_over_when_composing() {
    let mut frag = Sql::new(" WHERE TRUE");
    frag.tag("properties.search");
    let mut q = sql("SELECT 1");
    q.push_sql(frag);
    assert_eq!(q.tag_name(), Some("properties.search"));
}

#[test]
fn prebound_query_collects_params() {
    let q = query("SELECT * FROM users WHERE email = $1")
        .bind("a@b.c".to_string())
        .tag("users.by_email");
    assert_eq!(q.params_ref().len(), 1);
    assert_eq!(q.debug_params(), vec!["\"a@b.c\""]);
}

#[test]
fn strip_prefix_skips_comments_and_parens() {
    assert_eq!(strip_sql_prefix("  -- note\n(SELECT 1)"), "SELECT 1)");
    assert_eq!(strip_sql_prefix("/* x */ INSERT INTO t"), "INSERT INTO t");
    assert_eq!(strip_sql_prefix("-- only a comment"), "");
    assert!(starts_with_keyword("select * from t", "SELECT"));
    assert!(!starts_with_keyword("SEL", "SELECT"));
}
