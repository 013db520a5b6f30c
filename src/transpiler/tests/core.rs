//! Statement assembly and clause terminal tests.

use pretty_assertions::assert_eq;

use super::users;
use crate::ast::builders::*;
use crate::ast::{Expr, Query, Value};
use crate::transpiler::DialectKind;

fn query() -> Query {
    Query::new(users(DialectKind::Generic))
}

#[test]
fn test_simple_where() {
    let sql = query().filter(col("Id").eq(1)).to_sql().unwrap();
    assert_eq!(sql, "SELECT * FROM [users] WHERE [id] = 1");
}

#[test]
fn test_filters_fold_with_and() {
    let sql = query()
        .filter(col("Age").ge(18))
        .and(col("Active").eq(true))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM [users] WHERE ([age] >= 18) AND ([active] = 1)");
}

#[test]
fn test_or_chain_combines_with_current_where() {
    let sql = query()
        .filter(col("Age").lt(18))
        .or(col("Age").gt(65))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM [users] WHERE ([age] < 18) OR ([age] > 65)");
}

#[test]
fn test_logical_grouping_follows_tree_shape() {
    let and_of_or = col("Age")
        .gt(18)
        .and(col("Name").eq("a").or(col("Name").eq("b")));
    assert_eq!(
        query().filter(and_of_or).to_where_clause().unwrap(),
        "([age] > 18) AND (([name] = 'a') OR ([name] = 'b'))"
    );

    let or_of_and = col("Age")
        .gt(18)
        .or(col("Name").eq("a").and(col("Active").eq(false)));
    assert_eq!(
        query().filter(or_of_and).to_where_clause().unwrap(),
        "([age] > 18) OR (([name] = 'a') AND ([active] = 0))"
    );
}

#[test]
fn test_arithmetic_grouping() {
    let right_nested = col("Age").sub(col("Price").sub(col("Id")));
    let left_nested = col("Age").sub(col("Price")).sub(col("Id"));
    let mixed = col("Age").add(col("Price")).mul(2);

    let ctx = users(DialectKind::Generic);
    use crate::transpiler::ExprToSql;
    assert_eq!(right_nested.to_sql(&ctx).unwrap(), "[age] - ([price] - [id])");
    assert_eq!(left_nested.to_sql(&ctx).unwrap(), "[age] - [price] - [id]");
    assert_eq!(mixed.to_sql(&ctx).unwrap(), "([age] + [price]) * 2");
}

#[test]
fn test_null_comparisons_rewrite() {
    assert_eq!(
        query().filter(col("Name").eq(null())).to_where_clause().unwrap(),
        "[name] IS NULL"
    );
    assert_eq!(
        query().filter(null().ne(col("Name"))).to_where_clause().unwrap(),
        "[name] IS NOT NULL"
    );
    assert_eq!(
        query().filter(col("Name").is_null().not()).to_where_clause().unwrap(),
        "NOT ([name] IS NULL)"
    );
}

#[test]
fn test_none_arguments_are_skipped() {
    let sql = query()
        .filter(None::<Expr>)
        .order_by(None::<Expr>)
        .group_by(None::<Expr>)
        .having(None::<Expr>)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM [users]");
}

#[test]
fn test_projection_and_alias() {
    let sql = query().select(["Id", "Name"]).to_sql().unwrap();
    assert_eq!(sql, "SELECT [id], [name] FROM [users]");

    let sql = query()
        .select_as(col("Age").add(1), "NextAge")
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT [age] + 1 AS [NextAge] FROM [users]");

    let empty: [&str; 0] = [];
    assert_eq!(query().select(empty).to_sql().unwrap(), "SELECT * FROM [users]");
}

#[test]
fn test_distinct() {
    let sql = query().select(["Name"]).distinct().to_sql().unwrap();
    assert_eq!(sql, "SELECT DISTINCT [name] FROM [users]");
}

#[test]
fn test_order_by_keeps_insertion_order() {
    let sql = query()
        .order_by(col("Name"))
        .order_by_descending(col("Age"))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM [users] ORDER BY [name] ASC, [age] DESC");
}

#[test]
fn test_pagination_generic() {
    let sql = query().order_by(col("Id")).skip(20).take(10).to_sql().unwrap();
    assert_eq!(sql, "SELECT * FROM [users] ORDER BY [id] ASC LIMIT 10 OFFSET 20");

    let sql = query().paginate(None, Some(5)).to_sql().unwrap();
    assert_eq!(sql, "SELECT * FROM [users] LIMIT 5");
}

#[test]
fn test_absent_skip_and_take_are_no_ops() {
    let page_size: Option<u64> = None;
    let sql = query().skip(None).take(page_size).to_sql().unwrap();
    assert_eq!(sql, "SELECT * FROM [users]");

    let sql = query()
        .order_by(col("Id"))
        .skip(Some(4))
        .take(2)
        .skip(None)
        .take(None)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM [users] ORDER BY [id] ASC LIMIT 2 OFFSET 4");
}

#[test]
fn test_group_by_having_count() {
    let sql = query()
        .group_by(col("Active"))
        .having(count().gt(5))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT [active] FROM [users] GROUP BY [active] HAVING COUNT(*) > 5");
}

#[test]
fn test_aggregate_in_where_is_rejected() {
    let err = query()
        .group_by(col("Active"))
        .filter(count().gt(5))
        .to_sql()
        .unwrap_err();
    assert!(err.is_invalid_operation(), "{}", err);

    let nested = query().filter(col("Age").gt(avg(col("Age")).add(1)));
    assert!(nested.to_where_clause().unwrap_err().is_invalid_operation());
    assert!(nested.delete(None::<Expr>).to_sql().unwrap_err().is_invalid_operation());
}

#[test]
fn test_group_projection_aggregates() {
    let sql = query()
        .group_by(col("Active"))
        .select_as(key(), "Active")
        .select_as(count(), "Total")
        .select_as(sum(col("Age")), "AgeSum")
        .select_as(coalesce(max(col("Price")), 0).mul(2), "Top")
        .select_as(case_when(avg(col("Age")).gt(30), "old", "young"), "Band")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT [active] AS [Active], COUNT(*) AS [Total], SUM([age]) AS [AgeSum], \
         COALESCE(MAX([price]), 0) * 2 AS [Top], \
         CASE WHEN AVG([age]) > 30 THEN 'old' ELSE 'young' END AS [Band] \
         FROM [users] GROUP BY [active]"
    );
}

#[test]
fn test_group_key_resolves_to_group_expression() {
    let sql = query()
        .group_by(col("Age").div(10))
        .having(key().gt(2))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT [age] / 10 FROM [users] GROUP BY [age] / 10 HAVING ([age] / 10) > 2"
    );
}

#[test]
fn test_group_key_without_group_by_fails() {
    let err = query().select_as(key(), "K").to_sql().unwrap_err();
    assert!(err.is_invalid_operation());
}

#[test]
fn test_update() {
    let sql = query()
        .update()
        .set("Name", lit("bob"))
        .set("Age", None::<Expr>)
        .set("Active", lit(true))
        .filter(col("Id").eq(7))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "UPDATE [users] SET [name] = 'bob', [active] = 1 WHERE [id] = 7");
}

#[test]
fn test_update_without_assignments_fails() {
    let err = query().update().filter(col("Id").eq(7)).to_sql().unwrap_err();
    assert!(err.is_invalid_operation());
}

#[test]
fn test_delete() {
    let sql = query().delete(col("Id").eq(1)).to_sql().unwrap();
    assert_eq!(sql, "DELETE FROM [users] WHERE [id] = 1");

    let sql = query().filter(col("Id").eq(2)).delete(None::<Expr>).to_sql().unwrap();
    assert_eq!(sql, "DELETE FROM [users] WHERE [id] = 2");
}

#[test]
fn test_delete_without_predicate_fails() {
    let err = query().delete(None::<Expr>).to_sql().unwrap_err();
    assert!(err.is_invalid_operation());
    assert!(err.to_string().contains("DELETE requires a WHERE predicate"));
}

#[test]
fn test_insert_values() {
    let sql = query()
        .insert_columns(["Name", "Age"])
        .values([lit("a"), lit(3)])
        .add_values([lit("b"), lit(4)])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO [users] ([name], [age]) VALUES ('a', 3), ('b', 4)");
}

#[test]
fn test_insert_empty_values_is_noop() {
    let sql = query()
        .insert_columns(["Name"])
        .values(Vec::<Expr>::new())
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO [users] ([name])");
}

#[test]
fn test_insert_row_width_must_match_columns() {
    let err = query()
        .insert_columns(["Name", "Age"])
        .values([lit("a")])
        .to_sql()
        .unwrap_err();
    assert!(err.is_invalid_operation());
}

#[test]
fn test_insert_select() {
    let sql = query()
        .insert_columns(["Name", "Age"])
        .insert_select("SELECT name, age FROM staging")
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO [users] ([name], [age]) SELECT name, age FROM staging");
}

#[test]
fn test_parameterized_template() {
    let template = query()
        .parameterized(true)
        .filter(col("Name").eq("bob"))
        .filter(col("Age").gt(30))
        .filter(col("CreatedAt").is_not_null())
        .to_template()
        .unwrap();
    assert_eq!(
        template.sql,
        "SELECT * FROM [users] WHERE ([name] = @p0) AND ([age] > @p1) AND ([created_at] IS NOT NULL)"
    );
    let params: Vec<(&str, &Value)> = template.params.iter().map(|(k, v)| (k.as_str(), v)).collect();
    assert_eq!(
        params,
        vec![("p0", &Value::Text("bob".into())), ("p1", &Value::Int(30))]
    );
}

#[test]
fn test_inline_template_has_no_params() {
    let template = query().filter(col("Id").eq(1)).to_template().unwrap();
    assert_eq!(template.sql, "SELECT * FROM [users] WHERE [id] = 1");
    assert!(template.params.is_empty());
}

#[test]
fn test_to_sql_is_idempotent() {
    let q = query()
        .parameterized(true)
        .filter(col("Name").contains("x"))
        .order_by(col("Id"))
        .take(3);
    assert_eq!(q.to_sql().unwrap(), q.to_sql().unwrap());
}

#[test]
fn test_clause_terminals() {
    assert_eq!(query().to_where_clause().unwrap(), "");

    let set = query()
        .update()
        .set("Name", lit("x"))
        .set("Age", col("Age").add(1))
        .to_set_clause()
        .unwrap();
    assert_eq!(set, "[name] = 'x', [age] = [age] + 1");

    let extra = query()
        .group_by(col("Active"))
        .having(count().gt(1))
        .order_by(col("Name"))
        .take(5)
        .to_additional_clause()
        .unwrap();
    assert_eq!(extra, "GROUP BY [active] HAVING COUNT(*) > 1 ORDER BY [name] ASC LIMIT 5");
}

#[test]
fn test_parameterized_clause_terminals_keep_their_values() {
    let q = query()
        .parameterized(true)
        .update()
        .set("Name", lit("x"))
        .filter(col("Id").eq(7))
        .and(col("Name").ne(null()))
        .order_by(col("Name"))
        .skip(10);

    let filter = q.to_where_template().unwrap();
    assert_eq!(filter.sql, "([id] = @p0) AND ([name] IS NOT NULL)");
    assert_eq!(filter.params.into_iter().collect::<Vec<_>>(), vec![("p0".to_string(), Value::Int(7))]);

    let set = q.to_set_template().unwrap();
    assert_eq!(set.sql, "[name] = @p0");
    assert_eq!(set.params.get("p0"), Some(&Value::Text("x".into())));

    // Plain text terminals never reference parameters they cannot return.
    assert_eq!(q.to_where_clause().unwrap(), "([id] = 7) AND ([name] IS NOT NULL)");
    assert_eq!(q.to_set_clause().unwrap(), "[name] = 'x'");

    let extra = q.to_additional_template().unwrap();
    assert_eq!(extra.sql, "ORDER BY [name] ASC LIMIT -1 OFFSET 10");
    assert!(extra.params.is_empty());
    assert_eq!(q.to_additional_clause().unwrap(), extra.sql);
}

#[test]
fn test_unmapped_property_is_snake_cased() {
    let sql = query().filter(col("LastLoginAt").is_null()).to_where_clause().unwrap();
    assert_eq!(sql, "[last_login_at] IS NULL");
}

#[test]
fn test_in_list_and_params() {
    let sql = query()
        .filter(col("Id").is_in(list([1, 2, 3])))
        .and(col("Name").eq(param("name")))
        .to_where_clause()
        .unwrap();
    assert_eq!(sql, "([id] IN (1, 2, 3)) AND ([name] = @name)");

    let empty: Vec<Expr> = Vec::new();
    let sql = query().filter(col("Id").is_in(list(empty))).to_where_clause().unwrap();
    assert_eq!(sql, "[id] IN (NULL)");
}

#[test]
fn test_builders_do_not_share_state() {
    let base = query().filter(col("Active").eq(true));
    let adults = base.clone().filter(col("Age").ge(18));
    assert_eq!(base.to_sql().unwrap(), "SELECT * FROM [users] WHERE [active] = 1");
    assert_eq!(
        adults.to_sql().unwrap(),
        "SELECT * FROM [users] WHERE ([active] = 1) AND ([age] >= 18)"
    );
}
