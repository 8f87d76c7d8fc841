//! Translation of [`StudentQuery`] conditions into a bound SQL `WHERE` clause.
//!
//! Condition values only ever travel as parameters; the SQL text is built
//! from fixed fragments.

use classbook_core::store::{Condition, StudentQuery};
use rusqlite::types::Value;

/// A `WHERE …` fragment (empty when unfiltered) plus its positional
/// parameters, in order.
#[derive(Debug, Default, PartialEq)]
pub struct WhereClause {
  pub sql:    String,
  pub params: Vec<Value>,
}

pub fn where_clause(query: &StudentQuery) -> WhereClause {
  let mut fragments: Vec<&'static str> = Vec::with_capacity(query.conditions.len());
  let mut params = Vec::new();

  for condition in &query.conditions {
    match condition {
      Condition::Search(text) => {
        let pattern = format!("%{}%", escape_like(text));
        fragments.push(
          "(casefold(s.name) LIKE casefold(?) ESCAPE '\\' \
           OR casefold(s.roll) LIKE casefold(?) ESCAPE '\\')",
        );
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
      }
      Condition::ClassIs(class) => {
        fragments.push("s.class = ?");
        params.push(Value::Text(class.clone()));
      }
    }
  }

  if fragments.is_empty() {
    return WhereClause::default();
  }
  WhereClause { sql: format!("WHERE {}", fragments.join(" AND ")), params }
}

/// Make `%`, `_` and the escape character itself match literally.
fn escape_like(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unfiltered_query_has_no_where() {
    assert_eq!(where_clause(&StudentQuery::all()), WhereClause::default());
  }

  #[test]
  fn search_binds_pattern_for_name_and_roll() {
    let clause = where_clause(&StudentQuery::all().search("ana"));
    assert_eq!(
      clause.sql,
      "WHERE (casefold(s.name) LIKE casefold(?) ESCAPE '\\' OR casefold(s.roll) LIKE \
       casefold(?) ESCAPE '\\')"
    );
    assert_eq!(clause.params, vec![
      Value::Text("%ana%".into()),
      Value::Text("%ana%".into()),
    ]);
  }

  #[test]
  fn conditions_are_joined_with_and() {
    let clause = where_clause(&StudentQuery::all().search("23CS").class("CSE-3A"));
    assert!(clause.sql.ends_with(" AND s.class = ?"), "{}", clause.sql);
    assert_eq!(clause.params.len(), 3);
    assert_eq!(clause.params[2], Value::Text("CSE-3A".into()));
  }

  #[test]
  fn like_wildcards_are_escaped() {
    assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
  }
}
