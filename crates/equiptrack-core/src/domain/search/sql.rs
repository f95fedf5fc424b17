//! SQL translation
//!
//! Translates a `Predicate` into a parameterized SQLite WHERE clause over the
//! `equipments e` alias. Column names come from the schema registry and every
//! caller-supplied value is bound as a parameter.
//!
//! ```sql
//! e.name_folded LIKE ? ESCAPE '\'    -- Contains, pattern %fold_case(text)%
//! e.status = ?                       -- StatusEquals
//! e.condition >= ?                   -- ConditionAtLeast
//! (a OR b) / (a AND b)               -- combinators
//! 1=1 / 1=0                          -- empty AND / empty OR
//! ```

use sqlx::Sqlite;
use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;

use super::predicate::Predicate;
use super::schema::{FilterField, fold_case};

/// A WHERE clause (without the keyword) plus its parameters in order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlClause {
    pub clause: String,
    pub params: Vec<SqlParam>,
}

/// SQL parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
}

/// Predicate to SQL translator
pub struct SqlTranslator;

impl SqlTranslator {
    /// Translate a predicate into a parameterized clause
    pub fn translate(predicate: &Predicate) -> SqlClause {
        let mut params = Vec::new();
        let clause = Self::translate_node(predicate, &mut params);
        SqlClause { clause, params }
    }

    fn translate_node(predicate: &Predicate, params: &mut Vec<SqlParam>) -> String {
        match predicate {
            Predicate::Contains { field, text } => {
                params.push(SqlParam::Text(format!("%{}%", escape_like(&fold_case(text)))));
                format!("{} LIKE ? ESCAPE '\\'", field.folded_column())
            }
            Predicate::StatusEquals(status) => {
                params.push(SqlParam::Text(status.clone()));
                format!("{} = ?", FilterField::Status.column())
            }
            Predicate::ConditionAtLeast(min) => {
                params.push(SqlParam::Integer(*min));
                format!("{} >= ?", FilterField::Condition.column())
            }
            Predicate::ConditionAtMost(max) => {
                params.push(SqlParam::Integer(*max));
                format!("{} <= ?", FilterField::Condition.column())
            }
            Predicate::And(children) => Self::join(children, " AND ", "1=1", params),
            Predicate::Or(children) => Self::join(children, " OR ", "1=0", params),
        }
    }

    fn join(
        children: &[Predicate],
        separator: &str,
        empty: &str,
        params: &mut Vec<SqlParam>,
    ) -> String {
        let parts: Vec<String> = children
            .iter()
            .map(|child| Self::translate_node(child, params))
            .collect();

        match parts.len() {
            0 => empty.to_string(),
            1 => parts[0].clone(),
            _ => format!("({})", parts.join(separator)),
        }
    }
}

/// Escape `LIKE` wildcards so the text matches literally
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Bind clause parameters onto a query in order
pub(crate) fn bind_params<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlParam::Text(text) => query.bind(text.as_str()),
            SqlParam::Integer(value) => query.bind(*value),
        };
    }
    query
}
