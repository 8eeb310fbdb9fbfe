//! Filtered query builder
//!
//! Collects optional filters as `(predicate, value)` pairs and renders them
//! with positional placeholders (`$1`, `$2`, ...). Filter values only ever
//! travel as bound parameters.
//!
//! ```ignore
//! let mut filter = FilterBuilder::new(DbBackend::Postgres);
//! filter
//!     .eq("mr.season_id", query.season)
//!     .eq_any(&["mr.home_teams_id::text", "mr.away_teams_id::text"], query.team_id);
//! let count = filter.count_statement("SELECT COUNT(*) AS total FROM match_registry mr");
//! let page = filter.page_statement("SELECT mr.* FROM match_registry mr", "mr.match_date DESC, mr.id", &page);
//! ```

use chrono::NaiveDate;
use sea_orm::{DbBackend, Statement, Value};

use crate::shared::PageRequest;

/// A value that may or may not constrain a query.
///
/// Empty strings count as absent.
pub trait FilterValue {
    fn into_filter_value(self) -> Option<Value>;
}

impl FilterValue for String {
    fn into_filter_value(self) -> Option<Value> {
        (!self.is_empty()).then(|| Value::from(self))
    }
}

impl FilterValue for &str {
    fn into_filter_value(self) -> Option<Value> {
        (!self.is_empty()).then(|| Value::from(self.to_string()))
    }
}

impl FilterValue for &String {
    fn into_filter_value(self) -> Option<Value> {
        self.as_str().into_filter_value()
    }
}

macro_rules! plain_filter_value {
    ($($ty:ty),*) => {
        $(
            impl FilterValue for $ty {
                fn into_filter_value(self) -> Option<Value> {
                    Some(Value::from(self))
                }
            }
        )*
    };
}

plain_filter_value!(i32, i64, bool, NaiveDate);

#[derive(Debug, Clone)]
pub struct FilterBuilder {
    backend: DbBackend,
    predicates: Vec<String>,
    values: Vec<Value>,
}

impl FilterBuilder {
    pub fn new(backend: DbBackend) -> Self {
        Self {
            backend,
            predicates: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Bind a value and return its placeholder, for use outside the WHERE clause
    pub fn bind(&mut self, value: impl Into<Value>) -> String {
        self.values.push(value.into());
        format!("${}", self.values.len())
    }

    /// `column = $n`
    pub fn eq<V: FilterValue>(&mut self, column: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value.and_then(FilterValue::into_filter_value) {
            let p = self.bind(value);
            self.predicates.push(format!("{} = {}", column, p));
        }
        self
    }

    /// `(a = $n OR b = $n ...)` with a single bound value
    pub fn eq_any<V: FilterValue>(&mut self, columns: &[&str], value: Option<V>) -> &mut Self {
        if let Some(value) = value.and_then(FilterValue::into_filter_value) {
            let p = self.bind(value);
            let group: Vec<String> = columns.iter().map(|c| format!("{} = {}", c, p)).collect();
            self.predicates.push(format!("({})", group.join(" OR ")));
        }
        self
    }

    /// Case-insensitive substring match. `%` and `_` in `value` match literally.
    pub fn ilike(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        self.ilike_any(&[column], value)
    }

    /// Case-insensitive substring match on any of `columns`
    pub fn ilike_any(&mut self, columns: &[&str], value: Option<&str>) -> &mut Self {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return self;
        };
        let p = self.bind(format!("%{}%", escape_like(value)));
        let op = self.like_operator();
        let group: Vec<String> = columns
            .iter()
            .map(|c| format!("{} {} {} ESCAPE '\\'", c, op, p))
            .collect();
        let predicate = if group.len() == 1 {
            group.into_iter().collect()
        } else {
            format!("({})", group.join(" OR "))
        };
        self.predicates.push(predicate);
        self
    }

    /// `column >= $n`
    pub fn gte<V: FilterValue>(&mut self, column: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value.and_then(FilterValue::into_filter_value) {
            let p = self.bind(value);
            self.predicates.push(format!("{} >= {}", column, p));
        }
        self
    }

    /// `column <= $n`
    pub fn lte<V: FilterValue>(&mut self, column: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value.and_then(FilterValue::into_filter_value) {
            let p = self.bind(value);
            self.predicates.push(format!("{} <= {}", column, p));
        }
        self
    }

    /// A predicate that binds nothing new. It may reference placeholders
    /// returned by `bind`.
    pub fn fixed(&mut self, predicate: impl Into<String>) -> &mut Self {
        self.predicates.push(predicate.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Predicates joined with AND, or `TRUE` when there are none
    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            "TRUE".to_string()
        } else {
            self.predicates.join(" AND ")
        }
    }

    /// `{sql}` with the currently bound values. Use `where_clause()` inside it.
    pub fn statement(&self, sql: impl Into<String>) -> Statement {
        Statement::from_sql_and_values(self.backend, sql, self.values.clone())
    }

    /// `{head} WHERE {predicates}`
    pub fn count_statement(&self, head: &str) -> Statement {
        self.statement(format!("{} WHERE {}", head, self.where_clause()))
    }

    /// `{head} WHERE {predicates} ORDER BY {order_by} LIMIT $k OFFSET $k+1`
    pub fn page_statement(&self, head: &str, order_by: &str, page: &PageRequest) -> Statement {
        let limit = self.values.len() + 1;
        let offset = limit + 1;
        let sql = format!(
            "{} WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            head,
            self.where_clause(),
            order_by,
            limit,
            offset
        );

        let mut values = self.values.clone();
        values.push(Value::from(page.page_size as i64));
        values.push(Value::from(i64::try_from(page.offset()).unwrap_or(i64::MAX)));
        Statement::from_sql_and_values(self.backend, sql, values)
    }

    fn like_operator(&self) -> &'static str {
        match self.backend {
            DbBackend::Postgres => "ILIKE",
            // SQLite LIKE is already case-insensitive for ASCII
            _ => "LIKE",
        }
    }
}

/// Escape LIKE wildcards so user text is matched verbatim under `ESCAPE '\'`
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(stmt: &Statement) -> Vec<Value> {
        stmt.values.clone().map(|v| v.0).unwrap_or_default()
    }

    #[test]
    fn no_filters_renders_true() {
        let filter = FilterBuilder::new(DbBackend::Postgres);
        let stmt = filter.count_statement("SELECT COUNT(*) AS total FROM team");

        assert!(filter.is_empty());
        assert_eq!(stmt.sql, "SELECT COUNT(*) AS total FROM team WHERE TRUE");
        assert!(values(&stmt).is_empty());
    }

    #[test]
    fn absent_and_empty_filters_contribute_nothing() {
        let mut filter = FilterBuilder::new(DbBackend::Postgres);
        filter
            .eq("season_id", None::<i32>)
            .eq("state", Some(""))
            .ilike("name", Some(""))
            .ilike_any(&["a", "b"], None)
            .gte("match_date", None::<NaiveDate>);

        assert_eq!(filter.where_clause(), "TRUE");
    }

    #[test]
    fn each_present_filter_adds_one_numbered_predicate() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut filter = FilterBuilder::new(DbBackend::Postgres);
        filter
            .eq("mr.season_id", Some(2024))
            .eq_any(&["mr.home_teams_id::text", "mr.away_teams_id::text"], Some("t1"))
            .gte("mr.match_date", Some(start))
            .lte("mr.match_date", None::<NaiveDate>);

        assert_eq!(
            filter.where_clause(),
            "mr.season_id = $1 AND (mr.home_teams_id::text = $2 OR mr.away_teams_id::text = $2) AND mr.match_date >= $3"
        );
        let stmt = filter.statement("x");
        assert_eq!(
            values(&stmt),
            vec![Value::from(2024), Value::from("t1".to_string()), Value::from(start)]
        );
    }

    #[test]
    fn substring_match_wraps_value_and_shares_placeholder() {
        let mut filter = FilterBuilder::new(DbBackend::Postgres);
        filter
            .ilike_any(&["team_name", "team_name_long"], Some("thorns"))
            .ilike("position", Some("FW"));

        assert_eq!(
            filter.where_clause(),
            r"(team_name ILIKE $1 ESCAPE '\' OR team_name_long ILIKE $1 ESCAPE '\') AND position ILIKE $2 ESCAPE '\'"
        );
        assert_eq!(
            values(&filter.statement("x")),
            vec![Value::from("%thorns%".to_string()), Value::from("%FW%".to_string())]
        );
    }

    #[test]
    fn sqlite_uses_like() {
        let mut filter = FilterBuilder::new(DbBackend::Sqlite);
        filter.ilike("name", Some("park"));
        assert_eq!(filter.where_clause(), r"name LIKE $1 ESCAPE '\'");
    }

    #[test]
    fn wildcards_in_search_text_match_literally() {
        let mut filter = FilterBuilder::new(DbBackend::Postgres);
        filter.ilike("player_name", Some(r"a_b%c\d"));

        assert_eq!(
            values(&filter.statement("x")),
            vec![Value::from(r"%a\_b\%c\\d%".to_string())]
        );
    }

    #[test]
    fn hostile_input_stays_out_of_sql_text() {
        let mut filter = FilterBuilder::new(DbBackend::Postgres);
        filter.eq("me.type", Some("goal'; DROP TABLE team; --"));

        let stmt = filter.count_statement("SELECT COUNT(*) AS total FROM match_event me");
        assert!(!stmt.sql.contains("DROP"));
        assert_eq!(
            values(&stmt),
            vec![Value::from("goal'; DROP TABLE team; --".to_string())]
        );
    }

    #[test]
    fn fixed_predicates_and_bound_select_values_keep_numbering() {
        let mut filter = FilterBuilder::new(DbBackend::Postgres);
        let team = filter.bind("t1".to_string());
        filter
            .fixed("me.type = 'goal'")
            .fixed(format!("me.team_uuid::text = {}", team))
            .eq("me.season_id", Some(2023));

        assert_eq!(team, "$1");
        assert_eq!(
            filter.where_clause(),
            "me.type = 'goal' AND me.team_uuid::text = $1 AND me.season_id = $2"
        );
    }

    #[test]
    fn page_statement_appends_limit_and_offset() {
        let mut filter = FilterBuilder::new(DbBackend::Postgres);
        filter.eq("state", Some("OR"));
        let page = PageRequest { page: 3, page_size: 20 };

        let stmt = filter.page_statement("SELECT * FROM venue", "name, id", &page);

        assert_eq!(
            stmt.sql,
            "SELECT * FROM venue WHERE state = $1 ORDER BY name, id LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            values(&stmt),
            vec![Value::from("OR".to_string()), Value::from(20i64), Value::from(40i64)]
        );
        // The builder itself is unchanged, so the count query still lines up
        assert_eq!(values(&filter.statement("x")).len(), 1);
    }
}
