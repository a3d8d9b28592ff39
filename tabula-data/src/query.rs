use crate::value::Value;

/// SQL syntax variant targeted by a [`QueryPlan`].
///
/// The dialect only changes placeholder style and whether `RETURNING` is
/// emitted; it never changes which rows a statement touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Postgres-style `$1, $2, ...` placeholders, `RETURNING` supported.
    Postgres,
    /// SQLite-style `?` placeholders, `RETURNING` supported (3.35+).
    Sqlite,
    /// MySQL-style `?` placeholders. No `RETURNING`: mutating statements
    /// execute but yield no rows.
    MySql,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    pub fn supports_returning(self) -> bool {
        !matches!(self, Dialect::MySql)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

/// A dialect-agnostic description of a single statement.
///
/// # Example
///
/// ```ignore
/// let built = QueryPlan::select("users", &["id", "username"])
///     .filter_eq("id", 7i64.into())
///     .build(Dialect::Postgres);
/// assert_eq!(built.sql(), "SELECT id, username FROM users WHERE id = $1");
/// ```
#[derive(Debug, Clone)]
pub struct QueryPlan {
    kind: StatementKind,
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
    predicate: Option<(String, Value)>,
    returning: Vec<String>,
    order: Vec<String>,
    limit_val: Option<i64>,
    offset_val: Option<i64>,
}

impl QueryPlan {
    fn new(kind: StatementKind, table: &str) -> Self {
        Self {
            kind,
            table: table.to_string(),
            columns: Vec::new(),
            values: Vec::new(),
            predicate: None,
            returning: Vec::new(),
            order: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    pub fn select(table: &str, columns: &[&str]) -> Self {
        let mut plan = Self::new(StatementKind::Select, table);
        plan.columns = columns.iter().map(|c| c.to_string()).collect();
        plan
    }

    /// `columns` and `values` are matched positionally.
    pub fn insert(table: &str, columns: Vec<&str>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        let mut plan = Self::new(StatementKind::Insert, table);
        plan.columns = columns.into_iter().map(str::to_string).collect();
        plan.values = values;
        plan
    }

    /// Build an `UPDATE ... SET col = ?` over the given assignments.
    pub fn update(table: &str, assignments: Vec<(&str, Value)>) -> Self {
        let mut plan = Self::new(StatementKind::Update, table);
        for (column, value) in assignments {
            plan.columns.push(column.to_string());
            plan.values.push(value);
        }
        plan
    }

    pub fn delete(table: &str) -> Self {
        Self::new(StatementKind::Delete, table)
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn filter_eq(mut self, column: &str, value: Value) -> Self {
        self.predicate = Some((column.to_string(), value));
        self
    }

    pub fn returning(mut self, columns: &[&str]) -> Self {
        self.returning = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Raw order-by expressions, emitted verbatim.
    pub fn order_by(mut self, columns: &[String]) -> Self {
        self.order.extend(columns.iter().cloned());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    /// Render the plan for `dialect`. Never fails: the plan is not checked
    /// against any schema.
    pub fn build(&self, dialect: Dialect) -> BuiltQuery {
        let mut sql = String::new();
        let mut args = Vec::new();
        let mut placeholder_idx = 1usize;
        let mut next_placeholder = |value: &Value, args: &mut Vec<Value>| {
            let placeholder = dialect.placeholder(placeholder_idx);
            placeholder_idx += 1;
            args.push(value.clone());
            placeholder
        };

        match self.kind {
            StatementKind::Select => {
                sql.push_str(&format!("SELECT {} FROM {}", self.columns.join(", "), self.table));
            }
            StatementKind::Insert => {
                sql.push_str(&format!("INSERT INTO {}", self.table));
                if self.columns.is_empty() {
                    match dialect {
                        Dialect::MySql => sql.push_str(" () VALUES ()"),
                        Dialect::Postgres | Dialect::Sqlite => sql.push_str(" DEFAULT VALUES"),
                    }
                } else {
                    let placeholders: Vec<_> = self
                        .values
                        .iter()
                        .map(|v| next_placeholder(v, &mut args))
                        .collect();
                    sql.push_str(&format!(
                        " ({}) VALUES ({})",
                        self.columns.join(", "),
                        placeholders.join(", ")
                    ));
                }
            }
            StatementKind::Update => {
                let sets: Vec<_> = self
                    .columns
                    .iter()
                    .zip(&self.values)
                    .map(|(col, v)| format!("{col} = {}", next_placeholder(v, &mut args)))
                    .collect();
                sql.push_str(&format!("UPDATE {} SET {}", self.table, sets.join(", ")));
            }
            StatementKind::Delete => {
                sql.push_str(&format!("DELETE FROM {}", self.table));
            }
        }

        if let Some((col, value)) = &self.predicate {
            let placeholder = next_placeholder(value, &mut args);
            sql.push_str(&format!(" WHERE {col} = {placeholder}"));
        }

        if !self.order.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", self.order.join(", ")));
        }
        if let Some(limit) = self.limit_val {
            let placeholder = next_placeholder(&Value::from(limit), &mut args);
            sql.push_str(&format!(" LIMIT {placeholder}"));
        }
        if let Some(offset) = self.offset_val {
            let placeholder = next_placeholder(&Value::from(offset), &mut args);
            sql.push_str(&format!(" OFFSET {placeholder}"));
        }

        if !self.returning.is_empty() && dialect.supports_returning() {
            sql.push_str(&format!(" RETURNING {}", self.returning.join(", ")));
        }

        BuiltQuery { sql, args }
    }
}

/// SQL text plus its positional bind arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    sql: String,
    args: Vec<Value>,
}

impl BuiltQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}
