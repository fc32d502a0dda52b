use std::collections::HashMap;

use crate::{
    MapperlateError, MapperlateResult,
    ast::Node,
    interface::SqlNode,
};

/// `MapperEngine` holds the statements of a mapper by id and restores them
/// into SQL text.
///
/// # Examples
///
/// ```
/// use mapperlate::{MapperEngine, NodeAttributes, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// builder
///     .text("UPDATE users")?
///     .start("set", &NodeAttributes::new())?
///     .text("name = #{name}, email = #{email},")?
///     .end("set")?
///     .text(" WHERE id = #{id}")?;
///
/// let mut engine = MapperEngine::new();
/// engine.add_statement("updateUser", builder.finish()?)?;
///
/// assert_eq!(
///     engine.restore("updateUser")?,
///     "UPDATE users SET name = ?, email = ? WHERE id = ?"
/// );
/// # Ok::<(), mapperlate::MapperlateError>(())
/// ```
#[derive(Debug, Default)]
pub struct MapperEngine {
    statements: HashMap<String, Node>,
}

impl MapperEngine {
    /// Creates a new engine with no statements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `statement` under `id`.
    ///
    /// # Errors
    /// - If a statement with the same id already exists.
    pub fn add_statement<N: AsRef<str>>(&mut self, id: N, statement: Node) -> MapperlateResult<()> {
        let id = id.as_ref();

        if self.statements.contains_key(id) {
            return Err(MapperlateError::StatementExists { id: id.to_owned() });
        }

        tracing::debug!(id, "statement registered");
        self.statements.insert(id.to_owned(), statement);

        Ok(())
    }

    pub fn statement<N: AsRef<str>>(&self, id: N) -> Option<&Node> {
        self.statements.get(id.as_ref())
    }

    /// The registered statement ids in ascending order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.statements.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Restores the statement registered under `id`.
    ///
    /// # Errors
    /// - If no statement is registered under `id`.
    pub fn restore<N: AsRef<str>>(&self, id: N) -> MapperlateResult<String> {
        let id = id.as_ref();
        let statement = self
            .statements
            .get(id)
            .ok_or_else(|| MapperlateError::MissingStatement { id: id.to_owned() })?;

        let sql = statement.restore_to_string()?;
        tracing::trace!(id, sql = %sql, "statement restored");
        Ok(sql)
    }

    /// Restores every statement, ordered by id. Stops at the first failure.
    pub fn restore_all(&self) -> MapperlateResult<Vec<(&str, String)>> {
        self.ids()
            .into_iter()
            .map(|id| self.restore(id).map(|sql| (id, sql)))
            .collect()
    }
}
