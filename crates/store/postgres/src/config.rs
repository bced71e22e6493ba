use revlog_core::subject::REVISION_HISTORY;

/// Configuration for the Postgres revision store.
pub struct PostgresRevisionConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Table name prefix (e.g. "revlog_").
    pub prefix: String,
    /// Relation names to migrate at startup. Each participating subject
    /// type's relation must be listed here; defaults to the single
    /// `revision_history` relation.
    pub relations: Vec<String>,
}

impl PostgresRevisionConfig {
    /// Create a new configuration with the given URL and defaults.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            prefix: "revlog_".to_owned(),
            relations: vec![REVISION_HISTORY.to_owned()],
        }
    }

    /// Set the table prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Add a relation to migrate at startup.
    #[must_use]
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relations.push(relation.into());
        self
    }
}
