//! Rewrite configuration

/// Replace one leading directory with another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

impl RewriteRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Configuration for a rewrite run
#[derive(Debug, Clone, Default)]
pub struct RewriteConfig {
    /// Applied in order; the first rule matching a track wins
    pub rules: Vec<RewriteRule>,

    /// Report what would change without writing anything
    pub dry_run: bool,

    /// Copy each playlist to `<name>.bak` before overwriting it
    pub backup: bool,
}

impl RewriteConfig {
    /// Create an empty configuration (no rules, writes enabled, no backups)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prefix substitution
    pub fn with_rule(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rules.push(RewriteRule::new(from, to));
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }
}
