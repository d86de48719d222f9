use crate::config::LoggerConfig;
use tracing::Level;

/// A `tracing`-based hook that emits the SQL about to be executed.
///
/// Events go to target `poolsql.sql` with `tag`, `param_count` and `sql`
/// fields. Values are never logged, only their count.
#[derive(Debug, Clone)]
pub struct SqlTracer {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes, on a char boundary). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlTracer {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl SqlTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the level configured in the logger section.
    pub fn from_config(config: &LoggerConfig) -> Self {
        Self::default().level(config.level())
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }

    pub(crate) fn emit(&self, tag: Option<&str>, sql: &str, param_count: usize) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    _ => tracing::trace!($($field)*),
                }
            };
        }

        let tag = tag.unwrap_or("-");
        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "poolsql.sql",
            tag,
            param_count,
            sql = %sql,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_sql() {
        let tracer = SqlTracer::new().max_sql_length(6);
        assert_eq!(tracer.truncate_sql("SELECT * FROM t"), "SELECT...");
        assert_eq!(tracer.truncate_sql("SELECT"), "SELECT");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let tracer = SqlTracer::new().max_sql_length(2);
        assert_eq!(tracer.truncate_sql("aé"), "a...");
    }

    #[test]
    fn no_truncate_keeps_everything() {
        let tracer = SqlTracer::new().no_truncate();
        let sql = "x".repeat(500);
        assert_eq!(tracer.truncate_sql(&sql).len(), 500);
    }
}
