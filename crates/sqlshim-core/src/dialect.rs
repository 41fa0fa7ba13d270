//! Dialect labels reported by drivers

/// Canonical label for SQL Server
pub const MSSQL: &str = "mssql";
/// Alias used by the SQL Server driver's connection strings
pub const SQLSERVER: &str = "sqlserver";

/// Engine family identified from a driver's reported dialect label.
///
/// Labels are matched case-insensitively. Unknown labels are kept as-is
/// (lowercased) in [`Dialect::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Microsoft SQL Server (`mssql`, `sqlserver`)
    MsSql,
    /// MySQL/MariaDB
    MySql,
    /// PostgreSQL
    Postgres,
    /// SQLite
    Sqlite,
    Other(String),
}

impl Dialect {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            MSSQL | SQLSERVER => Dialect::MsSql,
            "mysql" | "mariadb" => Dialect::MySql,
            "postgres" | "postgresql" => Dialect::Postgres,
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            other => Dialect::Other(other.to_string()),
        }
    }

    pub fn is_mssql(&self) -> bool {
        matches!(self, Dialect::MsSql)
    }

    /// Canonical label for this dialect
    pub fn label(&self) -> &str {
        match self {
            Dialect::MsSql => MSSQL,
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite3",
            Dialect::Other(label) => label,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
