//! The five star-schema tables and their storage layout.

/// A table of the star schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Songs,
    Artists,
    Users,
    Time,
    Songplays,
}

impl Table {
    /// All tables, in publish order.
    pub const ALL: [Table; 5] = [
        Table::Songs,
        Table::Artists,
        Table::Users,
        Table::Time,
        Table::Songplays,
    ];

    /// Fixed relative subpath under the output root.
    pub fn subpath(&self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Artists => "artists",
            Self::Users => "users",
            Self::Time => "time",
            Self::Songplays => "songplay",
        }
    }

    /// Hive partition columns, outermost first. Empty for unpartitioned
    /// tables.
    pub fn partition_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Songs => &["year", "artist_id"],
            Self::Artists | Self::Users => &[],
            Self::Time | Self::Songplays => &["year", "month"],
        }
    }
}
